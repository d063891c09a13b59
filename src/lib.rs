use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod config;
pub mod delivery;
pub mod payroll;
pub mod slip;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

/// JSON request bodies up to 50 MB; a full payroll sheet is sent back on every batch call.
pub const JSON_BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new("Unauthorized", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::me,
        crate::payroll::handlers::upload_sheet,
        crate::payroll::handlers::summarize_rows,
        crate::payroll::handlers::breakdown_row,
        crate::payroll::handlers::download_slip,
        crate::delivery::handlers::send_payslips
    ),
    components(
        schemas(
            ErrorResponse,
            auth::model::LoginRequest,
            auth::model::RefreshRequest,
            auth::model::TokenResponse,
            auth::model::AccountInfo,
            payroll::models::RowsRequest,
            payroll::models::RowRequest,
            payroll::models::PayrollPreview,
            payroll::summary::PayrollSummary,
            payroll::breakdown::PayrollBreakdown,
            payroll::breakdown::SlipLine,
            delivery::models::SendPayslipsResponse,
            delivery::pipeline::DeliveryReport,
            delivery::pipeline::RowOutcome,
            delivery::pipeline::DeliveryStatus,
            delivery::pipeline::SkipReason,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Office login and tokens."),
        (name = "Payroll", description = "Sheet upload, totals and single slips."),
        (name = "Delivery", description = "Emailing salary slips to employees.")
    )
)]
pub struct ApiDoc;

/// Every JSON API route, mounted under `/api`, plus the root-level aliases.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(auth::handlers::config)
            .configure(payroll::handlers::config),
    )
    .configure(delivery::handlers::config);
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration. Please check your .env file. Error: {}", e);
            std::process::exit(1);
        }
    };

    let bind = (config.host.clone(), config.port);
    let static_dir = config.static_dir.clone();
    let cors_origins = config.cors_origins.clone();

    let app_state = web::Data::new(AppState::new(config)?);
    if let Err(e) = app_state.renderer.check() {
        log::warn!("Slip renderer is not ready, sending will fail: {}", e);
    }

    let prometheus = PrometheusMetricsBuilder::new("payslip_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .app_data(web::JsonConfig::default().limit(JSON_BODY_LIMIT))
            .configure(configure_api)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .service(actix_files::Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
