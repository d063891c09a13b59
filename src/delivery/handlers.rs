use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{error, info, warn};

use super::models::SendPayslipsResponse;
use crate::auth::middleware::validate_request_token;
use crate::payroll::models::RowsRequest;
use crate::{AppState, ErrorResponse};

/// Email a salary slip to every employee row, one at a time.
#[utoipa::path(
    context_path = "/api",
    tag = "Delivery",
    post,
    path = "/payroll/send",
    security(("bearer_auth" = [])),
    request_body = RowsRequest,
    responses(
        (status = 200, description = "Batch processed; see the per-row results", body = SendPayslipsResponse),
        (status = 400, description = "No rows were submitted", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Batch could not start", body = ErrorResponse)
    )
)]
pub async fn send_payslips(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<RowsRequest>,
) -> impl Responder {
    if let Err(e) = validate_request_token(&req) {
        return e.error_response();
    }

    let Some(rows) = body.non_empty_rows() else {
        warn!("Rejected send request without rows");
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request("No data received"));
    };
    info!("Executing send_payslips handler for {} rows", rows.len());

    match state.pipeline.deliver(rows).await {
        Ok(report) => HttpResponse::Ok().json(SendPayslipsResponse {
            success: true,
            report,
        }),
        Err(e) => {
            error!("Delivery batch failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

/// Routes mounted at the application root.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/send-payslips", web::post().to(send_payslips))
        .route("/metrics/delivery", web::get().to(super::metrics::delivery_metrics));
}
