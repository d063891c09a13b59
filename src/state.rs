//! Shared application state handed to every handler through `web::Data`.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::delivery::{BrevoTransport, DeliveryPipeline, EmailTransport};
use crate::slip::{PdfSlipRenderer, SlipRenderer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub renderer: Arc<dyn SlipRenderer>,
    pub pipeline: Arc<DeliveryPipeline>,
}

/// HTTP client used for the email provider.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(900))
        .user_agent("payslip-server/1.0")
        .build()
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let transport = Arc::new(BrevoTransport::new(http_client()?, &config.brevo));
        let renderer = Arc::new(PdfSlipRenderer::new(
            &config.assets,
            config.letterhead.clone(),
        ));

        Ok(Self::with_parts(config, transport, renderer))
    }

    /// Build the state around any transport and renderer.
    pub fn with_parts(
        config: AppConfig,
        transport: Arc<dyn EmailTransport>,
        renderer: Arc<dyn SlipRenderer>,
    ) -> Self {
        let pipeline = DeliveryPipeline::new(
            transport,
            renderer.clone(),
            config.sender.clone(),
            config.send_delay,
        );

        Self {
            config: Arc::new(config),
            renderer,
            pipeline: Arc::new(pipeline),
        }
    }
}
