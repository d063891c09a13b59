#![allow(dead_code)]

use payslip_server::config::{
    AppConfig, BrevoConfig, Contact, Letterhead, OfficeAccount, SlipAssets,
};
use payslip_server::delivery::{BrevoTransport, EmailTransport, OutgoingEmail, TransportError};
use payslip_server::payroll::PayrollRow;
use payslip_server::slip::{RenderError, RenderedSlip, SlipContent, SlipRenderer};
use payslip_server::AppState;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const OFFICE_EMAIL: &str = "office@example.com";
pub const OFFICE_PASSWORD: &str = "correct horse battery";
pub const JWT_SECRET: &str = "integration-test-secret";

/// Mock implementation of EmailTransport for testing
pub struct MockTransport {
    sent: tokio::sync::Mutex<Vec<OutgoingEmail>>,
    failing: HashSet<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: tokio::sync::Mutex::new(Vec::new()),
            failing: HashSet::new(),
        }
    }

    /// Reject every email addressed to one of `addresses`.
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            sent: tokio::sync::Mutex::new(Vec::new()),
            failing: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl EmailTransport for MockTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
        if self.failing.contains(&email.to.email) {
            return Err(TransportError::Rejected {
                status: reqwest::StatusCode::BAD_REQUEST,
                message: "invalid email address".to_string(),
            });
        }
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

/// Renderer producing a tiny fake PDF, so tests do not need fonts on disk.
pub struct StubRenderer;

impl SlipRenderer for StubRenderer {
    fn render(&self, content: &SlipContent) -> Result<RenderedSlip, RenderError> {
        Ok(RenderedSlip {
            filename: content.attachment_name(),
            pdf: format!("%PDF-1.4 {}", content.employee_name).into_bytes(),
        })
    }
}

pub fn sender() -> Contact {
    Contact {
        name: "Ticket To The Moon".to_string(),
        email: "office@ticketothemoon.com".to_string(),
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        office: OfficeAccount {
            email: OFFICE_EMAIL.to_string(),
            password_hash: bcrypt::hash(OFFICE_PASSWORD, 4).expect("Failed to hash password"),
        },
        jwt_secret: JWT_SECRET.to_string(),
        brevo: BrevoConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
        },
        sender: sender(),
        send_delay: Duration::ZERO,
        assets: SlipAssets {
            fonts_dir: PathBuf::from("./fonts"),
            font_family: "LiberationSans".to_string(),
            logo_path: None,
            stamp_path: None,
        },
        letterhead: Letterhead::default(),
        static_dir: PathBuf::from("./static"),
        cors_origins: Vec::new(),
    }
}

pub fn test_state(transport: Arc<MockTransport>) -> AppState {
    state_with_transport(transport)
}

pub fn state_with_transport(transport: Arc<dyn EmailTransport>) -> AppState {
    AppState::with_parts(test_config(), transport, Arc::new(StubRenderer))
}

/// Brevo client with no API key, pointed at a port nothing listens on.
pub fn unconfigured_brevo() -> BrevoTransport {
    BrevoTransport::new(
        reqwest::Client::new(),
        &BrevoConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
        },
    )
}

pub fn access_token() -> String {
    payslip_server::auth::jwt::generate_access_token(JWT_SECRET, OFFICE_EMAIL)
        .expect("Failed to generate access token")
}

pub fn row(value: serde_json::Value) -> PayrollRow {
    serde_json::from_value(value).expect("row must be a JSON object")
}
