//! Outgoing email and the Brevo transactional email client.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::config::{BrevoConfig, Contact};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("email provider is not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request to email provider failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("email provider rejected the message (HTTP {status}): {message}")]
    Rejected { status: StatusCode, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub content: Vec<u8>,
}

/// One message with a single attachment, ready to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub sender: Contact,
    pub to: Contact,
    pub subject: String,
    pub html_content: String,
    pub attachment: Attachment,
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Fails when the transport cannot send anything at all.
    fn check(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError>;
}

#[derive(Serialize)]
struct BrevoAddress<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoAttachment<'a> {
    name: &'a str,
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoEmail<'a> {
    sender: BrevoAddress<'a>,
    to: [BrevoAddress<'a>; 1],
    subject: &'a str,
    html_content: &'a str,
    attachment: [BrevoAttachment<'a>; 1],
}

impl<'a> From<&'a OutgoingEmail> for BrevoEmail<'a> {
    fn from(email: &'a OutgoingEmail) -> Self {
        Self {
            sender: BrevoAddress {
                name: &email.sender.name,
                email: &email.sender.email,
            },
            to: [BrevoAddress {
                name: &email.to.name,
                email: &email.to.email,
            }],
            subject: &email.subject,
            html_content: &email.html_content,
            attachment: [BrevoAttachment {
                name: &email.attachment.name,
                content: STANDARD.encode(&email.attachment.content),
            }],
        }
    }
}

/// Brevo transactional email API client.
#[derive(Clone)]
pub struct BrevoTransport {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl BrevoTransport {
    pub fn new(client: Client, config: &BrevoConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v3/smtp/email", self.base_url)
    }
}

#[async_trait]
impl EmailTransport for BrevoTransport {
    fn check(&self) -> Result<(), TransportError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(TransportError::NotConfigured("BREVO_API_KEY is not set")),
        }
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), TransportError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TransportError::NotConfigured("BREVO_API_KEY is not set"))?;

        debug!("POST {} for {}", self.endpoint(), email.to.email);
        let response = self
            .client
            .post(self.endpoint())
            .header("api-key", api_key)
            .header("accept", "application/json")
            .json(&BrevoEmail::from(email))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error response".to_string());
        let message = rejection_message(&body);
        error!("Brevo rejected email to {}: HTTP {} - {}", email.to.email, status, message);
        Err(TransportError::Rejected { status, message })
    }
}

/// Brevo error bodies carry a `message` field; anything else is reported verbatim.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
