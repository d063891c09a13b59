//! Sequential slip delivery: one render and one email per employee, throttled between sends.

use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;
use uuid::Uuid;

use super::metrics::{SLIPS_FAILED, SLIPS_SENT, SLIPS_SKIPPED};
use super::transport::{Attachment, BrevoTransport, EmailTransport, OutgoingEmail, TransportError};
use crate::config::{Contact, DeliverySettings};
use crate::payroll::row::PayrollRow;
use crate::slip::{PdfSlipRenderer, RenderError, SlipContent, SlipRenderer};

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Slip renderer is unavailable: {0}")]
    RendererUnavailable(#[source] RenderError),
    #[error("Email transport is unavailable: {0}")]
    TransportUnavailable(#[source] TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingName,
    MissingEmail,
}

/// What happened to one input row.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RowOutcome {
    /// Zero-based position in the submitted batch.
    pub row: usize,
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeliveryReport {
    pub batch_id: Uuid,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<RowOutcome>,
}

impl DeliveryReport {
    fn new() -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            sent: 0,
            skipped: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    /// One-line outcome summary, e.g. `Sent: 3, Skipped: 1, Failed: 0`.
    pub fn tally(&self) -> String {
        format!(
            "Sent: {}, Skipped: {}, Failed: {}",
            self.sent, self.skipped, self.failed
        )
    }

    fn record(&mut self, outcome: RowOutcome) {
        match outcome.status {
            DeliveryStatus::Sent => {
                self.sent += 1;
                SLIPS_SENT.inc();
            }
            DeliveryStatus::Skipped => {
                self.skipped += 1;
                SLIPS_SKIPPED.inc();
            }
            DeliveryStatus::Failed => {
                self.failed += 1;
                SLIPS_FAILED.inc();
            }
        }
        self.results.push(outcome);
    }
}

pub struct DeliveryPipeline {
    transport: Arc<dyn EmailTransport>,
    renderer: Arc<dyn SlipRenderer>,
    sender: Contact,
    throttle: Duration,
}

impl DeliveryPipeline {
    pub fn new(
        transport: Arc<dyn EmailTransport>,
        renderer: Arc<dyn SlipRenderer>,
        sender: Contact,
        throttle: Duration,
    ) -> Self {
        Self {
            transport,
            renderer,
            sender,
            throttle,
        }
    }

    /// Pipeline backed by the Brevo client and the PDF renderer.
    pub fn from_settings(settings: &DeliverySettings, client: reqwest::Client) -> Self {
        Self::new(
            Arc::new(BrevoTransport::new(client, &settings.brevo)),
            Arc::new(PdfSlipRenderer::new(
                &settings.assets,
                settings.letterhead.clone(),
            )),
            settings.sender.clone(),
            settings.send_delay,
        )
    }

    /// Deliver one slip per row, strictly in order.
    ///
    /// A failing row is recorded and the batch moves on. Only a renderer or transport that
    /// cannot work at all aborts, and it does so before the first row.
    pub async fn deliver(&self, rows: &[PayrollRow]) -> Result<DeliveryReport, DeliveryError> {
        self.renderer
            .check()
            .map_err(DeliveryError::RendererUnavailable)?;
        self.transport
            .check()
            .map_err(DeliveryError::TransportUnavailable)?;

        let mut report = DeliveryReport::new();
        info!(
            "Starting delivery batch {} with {} rows",
            report.batch_id,
            rows.len()
        );

        for (position, row) in rows.iter().enumerate() {
            let outcome = self.deliver_row(position, row).await;
            report.record(outcome);
        }

        info!(
            "Delivery batch {} finished: {} sent, {} skipped, {} failed",
            report.batch_id, report.sent, report.skipped, report.failed
        );
        Ok(report)
    }

    async fn deliver_row(&self, position: usize, row: &PayrollRow) -> RowOutcome {
        let name = row.name();
        let email = row.email();
        let mut outcome = RowOutcome {
            row: position,
            name: name.clone(),
            email: email.clone(),
            status: DeliveryStatus::Skipped,
            reason: None,
            error: None,
        };

        let Some(name) = name else {
            warn!("Skipping row {}: missing Name", position);
            outcome.reason = Some(SkipReason::MissingName);
            return outcome;
        };
        let Some(email) = email else {
            warn!("Skipping {}: missing Email", name);
            outcome.reason = Some(SkipReason::MissingEmail);
            return outcome;
        };

        let renderer = self.renderer.clone();
        let content = SlipContent::from_row(row);
        let rendered =
            tokio::task::spawn_blocking(move || renderer.render(&content).map_err(|e| e.to_string()))
                .await
                .unwrap_or_else(|e| Err(format!("slip rendering task failed: {}", e)));

        let slip = match rendered {
            Ok(slip) => slip,
            Err(e) => {
                error!("Failed to render slip for {}: {}", name, e);
                outcome.status = DeliveryStatus::Failed;
                outcome.error = Some(e);
                return outcome;
            }
        };

        let message = OutgoingEmail {
            sender: self.sender.clone(),
            to: Contact {
                name: name.clone(),
                email: email.clone(),
            },
            subject: format!("Salary Slip - {}", name),
            html_content: slip_email_body(&name),
            attachment: Attachment {
                name: slip.filename,
                content: slip.pdf,
            },
        };

        let result = self.transport.send(&message).await;
        match result {
            Ok(()) => {
                info!("Sent slip to {} <{}>", name, email);
                outcome.status = DeliveryStatus::Sent;
            }
            Err(e) => {
                error!("Failed to send slip to {}: {}", name, e);
                outcome.status = DeliveryStatus::Failed;
                outcome.error = Some(e.to_string());
            }
        }

        if !self.throttle.is_zero() {
            debug!("Waiting {:?} before the next email", self.throttle);
            tokio::time::sleep(self.throttle).await;
        }
        outcome
    }
}

pub fn slip_email_body(name: &str) -> String {
    format!(
        "<p>Dear {},</p><p>Please find your attached salary slip.</p>",
        escape_html(name)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
