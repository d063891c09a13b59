//! Delivery module - renders each employee's slip and emails it through Brevo.
//!
//! - `pipeline` - the sequential, throttled batch
//! - `transport` - the `EmailTransport` seam and the Brevo client
//! - `metrics` - Prometheus counters for batch outcomes

pub mod handlers;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod transport;

pub use pipeline::{DeliveryError, DeliveryPipeline, DeliveryReport, DeliveryStatus, RowOutcome, SkipReason};
pub use transport::{Attachment, BrevoTransport, EmailTransport, OutgoingEmail, TransportError};
