//! Prometheus counters for slip delivery outcomes.

use actix_web::{HttpResponse, Responder};
use lazy_static::lazy_static;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

lazy_static! {
    pub static ref SLIPS_SENT: IntCounter = register_int_counter!(
        "payslip_server_slips_sent_total",
        "Salary slips accepted by the email provider"
    )
    .expect("metric can be registered");
    pub static ref SLIPS_SKIPPED: IntCounter = register_int_counter!(
        "payslip_server_slips_skipped_total",
        "Rows skipped for a missing name or email"
    )
    .expect("metric can be registered");
    pub static ref SLIPS_FAILED: IntCounter = register_int_counter!(
        "payslip_server_slips_failed_total",
        "Slips that failed to render or send"
    )
    .expect("metric can be registered");
}

/// Delivery counters in the Prometheus text format.
pub async fn delivery_metrics() -> impl Responder {
    // touch the counters so they are exported before the first batch
    let _ = (&*SLIPS_SENT, &*SLIPS_SKIPPED, &*SLIPS_FAILED);

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        log::error!("Failed to encode delivery metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
