use serde::Serialize;
use utoipa::ToSchema;

use super::pipeline::DeliveryReport;

#[derive(Debug, Serialize, ToSchema)]
pub struct SendPayslipsResponse {
    #[schema(example = true)]
    pub success: bool,
    pub report: DeliveryReport,
}
