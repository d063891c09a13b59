use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::row::PayrollRow;
use super::summary::PayrollSummary;

/// Body of the batch endpoints. `rows` may be absent; handlers treat that like an empty list.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RowsRequest {
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub rows: Option<Vec<PayrollRow>>,
}

impl RowsRequest {
    /// Rows to process, or `None` when nothing usable was sent.
    pub fn non_empty_rows(&self) -> Option<&[PayrollRow]> {
        self.rows.as_deref().filter(|rows| !rows.is_empty())
    }
}

/// Body of the single-employee endpoints.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RowRequest {
    #[schema(value_type = Object)]
    pub row: PayrollRow,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PayrollPreview {
    #[schema(example = "payroll-2024-01.xlsx")]
    pub filename: String,
    pub headers: Vec<String>,
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<PayrollRow>,
    pub summary: PayrollSummary,
}

/// Multipart form of the upload endpoint, for the API docs only.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadSheetRequest {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
