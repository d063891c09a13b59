//! Payroll module - spreadsheet rows, normalized amounts and batch totals.
//!
//! - `cell` / `lookup` / `row` - raw cells and the fuzzy header lookup
//! - `breakdown` / `summary` - per-employee buckets and batch totals
//! - `format` - Rupiah display
//! - `sheet` - workbook parsing
//! - `handlers` - HTTP endpoints under `/api/payroll`

pub mod breakdown;
pub mod cell;
pub mod format;
pub mod handlers;
pub mod lookup;
pub mod models;
pub mod row;
pub mod sheet;
pub mod summary;

pub use breakdown::{PayrollBreakdown, SlipLine};
pub use cell::{normalize_amount, CellValue};
pub use format::{display_rupiah, format_rupiah};
pub use lookup::{field_amount, find_field};
pub use row::PayrollRow;
pub use summary::PayrollSummary;
