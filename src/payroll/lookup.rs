//! Case- and whitespace-insensitive field resolution.

use super::cell::{normalize_amount, CellValue};
use super::row::PayrollRow;

/// Key used to compare a logical field name with a column header.
pub fn comparison_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locate the raw cell behind a logical key, if the row has a matching header.
pub fn find_field<'a>(row: Option<&'a PayrollRow>, key: &str) -> Option<&'a CellValue> {
    row.and_then(|r| r.field(key))
}

/// Locate and normalize in one step.
pub fn field_amount(row: Option<&PayrollRow>, key: &str) -> f64 {
    normalize_amount(find_field(row, key))
}
