//! Raw spreadsheet cells and the tolerant amount normalizer.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref RUPIAH_PREFIX: Regex = Regex::new(r"Rp\s*").expect("valid currency prefix pattern");
}

/// Content of a single spreadsheet cell as the parser or the UI produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Text form used when a cell is printed verbatim (names, positions, dates).
    pub fn display(&self) -> String {
        match self {
            CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(text) => text.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Empty,
            serde_json::Value::Bool(b) => CellValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
            serde_json::Value::String(s) => CellValue::Text(s),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Convert a located cell into a Rupiah amount.
///
/// Never fails: absent, blank, malformed and non-finite inputs all come out as `0`.
pub fn normalize_amount(cell: Option<&CellValue>) -> f64 {
    let value = match cell {
        None | Some(CellValue::Empty) => 0.0,
        Some(CellValue::Number(n)) => *n,
        Some(CellValue::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(CellValue::Text(text)) => parse_amount_text(text),
    };

    // folds NaN, infinities and -0 into 0
    if value.is_finite() && value != 0.0 {
        value
    } else {
        0.0
    }
}

fn parse_amount_text(text: &str) -> f64 {
    let stripped = RUPIAH_PREFIX.replace_all(text, "");
    let cleaned: String = stripped.chars().filter(|c| *c != '.' && *c != ',').collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return 0.0;
    }

    cleaned.parse::<f64>().unwrap_or(0.0)
}
