use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

use super::cell::{normalize_amount, CellValue};
use super::lookup::comparison_key;

pub const NAME_FIELD: &str = "Name";
pub const EMAIL_FIELD: &str = "Email";

/// One spreadsheet row: column headers in sheet order mapped to their raw cells.
///
/// Headers are trimmed and parser artifacts (`Unnamed: 3`, ...) are dropped on construction.
/// The normalized-header index is built once here, so every lookup is a single hash lookup and
/// the first column in sheet order wins when two headers normalize to the same key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayrollRow {
    cells: Vec<(String, CellValue)>,
    index: HashMap<String, usize>,
}

impl PayrollRow {
    pub fn from_cells<I, K>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, CellValue)>,
        K: AsRef<str>,
    {
        let mut ordered: Vec<(String, CellValue)> = Vec::new();

        for (header, value) in cells {
            let header = header.as_ref().trim();
            if is_artifact_header(header) {
                continue;
            }
            match ordered.iter_mut().find(|(existing, _)| existing == header) {
                Some(slot) => slot.1 = value,
                None => ordered.push((header.to_string(), value)),
            }
        }

        let mut index = HashMap::with_capacity(ordered.len());
        for (position, (header, _)) in ordered.iter().enumerate() {
            index.entry(comparison_key(header)).or_insert(position);
        }

        Self {
            cells: ordered,
            index,
        }
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(header, _)| header.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Fuzzy lookup of a logical field key.
    pub fn field(&self, key: &str) -> Option<&CellValue> {
        self.index
            .get(&comparison_key(key))
            .map(|&position| &self.cells[position].1)
    }

    pub fn amount(&self, key: &str) -> f64 {
        normalize_amount(self.field(key))
    }

    /// Non-blank text of a field, untrimmed.
    pub fn text(&self, key: &str) -> Option<String> {
        self.field(key)
            .filter(|cell| !cell.is_blank())
            .map(CellValue::display)
    }

    pub fn name(&self) -> Option<String> {
        self.text(NAME_FIELD)
    }

    pub fn email(&self) -> Option<String> {
        self.text(EMAIL_FIELD).map(|email| email.trim().to_string())
    }

    /// A row only counts as an employee record when it carries a name.
    pub fn is_employee(&self) -> bool {
        self.name().is_some()
    }
}

fn is_artifact_header(header: &str) -> bool {
    header.to_lowercase().contains("unnamed")
}

impl Serialize for PayrollRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PayrollRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Self::from_cells(
            object
                .into_iter()
                .map(|(header, value)| (header, CellValue::from(value))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> PayrollRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_fuzzy_field_ignores_case_and_spaces() {
        let r = row(json!({"Name": "Ana", "Basic  Salary": "Rp 5.000.000"}));
        assert_eq!(r.amount("BasicSalary"), 5_000_000.0);
        assert_eq!(r.amount("basic salary"), 5_000_000.0);
    }

    #[test]
    fn test_first_header_wins_on_collision() {
        let r = row(json!({"Net Pay": 100, "NetPay": 200}));
        assert_eq!(r.amount("NetPay"), 100.0);
    }

    #[test]
    fn test_unnamed_headers_are_stripped_and_headers_trimmed() {
        let r = row(json!({" Name ": "Ana", "Unnamed: 4": "junk", "__UNNAMED_1": 3}));
        let headers: Vec<&str> = r.headers().collect();
        assert_eq!(headers, vec!["Name"]);
    }

    #[test]
    fn test_trimmed_duplicate_keeps_first_position_and_last_value() {
        let r = PayrollRow::from_cells(vec![
            ("Name", CellValue::from("Ana")),
            ("Email", CellValue::from("old@x.com")),
            ("Email ", CellValue::from("new@x.com")),
        ]);
        assert_eq!(r.len(), 2);
        assert_eq!(r.email().as_deref(), Some("new@x.com"));
    }

    #[test]
    fn test_blank_name_is_not_an_employee() {
        assert!(!row(json!({"Name": "  "})).is_employee());
        assert!(!row(json!({"Name": null})).is_employee());
        assert!(!row(json!({"Email": "a@x.com"})).is_employee());
        assert!(row(json!({"Name": "Ana"})).is_employee());
    }

    #[test]
    fn test_serialization_preserves_column_order() {
        let r = row(json!({"Name": "Ana", "Zeta": 1, "Alpha": 2}));
        let out = serde_json::to_string(&r).unwrap();
        assert_eq!(out, r#"{"Name":"Ana","Zeta":1.0,"Alpha":2.0}"#);
    }
}
