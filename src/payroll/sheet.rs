//! Workbook parsing: first worksheet, first row as headers, one `PayrollRow` per employee.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::io::Cursor;

use super::cell::CellValue;
use super::row::PayrollRow;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Unable to read workbook: {0}")]
    Open(#[source] calamine::Error),
    #[error("Workbook contains no worksheets")]
    NoWorksheet,
    #[error("Unable to read first worksheet: {0}")]
    Range(#[source] calamine::Error),
    #[error("First worksheet has no header row")]
    MissingHeader,
}

/// Cleaned headers plus the employee rows of a workbook.
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<PayrollRow>,
}

pub fn parse_workbook(bytes: &[u8]) -> Result<ParsedSheet, SheetError> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(SheetError::Open)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)?
        .map_err(SheetError::Range)?;

    let mut sheet_rows = range.rows();
    let header_row = sheet_rows.next().ok_or(SheetError::MissingHeader)?;
    let raw_headers = header_names(header_row);

    let rows: Vec<PayrollRow> = sheet_rows
        .map(|cells| {
            PayrollRow::from_cells(raw_headers.iter().enumerate().map(|(col, header)| {
                let value = cells.get(col).map(cell_value).unwrap_or(CellValue::Empty);
                (header.as_str(), value)
            }))
        })
        .filter(PayrollRow::is_employee)
        .collect();

    let headers = PayrollRow::from_cells(raw_headers.iter().map(|h| (h.as_str(), CellValue::Empty)))
        .headers()
        .map(str::to_string)
        .collect();

    log::debug!(
        "Parsed workbook: {} columns, {} employee rows",
        raw_headers.len(),
        rows.len()
    );

    Ok(ParsedSheet { headers, rows })
}

/// Header text per column. Blank headers become `Unnamed: <col>` so row cleanup drops them,
/// repeated headers get a numeric suffix.
fn header_names(cells: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    cells
        .iter()
        .enumerate()
        .map(|(col, cell)| {
            let text = cell.to_string().trim().to_string();
            let base = if text.is_empty() {
                format!("Unnamed: {}", col)
            } else {
                text
            };

            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{}_{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::Text(format_indonesian_date(datetime.date())),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Long Indonesian date, e.g. "5 Januari 2024".
pub fn format_indonesian_date(date: NaiveDate) -> String {
    let months = [
        "Januari",
        "Februari",
        "Maret",
        "April",
        "Mei",
        "Juni",
        "Juli",
        "Agustus",
        "September",
        "Oktober",
        "November",
        "Desember",
    ];

    let month = months[(date.month0() as usize).min(months.len() - 1)];
    format!("{} {} {}", date.day(), month, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_names_fill_blanks_and_dedupe() {
        let headers = header_names(&[
            Data::String("Name".into()),
            Data::Empty,
            Data::String(" Email ".into()),
            Data::String("Name".into()),
        ]);
        assert_eq!(headers, vec!["Name", "Unnamed: 1", "Email", "Name_1"]);
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            cell_value(&Data::String("Rp 1.000".into())),
            CellValue::Text("Rp 1.000".into())
        );
    }

    #[test]
    fn test_format_indonesian_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_indonesian_date(date), "5 Januari 2024");
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let result = parse_workbook(b"definitely not a workbook");
        assert!(matches!(result, Err(SheetError::Open(_))));
    }
}
