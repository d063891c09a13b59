//! Batch totals across every employee of an uploaded sheet.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::breakdown::{NET_PAY_KEY, TOTAL_DEDUCTION_KEY, TOTAL_EARNINGS_KEY};
use super::row::PayrollRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayrollSummary {
    #[schema(example = 42)]
    pub total_employees: usize,
    #[schema(example = 210000000.0)]
    pub gross_payroll: f64,
    #[schema(example = 3500000.0)]
    pub total_deductions: f64,
    #[schema(example = 206500000.0)]
    pub net_payroll: f64,
}

impl PayrollSummary {
    pub fn from_rows(rows: &[PayrollRow]) -> Self {
        let employees: Vec<&PayrollRow> = rows.iter().filter(|r| r.is_employee()).collect();

        Self {
            total_employees: employees.len(),
            gross_payroll: sum_field(&employees, TOTAL_EARNINGS_KEY),
            total_deductions: sum_field(&employees, TOTAL_DEDUCTION_KEY),
            net_payroll: sum_field(&employees, NET_PAY_KEY),
        }
    }
}

/// Sum of the normalized amount of `key` over `rows`.
pub fn sum_field(rows: &[&PayrollRow], key: &str) -> f64 {
    rows.iter().map(|row| row.amount(key)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_skips_rows_without_name() {
        let rows: Vec<PayrollRow> = serde_json::from_value(json!([
            {"Name": "Ana", "TotalEarnings": "Rp 5.000.000", "Total deduction": "Rp 100.000", "NetPay": "Rp 4.900.000"},
            {"Name": "Budi", "TotalEarnings": 3000000, "NetPay": 3000000},
            {"Name": "", "TotalEarnings": 999}
        ]))
        .unwrap();

        let summary = PayrollSummary::from_rows(&rows);
        assert_eq!(summary.total_employees, 2);
        assert_eq!(summary.gross_payroll, 8_000_000.0);
        assert_eq!(summary.total_deductions, 100_000.0);
        assert_eq!(summary.net_payroll, 7_900_000.0);
    }

    #[test]
    fn test_empty_batch() {
        let summary = PayrollSummary::from_rows(&[]);
        assert_eq!(summary.total_employees, 0);
        assert_eq!(summary.net_payroll, 0.0);
    }
}
