//! Per-employee category buckets shown on a salary slip.

use serde::Serialize;
use utoipa::ToSchema;

use super::row::PayrollRow;

/// A slip line: printed label plus the logical key it is read from.
#[derive(Debug, Clone, Copy)]
pub struct SlipField {
    pub label: &'static str,
    pub key: &'static str,
}

const fn field(label: &'static str, key: &'static str) -> SlipField {
    SlipField { label, key }
}

pub const INCOME_FIELDS: [SlipField; 9] = [
    field("Basic Salary", "BasicSalary"),
    field("Yearly Working Allowance", "YearlyWorkingAllowance"),
    field("Skill Allowance", "SkillAllowance"),
    field("Meal Allowance", "MealAllowance"),
    field("Transport", "Transport"),
    field("Productivity", "Productivity"),
    field("Overtime", "Overtime"),
    field("Meal Overtime", "MealOvertime"),
    field("Homework Allowance", "HomeworkAllowance"),
];

pub const DEDUCTION_FIELDS: [SlipField; 2] = [
    field("Other Deductions", "Other Deductions"),
    field("Advance Cash Deductions", "Adv cash deductions"),
];

pub const BENEFIT_FIELDS: [SlipField; 3] = [
    field("BPJS Health", "Benefit BPJS kesehatan"),
    field("BPJS Employment", "Benefit BPJS Tenaga Kerja"),
    field("PPH 21", "Benefit PPH 21"),
];

pub const TOTAL_EARNINGS_KEY: &str = "TotalEarnings";
pub const TOTAL_DEDUCTION_KEY: &str = "Total deduction";
// two spaces, matching the source sheet's header
pub const TOTAL_BENEFIT_KEY: &str = "Total  benefit";
pub const NET_PAY_KEY: &str = "NetPay";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SlipLine {
    #[schema(example = "Basic Salary")]
    pub label: String,
    #[schema(example = 5000000.0)]
    pub amount: f64,
}

/// Slip figures for one employee.
///
/// The totals come straight from their own columns; the sheet is the system of record and
/// they are not re-derived from the bucket lines.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayrollBreakdown {
    pub income: Vec<SlipLine>,
    pub deduction: Vec<SlipLine>,
    pub benefit: Vec<SlipLine>,
    pub total_earnings: f64,
    pub total_deduction: f64,
    pub total_benefit: f64,
    pub net_pay: f64,
}

impl PayrollBreakdown {
    pub fn from_row(row: &PayrollRow) -> Self {
        Self {
            income: bucket(row, &INCOME_FIELDS),
            deduction: bucket(row, &DEDUCTION_FIELDS),
            benefit: bucket(row, &BENEFIT_FIELDS),
            total_earnings: row.amount(TOTAL_EARNINGS_KEY),
            total_deduction: row.amount(TOTAL_DEDUCTION_KEY),
            total_benefit: row.amount(TOTAL_BENEFIT_KEY),
            net_pay: row.amount(NET_PAY_KEY),
        }
    }

    /// Longest bucket; the slip table has this many body rows.
    pub fn line_count(&self) -> usize {
        self.income
            .len()
            .max(self.deduction.len())
            .max(self.benefit.len())
    }
}

fn bucket(row: &PayrollRow, fields: &[SlipField]) -> Vec<SlipLine> {
    fields
        .iter()
        .map(|f| SlipLine {
            label: f.label.to_string(),
            amount: row.amount(f.key),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_buckets_keep_declaration_order() {
        let row: PayrollRow = serde_json::from_value(json!({
            "Name": "Ana",
            "HomeworkAllowance": "Rp 10.000",
            "BasicSalary": "Rp 5.000.000",
            "Benefit PPH 21": 25000
        }))
        .unwrap();

        let breakdown = PayrollBreakdown::from_row(&row);
        let labels: Vec<&str> = breakdown.income.iter().map(|l| l.label.as_str()).collect();

        assert_eq!(labels.first(), Some(&"Basic Salary"));
        assert_eq!(labels.last(), Some(&"Homework Allowance"));
        assert_eq!(breakdown.income[0].amount, 5_000_000.0);
        assert_eq!(breakdown.income[8].amount, 10_000.0);
        assert_eq!(breakdown.benefit[2].amount, 25_000.0);
        assert_eq!(breakdown.deduction.len(), 2);
        assert_eq!(breakdown.line_count(), 9);
    }

    #[test]
    fn test_totals_are_read_not_summed() {
        let row: PayrollRow = serde_json::from_value(json!({
            "Name": "Ana",
            "BasicSalary": 5_000_000,
            "TotalEarnings": 1_000,
            "Total Benefit": 700,
            "Net Pay": 900
        }))
        .unwrap();

        let breakdown = PayrollBreakdown::from_row(&row);
        assert_eq!(breakdown.total_earnings, 1_000.0);
        assert_eq!(breakdown.total_benefit, 700.0);
        assert_eq!(breakdown.total_deduction, 0.0);
        assert_eq!(breakdown.net_pay, 900.0);
    }
}
