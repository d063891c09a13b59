//! Everything printed on a slip, resolved to display strings before any drawing happens.

use crate::payroll::breakdown::{PayrollBreakdown, SlipLine};
use crate::payroll::format::display_rupiah;
use crate::payroll::row::PayrollRow;

const MISSING: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct SlipContent {
    pub employee_name: String,
    pub employee_id: String,
    pub position: String,
    pub hire_date: String,
    pub working_days: String,
    pub location: String,
    pub breakdown: PayrollBreakdown,
}

/// One body row of the three-column table; `None` where a shorter bucket has run out.
pub type SlipTableRow = [Option<(String, String)>; 3];

impl SlipContent {
    pub fn from_row(row: &PayrollRow) -> Self {
        let text = |key: &str| row.text(key).unwrap_or_else(|| MISSING.to_string());

        Self {
            employee_name: text("Name"),
            employee_id: text("EmployeeID"),
            position: text("Position"),
            hire_date: text("HireDate"),
            working_days: text("WorkingDays"),
            location: text("Location"),
            breakdown: PayrollBreakdown::from_row(row),
        }
    }

    /// Label/value pairs of the employee info block, two per printed line.
    pub fn info_lines(&self) -> [[(&'static str, &str); 2]; 3] {
        [
            [
                ("ID", self.employee_id.as_str()),
                ("Position", self.position.as_str()),
            ],
            [
                ("Name", self.employee_name.as_str()),
                ("Hire Date", self.hire_date.as_str()),
            ],
            [
                ("Working Days", self.working_days.as_str()),
                ("Location", self.location.as_str()),
            ],
        ]
    }

    pub fn table_rows(&self) -> Vec<SlipTableRow> {
        let b = &self.breakdown;
        (0..b.line_count())
            .map(|i| {
                [
                    display_line(b.income.get(i)),
                    display_line(b.deduction.get(i)),
                    display_line(b.benefit.get(i)),
                ]
            })
            .collect()
    }

    /// Income, deduction and benefit totals as printed on the TOTAL row.
    pub fn totals(&self) -> [String; 3] {
        let b = &self.breakdown;
        [
            display_rupiah(b.total_earnings),
            display_rupiah(b.total_deduction),
            display_rupiah(b.total_benefit),
        ]
    }

    pub fn take_home_pay(&self) -> String {
        display_rupiah(self.breakdown.net_pay)
    }

    pub fn attachment_name(&self) -> String {
        attachment_name(&self.employee_name)
    }
}

fn display_line(line: Option<&SlipLine>) -> Option<(String, String)> {
    line.map(|l| (l.label.clone(), display_rupiah(l.amount)))
}

/// Attachment filename for an employee's slip.
pub fn attachment_name(employee_name: &str) -> String {
    format!("Salary-Slip-{}.pdf", employee_name)
}
