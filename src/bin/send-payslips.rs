//! Command-line batch sender: emails a slip to every employee of a workbook on disk.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use payslip_server::config::DeliverySettings;
use payslip_server::delivery::DeliveryPipeline;
use payslip_server::payroll::sheet::parse_workbook;
use payslip_server::payroll::{display_rupiah, PayrollSummary};
use payslip_server::state::http_client;

#[derive(Parser, Debug)]
#[command(name = "send-payslips")]
#[command(version, about = "Email a salary slip to every employee in a payroll workbook")]
struct Args {
    /// Payroll workbook (.xlsx, .xls or .ods)
    workbook: PathBuf,

    /// Parse and print the totals without sending anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let args = Args::parse();

    let bytes = std::fs::read(&args.workbook)
        .with_context(|| format!("failed to read {}", args.workbook.display()))?;
    let sheet = parse_workbook(&bytes)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", args.workbook.display(), e))?;

    let summary = PayrollSummary::from_rows(&sheet.rows);
    println!(
        "{} employees, gross {}, deductions {}, net {}",
        summary.total_employees,
        display_rupiah(summary.gross_payroll),
        display_rupiah(summary.total_deductions),
        display_rupiah(summary.net_payroll)
    );
    if args.dry_run {
        return Ok(());
    }

    let settings = DeliverySettings::from_env()?;
    let pipeline = DeliveryPipeline::from_settings(&settings, http_client()?);
    let report = pipeline
        .deliver(&sheet.rows)
        .await
        .map_err(|e| anyhow::anyhow!("delivery batch failed: {}", e))?;

    for outcome in report.results.iter().filter(|o| o.error.is_some()) {
        eprintln!(
            "{}: {}",
            outcome.name.as_deref().unwrap_or("-"),
            outcome.error.as_deref().unwrap_or_default()
        );
    }
    println!("{}", report.tally());
    Ok(())
}
