use chrono::NaiveDate;
use clap::Args;
use serde_json::{json, Value};

use freelance_tax_core::fiscal::{Clock, FinancialYear, FiscalPosition, SystemClock};

/// Arguments for financial-year resolution
#[derive(Args)]
pub struct FinancialYearArgs {
    /// Date to resolve (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for fiscal-quarter resolution
#[derive(Args)]
pub struct QuarterArgs {
    /// Date to resolve (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,
}

pub fn run_financial_year(args: FinancialYearArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let date = args.date.unwrap_or_else(|| SystemClock.today());
    let fy = FinancialYear::containing(date);

    Ok(json!({
        "date": date.to_string(),
        "financial_year": fy.label(),
        "start_date": fy.start_date().map(|d| d.to_string()),
        "end_date": fy.end_date().map(|d| d.to_string()),
    }))
}

pub fn run_quarter(args: QuarterArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(FiscalPosition::of(args.date))?)
}
