use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use freelance_tax_core::ledger::summary::{self, LedgerInput};
use freelance_tax_core::ledger::transactions::Transaction;
use freelance_tax_core::TaxRegimeConfig;

use crate::input;

/// Arguments for the ledger summary
#[derive(Args)]
pub struct SummaryArgs {
    /// Path to a JSON ledger: either a transaction array or a full ledger object
    #[arg(long)]
    pub input: Option<String>,

    /// Claim the health-insurance deduction in the regular computation
    #[arg(long)]
    pub health_insurance: bool,

    /// Compute as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Keep only transactions in this financial year, e.g. 2024-25
    #[arg(long)]
    pub financial_year: Option<String>,
}

pub fn run_summary(
    args: SummaryArgs,
    config: Option<TaxRegimeConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let data: Value = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("Ledger data is required (provide --input or pipe JSON to stdin)".into());
    };

    let mut ledger: LedgerInput = match data {
        Value::Array(_) => {
            let transactions: Vec<Transaction> = serde_json::from_value(data)?;
            LedgerInput {
                transactions,
                has_health_insurance: false,
                as_of: None,
                financial_year: None,
                config: None,
            }
        }
        other => serde_json::from_value(other)?,
    };

    // Flags refine whatever the document supplied
    ledger.has_health_insurance |= args.health_insurance;
    if args.as_of.is_some() {
        ledger.as_of = args.as_of;
    }
    if args.financial_year.is_some() {
        ledger.financial_year = args.financial_year;
    }
    if ledger.config.is_none() {
        ledger.config = config;
    }

    let result = summary::summarize_ledger(&ledger)?;
    Ok(serde_json::to_value(result)?)
}
