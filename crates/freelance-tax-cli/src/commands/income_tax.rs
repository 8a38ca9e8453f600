use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use freelance_tax_core::income_tax::advance_tax::{self, AdvanceTaxInput};
use freelance_tax_core::income_tax::regime::{self, TaxComparisonInput};
use freelance_tax_core::TaxRegimeConfig;

use crate::input;

/// Arguments for the Section 44ADA vs regular comparison
#[derive(Args)]
pub struct TaxArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross professional receipts for the year
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Claim the health-insurance deduction in the regular computation
    #[arg(long)]
    pub health_insurance: bool,

    /// Compute as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_tax(
    args: TaxArgs,
    config: Option<TaxRegimeConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut tax_input: TaxComparisonInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let income = args
            .income
            .ok_or("--income is required (or provide --input)")?;

        TaxComparisonInput {
            total_income: income,
            has_health_insurance: args.health_insurance,
            as_of: args.as_of,
            config: None,
        }
    };

    if tax_input.config.is_none() {
        tax_input.config = config;
    }

    let result = regime::compare_tax_schemes(&tax_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the advance-tax schedule
#[derive(Args)]
pub struct AdvanceTaxArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual income tax to schedule
    #[arg(long)]
    pub annual_tax: Option<Decimal>,

    /// Compute as of this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_advance_tax(args: AdvanceTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: AdvanceTaxInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let annual_tax = args
            .annual_tax
            .ok_or("--annual-tax is required (or provide --input)")?;

        AdvanceTaxInput {
            annual_tax,
            as_of: args.as_of,
        }
    };

    let result = advance_tax::build_advance_tax_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}
