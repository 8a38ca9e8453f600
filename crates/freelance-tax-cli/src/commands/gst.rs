use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use freelance_tax_core::gst::calculator::{self, GstInput, SupplyType};

use crate::input;

/// Arguments for GST calculation
#[derive(Args)]
pub struct GstArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Taxable value of the invoice
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// GST rate in percent, e.g. 18
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Inter-state supply (IGST) instead of CGST + SGST
    #[arg(long)]
    pub inter_state: bool,
}

pub fn run_gst(args: GstArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let gst_input: GstInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let amount = args
            .amount
            .ok_or("--amount is required (or provide --input)")?;
        let gst_rate = args.rate.ok_or("--rate is required (or provide --input)")?;

        GstInput {
            amount,
            gst_rate,
            supply_type: if args.inter_state {
                SupplyType::InterState
            } else {
                SupplyType::IntraState
            },
        }
    };

    let result = calculator::compute_gst(&gst_input)?;
    Ok(serde_json::to_value(result)?)
}
