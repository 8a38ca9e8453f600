//! GST on invoice amounts.
//!
//! [`calculate_gst`] is the per-transaction helper used at ingestion time.
//! [`split_gst`] breaks the same figure into its CGST/SGST or IGST
//! components for intra- and inter-state supplies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FreelanceTaxError;
use crate::types::{check_amount, round_to_rupee, with_metadata, ComputationOutput, Money, Percent};
use crate::FreelanceTaxResult;

/// Standard GST rate slabs in percent.
pub const STANDARD_GST_RATES: [u8; 5] = [0, 5, 12, 18, 28];

/// GST on `amount` at `gst_rate_percent`, rounded to the rupee.
///
/// No bounds are enforced on the rate.
pub fn calculate_gst(amount: Money, gst_rate_percent: Percent) -> Money {
    round_to_rupee(amount * gst_rate_percent / Decimal::ONE_HUNDRED)
}

/// Place-of-supply classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    /// Supplier and recipient in the same state: CGST + SGST
    #[default]
    IntraState,
    /// Across states: IGST
    InterState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstBreakdown {
    pub taxable_value: Money,
    pub gst_rate: Percent,
    pub supply_type: SupplyType,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    pub total_gst: Money,
    /// Taxable value plus GST
    pub invoice_total: Money,
}

/// Split the GST on `amount` into its components.
///
/// The total always equals [`calculate_gst`]; for intra-state supplies an
/// odd-rupee total leaves half a rupee on each of CGST and SGST.
pub fn split_gst(amount: Money, gst_rate_percent: Percent, supply_type: SupplyType) -> GstBreakdown {
    let total_gst = calculate_gst(amount, gst_rate_percent);
    let (cgst, sgst, igst) = match supply_type {
        SupplyType::IntraState => {
            let cgst = total_gst / Decimal::TWO;
            (cgst, total_gst - cgst, Decimal::ZERO)
        }
        SupplyType::InterState => (Decimal::ZERO, Decimal::ZERO, total_gst),
    };

    GstBreakdown {
        taxable_value: amount,
        gst_rate: gst_rate_percent,
        supply_type,
        cgst,
        sgst,
        igst,
        total_gst,
        invoice_total: amount + total_gst,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GstInput {
    /// Taxable value of the invoice
    pub amount: Money,
    /// GST rate in percent (18 = 18%)
    pub gst_rate: Percent,
    #[serde(default)]
    pub supply_type: SupplyType,
}

/// Validated GST breakdown wrapped in the standard output envelope.
pub fn compute_gst(input: &GstInput) -> FreelanceTaxResult<ComputationOutput<GstBreakdown>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    check_amount("amount", "Invoice amount", input.amount)?;
    if input.gst_rate < Decimal::ZERO || input.gst_rate > Decimal::ONE_HUNDRED {
        return Err(FreelanceTaxError::InvalidInput {
            field: "gst_rate".into(),
            reason: format!("GST rate must be between 0 and 100%, got {}", input.gst_rate),
        });
    }
    if !STANDARD_GST_RATES
        .iter()
        .any(|r| Decimal::from(*r) == input.gst_rate)
    {
        warnings.push(format!(
            "GST rate {}% is not one of the standard slabs (0, 5, 12, 18, 28)",
            input.gst_rate
        ));
    }

    let breakdown = split_gst(input.amount, input.gst_rate, input.supply_type);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "GST = taxable value x rate, rounded to the rupee; CGST/SGST halves intra-state, IGST inter-state",
        input,
        warnings,
        elapsed,
        breakdown,
    ))
}
