use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FreelanceTaxError;
use crate::FreelanceTaxResult;

/// All monetary values, in rupees. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.04 = 4%).
pub type Rate = Decimal;

/// Percentages as quoted by the tax code (18 = 18%). Only used where the
/// statute or the invoice states a percentage, e.g. slab and GST rates.
pub type Percent = Decimal;

/// Largest amount (₹10^15) accepted by the validating entry points.
///
/// Far below `Decimal::MAX`, so slab, cess, GST and ledger arithmetic on
/// accepted inputs cannot overflow.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Reject a negative amount or one above [`MAX_AMOUNT`].
///
/// `label` names the quantity in the error reason, e.g. "Total income".
pub fn check_amount(field: &str, label: &str, amount: Money) -> FreelanceTaxResult<()> {
    if amount < Decimal::ZERO {
        return Err(FreelanceTaxError::InvalidInput {
            field: field.into(),
            reason: format!("{label} cannot be negative"),
        });
    }
    if amount > MAX_AMOUNT {
        return Err(FreelanceTaxError::InvalidInput {
            field: field.into(),
            reason: format!("{label} exceeds the supported maximum of {MAX_AMOUNT}"),
        });
    }
    Ok(())
}

/// Round to the nearest whole rupee, ties away from zero.
pub fn round_to_rupee(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
