use rust_decimal::Decimal;
use tracing::trace;

use crate::config::{TaxRegimeConfig, TaxSlab};
use crate::types::{round_to_rupee, Money};

/// Slab tax before cess and rounding.
///
/// Each slab taxes only the part of `taxable_income` that falls between its
/// bounds; slabs the income never reaches contribute nothing.
pub fn slab_tax(taxable_income: Money, slabs: &[TaxSlab]) -> Money {
    slabs
        .iter()
        .map(|slab| slab.portion_of(taxable_income) * slab.rate / Decimal::ONE_HUNDRED)
        .sum()
}

/// Income tax on `taxable_income`: slab tax, plus cess, rounded to the rupee.
///
/// Callers clamp negative figures to zero first; the function assumes a
/// non-negative input.
pub fn progressive_tax(taxable_income: Money, config: &TaxRegimeConfig) -> Money {
    let subtotal = slab_tax(taxable_income, &config.slabs);
    let tax = round_to_rupee(subtotal * (Decimal::ONE + config.cess_rate));
    trace!(%taxable_income, %subtotal, %tax, "progressive tax");
    tax
}
