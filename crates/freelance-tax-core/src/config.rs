use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FreelanceTaxError;
use crate::types::{Money, Percent, Rate, MAX_AMOUNT};
use crate::FreelanceTaxResult;

/// Financial year the built-in slab table applies to.
pub const CONFIGURED_FINANCIAL_YEAR: &str = "2024-25";

/// Flat standard deduction available under both schemes.
pub const STANDARD_DEDUCTION: Money = dec!(50000);

/// Additional deduction for health-insurance premiums (regular scheme only).
pub const HEALTH_INSURANCE_DEDUCTION: Money = dec!(25000);

/// Health & Education Cess applied on top of slab tax.
pub const CESS_RATE: Rate = dec!(0.04);

/// Share of gross receipts deemed to be income under Section 44ADA.
pub const PRESUMPTIVE_RATIO: Rate = dec!(0.50);

/// Expenses assumed under the regular scheme, as a share of gross receipts.
/// Actual deductible expenses are not tracked, so this is a flat estimate.
pub const ASSUMED_EXPENSE_RATIO: Rate = dec!(0.10);

/// One band of the progressive income tax table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    /// Income above which this slab starts to apply
    pub lower_bound: Money,
    /// Upper edge of the slab; `None` for the final, unbounded slab
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Money>,
    /// Statutory rate for this slab, in percent
    pub rate: Percent,
}

impl TaxSlab {
    pub fn new(lower_bound: Money, upper_bound: Option<Money>, rate: Percent) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    /// Portion of `taxable_income` falling inside this slab.
    pub fn portion_of(&self, taxable_income: Money) -> Money {
        if taxable_income <= self.lower_bound {
            return Decimal::ZERO;
        }
        let top = match self.upper_bound {
            Some(upper) => taxable_income.min(upper),
            None => taxable_income,
        };
        top - self.lower_bound
    }
}

/// The slab table for the configured financial year.
pub fn default_slabs() -> Vec<TaxSlab> {
    vec![
        TaxSlab::new(dec!(0), Some(dec!(300000)), dec!(0)),
        TaxSlab::new(dec!(300000), Some(dec!(700000)), dec!(5)),
        TaxSlab::new(dec!(700000), Some(dec!(1000000)), dec!(10)),
        TaxSlab::new(dec!(1000000), Some(dec!(1200000)), dec!(15)),
        TaxSlab::new(dec!(1200000), Some(dec!(1500000)), dec!(20)),
        TaxSlab::new(dec!(1500000), None, dec!(30)),
    ]
}

/// Immutable tax-law parameters for one financial year.
///
/// `Default` yields the built-in table; a JSON or YAML document may override
/// any subset of fields. Call [`TaxRegimeConfig::validate`] on anything that
/// did not come from `Default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRegimeConfig {
    pub financial_year: String,
    pub slabs: Vec<TaxSlab>,
    pub standard_deduction: Money,
    pub health_insurance_deduction: Money,
    pub cess_rate: Rate,
    pub presumptive_ratio: Rate,
    pub assumed_expense_ratio: Rate,
}

impl Default for TaxRegimeConfig {
    fn default() -> Self {
        Self {
            financial_year: CONFIGURED_FINANCIAL_YEAR.to_string(),
            slabs: default_slabs(),
            standard_deduction: STANDARD_DEDUCTION,
            health_insurance_deduction: HEALTH_INSURANCE_DEDUCTION,
            cess_rate: CESS_RATE,
            presumptive_ratio: PRESUMPTIVE_RATIO,
            assumed_expense_ratio: ASSUMED_EXPENSE_RATIO,
        }
    }
}

impl TaxRegimeConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> FreelanceTaxResult<Self> {
        let config: TaxRegimeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the slab table is contiguous, ascending and open-ended, and that
    /// every deduction and ratio is in range.
    pub fn validate(&self) -> FreelanceTaxResult<()> {
        let first = self
            .slabs
            .first()
            .ok_or_else(|| FreelanceTaxError::InvalidConfig("slab table is empty".into()))?;
        if !first.lower_bound.is_zero() {
            return Err(FreelanceTaxError::InvalidConfig(format!(
                "first slab must start at 0, starts at {}",
                first.lower_bound
            )));
        }

        let last_index = self.slabs.len() - 1;
        for (i, slab) in self.slabs.iter().enumerate() {
            if slab.rate < Decimal::ZERO || slab.rate > dec!(100) {
                return Err(FreelanceTaxError::InvalidConfig(format!(
                    "slab {i} rate {} is outside 0-100%",
                    slab.rate
                )));
            }
            match slab.upper_bound {
                None if i != last_index => {
                    return Err(FreelanceTaxError::InvalidConfig(format!(
                        "slab {i} is unbounded but is not the final slab"
                    )));
                }
                None => {}
                Some(_) if i == last_index => {
                    return Err(FreelanceTaxError::InvalidConfig(
                        "final slab must be unbounded".into(),
                    ));
                }
                Some(upper) => {
                    if upper <= slab.lower_bound {
                        return Err(FreelanceTaxError::InvalidConfig(format!(
                            "slab {i} upper bound {upper} must exceed lower bound {}",
                            slab.lower_bound
                        )));
                    }
                    let next = &self.slabs[i + 1];
                    if next.lower_bound != upper {
                        return Err(FreelanceTaxError::InvalidConfig(format!(
                            "slab {} starts at {} but slab {i} ends at {upper}",
                            i + 1,
                            next.lower_bound
                        )));
                    }
                }
            }
        }

        check_non_negative("standard_deduction", self.standard_deduction)?;
        check_non_negative("health_insurance_deduction", self.health_insurance_deduction)?;
        check_unit_ratio("cess_rate", self.cess_rate)?;
        check_unit_ratio("presumptive_ratio", self.presumptive_ratio)?;
        check_unit_ratio("assumed_expense_ratio", self.assumed_expense_ratio)?;
        Ok(())
    }
}

fn check_non_negative(field: &str, value: Money) -> FreelanceTaxResult<()> {
    if value < Decimal::ZERO {
        return Err(FreelanceTaxError::InvalidConfig(format!(
            "{field} cannot be negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(FreelanceTaxError::InvalidConfig(format!(
            "{field} exceeds the supported maximum of {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

fn check_unit_ratio(field: &str, value: Rate) -> FreelanceTaxResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(FreelanceTaxError::InvalidConfig(format!(
            "{field} must be between 0 and 1, got {value}"
        )));
    }
    Ok(())
}
