use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::debug;

use crate::config::TaxRegimeConfig;
use crate::fiscal::{Clock, SystemClock};
use crate::income_tax::advance_tax::{advance_tax_schedule, check_schedulable, AdvanceTaxPayment};
use crate::income_tax::slabs::progressive_tax;
use crate::types::{check_amount, with_metadata, ComputationOutput, Money};
use crate::FreelanceTaxResult;

/// Scheme under which business income is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxScheme {
    /// Presumptive taxation for professionals (Section 44ADA)
    #[serde(rename = "section44ada")]
    Section44ada,
    /// Receipts less expenses and deductions
    #[serde(rename = "regular")]
    Regular,
}

impl fmt::Display for TaxScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxScheme::Section44ada => f.write_str("section44ada"),
            TaxScheme::Regular => f.write_str("regular"),
        }
    }
}

/// Side-by-side result of both schemes for one year's receipts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    /// Gross professional receipts
    pub total_income: Money,
    /// Presumptive income (receipts times the presumptive ratio)
    pub section_44ada_income: Money,
    /// Presumptive income after the standard deduction, floored at zero
    pub section_44ada_taxable_income: Money,
    /// Receipts after assumed expenses and deductions, floored at zero
    pub regular_taxable_income: Money,
    pub section_44ada_tax: Money,
    pub regular_tax: Money,
    /// The cheaper scheme; Section 44ADA wins ties
    pub recommended_scheme: TaxScheme,
    /// Tax under the recommended scheme
    pub final_tax: Money,
    /// Absolute difference between the two schemes
    pub savings: Money,
    /// Cumulative installments of `final_tax`
    pub advance_tax_schedule: Vec<AdvanceTaxPayment>,
}

impl TaxCalculationResult {
    /// Taxable income under the recommended scheme.
    pub fn recommended_taxable_income(&self) -> Money {
        match self.recommended_scheme {
            TaxScheme::Section44ada => self.section_44ada_taxable_income,
            TaxScheme::Regular => self.regular_taxable_income,
        }
    }
}

/// Compare presumptive and regular taxation for `total_income`.
///
/// Presumptive: receipts x presumptive ratio, less the standard deduction.
/// Regular: receipts less assumed expenses (a flat share of receipts), the
/// standard deduction and, when `has_health_insurance`, the health-insurance
/// deduction. Both taxable figures are clamped at zero before slab tax.
///
/// Total over non-negative income; `today` only anchors the advance-tax
/// schedule.
pub fn calculate_tax(
    total_income: Money,
    has_health_insurance: bool,
    today: NaiveDate,
    config: &TaxRegimeConfig,
) -> TaxCalculationResult {
    let section_44ada_income = total_income * config.presumptive_ratio;
    let section_44ada_taxable_income =
        (section_44ada_income - config.standard_deduction).max(Decimal::ZERO);
    let section_44ada_tax = progressive_tax(section_44ada_taxable_income, config);

    let assumed_expenses = total_income * config.assumed_expense_ratio;
    let health_deduction = if has_health_insurance {
        config.health_insurance_deduction
    } else {
        Decimal::ZERO
    };
    let regular_taxable_income = (total_income
        - assumed_expenses
        - config.standard_deduction
        - health_deduction)
        .max(Decimal::ZERO);
    let regular_tax = progressive_tax(regular_taxable_income, config);

    let recommended_scheme = if section_44ada_tax <= regular_tax {
        TaxScheme::Section44ada
    } else {
        TaxScheme::Regular
    };
    let final_tax = match recommended_scheme {
        TaxScheme::Section44ada => section_44ada_tax,
        TaxScheme::Regular => regular_tax,
    };
    let savings = (section_44ada_tax - regular_tax).abs();

    debug!(
        %total_income,
        %section_44ada_tax,
        %regular_tax,
        scheme = %recommended_scheme,
        "compared tax schemes"
    );

    TaxCalculationResult {
        total_income,
        section_44ada_income,
        section_44ada_taxable_income,
        regular_taxable_income,
        section_44ada_tax,
        regular_tax,
        recommended_scheme,
        final_tax,
        savings,
        advance_tax_schedule: advance_tax_schedule(final_tax, today),
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Input for a validated scheme comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxComparisonInput {
    /// Gross professional receipts for the year
    pub total_income: Money,
    #[serde(default)]
    pub has_health_insurance: bool,
    /// Date the advance-tax schedule is computed as of; defaults to today
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    /// Tax-law parameters; defaults to the built-in financial year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<TaxRegimeConfig>,
}

/// Validate the input, compare both schemes and wrap the result with
/// methodology, assumptions and warnings.
pub fn compare_tax_schemes(
    input: &TaxComparisonInput,
) -> FreelanceTaxResult<ComputationOutput<TaxCalculationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    check_amount("total_income", "Total income", input.total_income)?;

    let default_config = TaxRegimeConfig::default();
    let config = match &input.config {
        Some(config) => {
            config.validate()?;
            config
        }
        None => &default_config,
    };
    let today = input.as_of.unwrap_or_else(|| SystemClock.today());
    check_schedulable(today)?;

    let result = calculate_tax(input.total_income, input.has_health_insurance, today, config);

    if result.section_44ada_tax == result.regular_tax && result.final_tax > Decimal::ZERO {
        warnings.push(
            "Both schemes produce the same tax; Section 44ADA is recommended as it \
             does not require detailed books of account."
                .to_string(),
        );
    }
    if result.recommended_scheme == TaxScheme::Regular {
        warnings.push(format!(
            "Regular computation assumes expenses of {}% of receipts; keep bills \
             and books of account to substantiate actual expenses.",
            (config.assumed_expense_ratio * Decimal::ONE_HUNDRED).normalize()
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Section 44ADA presumptive vs regular computation, progressive slabs with \
         health and education cess",
        &serde_json::json!({
            "financial_year": config.financial_year,
            "total_income": input.total_income.to_string(),
            "has_health_insurance": input.has_health_insurance,
            "presumptive_ratio": config.presumptive_ratio.to_string(),
            "assumed_expense_ratio": config.assumed_expense_ratio.to_string(),
            "standard_deduction": config.standard_deduction.to_string(),
            "health_insurance_deduction": config.health_insurance_deduction.to_string(),
            "cess_rate": config.cess_rate.to_string(),
            "as_of": today.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}
