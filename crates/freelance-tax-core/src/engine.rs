//! Stateless tax engine facade.
//!
//! A [`TaxEngine`] is a plain value: an immutable [`TaxRegimeConfig`] plus a
//! [`Clock`]. It holds no mutable state, so one instance can be shared freely
//! across threads or constructed per request.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::TaxRegimeConfig;
use crate::fiscal::{current_financial_year, quarter_from_date, Clock, SystemClock};
use crate::gst::calculator::calculate_gst;
use crate::income_tax::advance_tax::{advance_tax_schedule, AdvanceTaxPayment};
use crate::income_tax::regime::{calculate_tax, TaxCalculationResult};
use crate::income_tax::slabs::progressive_tax;
use crate::types::{Money, Percent};
use crate::FreelanceTaxResult;

#[derive(Debug, Clone)]
pub struct TaxEngine<C: Clock = SystemClock> {
    config: TaxRegimeConfig,
    clock: C,
}

impl TaxEngine<SystemClock> {
    /// Engine with the built-in tax table, reading the system clock.
    pub fn new() -> Self {
        Self {
            config: TaxRegimeConfig::default(),
            clock: SystemClock,
        }
    }
}

impl Default for TaxEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TaxEngine<C> {
    /// Engine with a custom configuration and clock. The configuration is
    /// validated once here.
    pub fn with_clock(config: TaxRegimeConfig, clock: C) -> FreelanceTaxResult<Self> {
        config.validate()?;
        Ok(Self { config, clock })
    }

    pub fn config(&self) -> &TaxRegimeConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Compare Section 44ADA and regular taxation for `total_income`.
    ///
    /// Never fails. Income must be non-negative for the result to mean
    /// anything; validating that is the caller's job.
    pub fn calculate_tax(
        &self,
        total_income: Money,
        has_health_insurance: bool,
    ) -> TaxCalculationResult {
        calculate_tax(
            total_income,
            has_health_insurance,
            self.today(),
            &self.config,
        )
    }

    /// Slab tax plus cess on an already-computed taxable figure, clamped at zero.
    pub fn income_tax_on(&self, taxable_income: Money) -> Money {
        progressive_tax(taxable_income.max(Decimal::ZERO), &self.config)
    }

    pub fn advance_tax_schedule(&self, annual_tax: Money) -> Vec<AdvanceTaxPayment> {
        advance_tax_schedule(annual_tax, self.today())
    }

    pub fn calculate_gst(&self, amount: Money, gst_rate_percent: Percent) -> Money {
        calculate_gst(amount, gst_rate_percent)
    }

    pub fn current_financial_year(&self) -> String {
        current_financial_year(self.today())
    }

    pub fn quarter_from_date(&self, date: NaiveDate) -> u8 {
        quarter_from_date(date)
    }
}
