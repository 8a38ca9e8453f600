use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::TaxRegimeConfig;
use crate::error::FreelanceTaxError;
use crate::fiscal::{Clock, FinancialYear, SystemClock};
use crate::income_tax::advance_tax::check_schedulable;
use crate::income_tax::regime::{calculate_tax, TaxCalculationResult};
use crate::ledger::advice::tax_advice;
use crate::ledger::transactions::{Transaction, TransactionKind};
use crate::types::{check_amount, with_metadata, ComputationOutput, Money, Rate};
use crate::FreelanceTaxResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub income: Money,
    pub expense: Money,
    pub count: u32,
    pub net: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Everything the dashboard and export need about one set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSummary {
    /// Financial year of the computation date
    pub financial_year: String,
    pub total_income: Money,
    pub total_expenses: Money,
    pub income_count: u32,
    pub expense_count: u32,
    /// GST charged on income invoices
    pub gst_collected: Money,
    /// GST paid on expense invoices
    pub gst_paid: Money,
    /// Collected less paid, floored at zero
    pub gst_liability: Money,
    pub tax: TaxCalculationResult,
    /// Income tax under the recommended scheme plus GST liability
    pub total_tax_liability: Money,
    /// Income tax over taxable income of the recommended scheme
    pub effective_tax_rate: Rate,
    /// Receipts less recorded expenses
    pub net_profit: Money,
    pub profit_margin: Rate,
    pub current_month_income: Money,
    pub current_month_expenses: Money,
    pub category_breakdown: BTreeMap<String, CategoryTotals>,
    pub date_range: DateRange,
    pub has_health_insurance: bool,
}

/// Aggregate transactions and run the tax comparison on total receipts.
///
/// An empty slice yields an all-zero summary.
pub fn summarize(
    transactions: &[Transaction],
    has_health_insurance: bool,
    today: NaiveDate,
    config: &TaxRegimeConfig,
) -> TaxSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut income_count = 0u32;
    let mut expense_count = 0u32;
    let mut gst_collected = Decimal::ZERO;
    let mut gst_paid = Decimal::ZERO;
    let mut current_month_income = Decimal::ZERO;
    let mut current_month_expenses = Decimal::ZERO;
    let mut category_breakdown: BTreeMap<String, CategoryTotals> = BTreeMap::new();

    for t in transactions {
        let in_current_month = t.is_in_month(today.year(), today.month());
        let totals = category_breakdown.entry(t.category.clone()).or_default();
        match t.kind {
            TransactionKind::Income => {
                total_income += t.amount;
                income_count += 1;
                gst_collected += t.counted_gst();
                totals.income += t.amount;
                if in_current_month {
                    current_month_income += t.amount;
                }
            }
            TransactionKind::Expense => {
                total_expenses += t.amount;
                expense_count += 1;
                gst_paid += t.counted_gst();
                totals.expense += t.amount;
                if in_current_month {
                    current_month_expenses += t.amount;
                }
            }
        }
        totals.count += 1;
        totals.net = totals.income - totals.expense;
    }

    let tax = calculate_tax(total_income, has_health_insurance, today, config);
    let gst_liability = (gst_collected - gst_paid).max(Decimal::ZERO);

    let taxable = tax.recommended_taxable_income();
    let effective_tax_rate = if taxable > Decimal::ZERO {
        tax.final_tax / taxable
    } else {
        Decimal::ZERO
    };
    let net_profit = total_income - total_expenses;
    let profit_margin = if total_income > Decimal::ZERO {
        net_profit / total_income
    } else {
        Decimal::ZERO
    };

    let date_range = DateRange {
        start_date: transactions.iter().map(|t| t.date).min(),
        end_date: transactions.iter().map(|t| t.date).max(),
    };

    TaxSummary {
        financial_year: FinancialYear::containing(today).label(),
        total_income,
        total_expenses,
        income_count,
        expense_count,
        gst_collected,
        gst_paid,
        gst_liability,
        total_tax_liability: tax.final_tax + gst_liability,
        tax,
        effective_tax_rate,
        net_profit,
        profit_margin,
        current_month_income,
        current_month_expenses,
        category_breakdown,
        date_range,
        has_health_insurance,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `"YYYY-MM"`
    pub month: String,
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
    pub transaction_count: u32,
}

/// Income, expenses and count for one calendar month.
pub fn monthly_summary(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> FreelanceTaxResult<MonthlySummary> {
    if !(1..=12).contains(&month) {
        return Err(FreelanceTaxError::InvalidInput {
            field: "month".into(),
            reason: format!("Month must be 1-12, got {month}"),
        });
    }

    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut transaction_count = 0u32;
    for t in transactions.iter().filter(|t| t.is_in_month(year, month)) {
        match t.kind {
            TransactionKind::Income => total_income += t.amount,
            TransactionKind::Expense => total_expenses += t.amount,
        }
        transaction_count += 1;
    }

    Ok(MonthlySummary {
        month: format!("{year}-{month:02}"),
        total_income,
        total_expenses,
        net_profit: total_income - total_expenses,
        transaction_count,
    })
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerInput {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub has_health_insurance: bool,
    /// Computation date; defaults to today
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    /// Restrict to transactions dated within this financial year, e.g. "2024-25"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<TaxRegimeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReport {
    pub summary: TaxSummary,
    pub advice: Vec<String>,
}

/// Validate a ledger, summarise it and attach tax advice.
pub fn summarize_ledger(input: &LedgerInput) -> FreelanceTaxResult<ComputationOutput<LedgerReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for (i, t) in input.transactions.iter().enumerate() {
        check_amount(
            &format!("transactions[{i}].amount"),
            "Transaction amount",
            t.amount,
        )?;
        check_amount(
            &format!("transactions[{i}].gst_amount"),
            "GST amount",
            t.gst_amount,
        )?;
        if t.gst_applicable && t.gst_amount > t.amount {
            warn!(index = i, "GST amount exceeds transaction amount");
            warnings.push(format!(
                "Transaction {i} ({}) records GST of {} on an amount of {}; verify the invoice",
                t.date, t.gst_amount, t.amount
            ));
        }
    }

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

    let selected: Vec<Transaction> = match &input.financial_year {
        Some(label) => {
            let fy: FinancialYear = label.parse()?;
            input
                .transactions
                .iter()
                .filter(|t| fy.contains(t.date))
                .cloned()
                .collect()
        }
        None => input.transactions.clone(),
    };
    let excluded = input.transactions.len() - selected.len();
    if excluded > 0 {
        warnings.push(format!(
            "{excluded} transaction(s) fall outside the requested financial year and were excluded"
        ));
    }
    if selected.is_empty() {
        warnings.push("No transactions to summarise; all figures are zero".to_string());
    }

    let summary = summarize(&selected, input.has_health_insurance, today, config);
    let advice = tax_advice(&summary, config);

    debug!(
        transactions = selected.len(),
        total_income = %summary.total_income,
        total_tax_liability = %summary.total_tax_liability,
        "ledger summarised"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Ledger aggregation: receipts and expenses by category, GST set-off, \
         Section 44ADA vs regular comparison on total receipts",
        &serde_json::json!({
            "financial_year_filter": input.financial_year,
            "transactions": selected.len(),
            "has_health_insurance": input.has_health_insurance,
            "tax_table": config.financial_year,
            "as_of": today.to_string(),
        }),
        warnings,
        elapsed,
        LedgerReport { summary, advice },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::income_tax::regime::TaxScheme;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(kind: TransactionKind, amount: Decimal, on: NaiveDate, category: &str) -> Transaction {
        Transaction {
            kind,
            amount,
            date: on,
            category: category.to_string(),
            client_vendor: None,
            description: None,
            gst_applicable: false,
            gst_amount: Decimal::ZERO,
        }
    }

    fn sample() -> Vec<Transaction> {
        let mut consulting = txn(TransactionKind::Income, dec!(600000), date(2024, 6, 10), "consulting");
        consulting.gst_applicable = true;
        consulting.gst_amount = dec!(108000);
        let mut laptop = txn(TransactionKind::Expense, dec!(100000), date(2024, 7, 2), "equipment");
        laptop.gst_applicable = true;
        laptop.gst_amount = dec!(18000);
        vec![
            consulting,
            txn(TransactionKind::Income, dec!(400000), date(2024, 7, 20), "consulting"),
            laptop,
            txn(TransactionKind::Expense, dec!(20000), date(2024, 7, 25), "software"),
        ]
    }

    #[test]
    fn test_summarize_totals() {
        let s = summarize(&sample(), false, date(2024, 7, 31), &TaxRegimeConfig::default());
        assert_eq!(s.total_income, dec!(1000000));
        assert_eq!(s.total_expenses, dec!(120000));
        assert_eq!(s.income_count, 2);
        assert_eq!(s.expense_count, 2);
        assert_eq!(s.gst_collected, dec!(108000));
        assert_eq!(s.gst_paid, dec!(18000));
        assert_eq!(s.gst_liability, dec!(90000));
        assert_eq!(s.tax.recommended_scheme, TaxScheme::Section44ada);
        assert_eq!(s.tax.final_tax, dec!(7800));
        assert_eq!(s.total_tax_liability, dec!(97800));
        assert_eq!(s.net_profit, dec!(880000));
        assert_eq!(s.profit_margin, dec!(0.88));
        assert_eq!(s.financial_year, "2024-25");
    }

    #[test]
    fn test_effective_rate_uses_recommended_taxable_income() {
        let s = summarize(&sample(), false, date(2024, 7, 31), &TaxRegimeConfig::default());
        // 7,800 / 450,000
        assert_eq!(s.effective_tax_rate, dec!(7800) / dec!(450000));
    }

    #[test]
    fn test_category_breakdown_and_current_month() {
        let s = summarize(&sample(), false, date(2024, 7, 31), &TaxRegimeConfig::default());
        let consulting = &s.category_breakdown["consulting"];
        assert_eq!(consulting.income, dec!(1000000));
        assert_eq!(consulting.count, 2);
        assert_eq!(consulting.net, dec!(1000000));
        assert_eq!(s.category_breakdown["equipment"].net, dec!(-100000));
        assert_eq!(s.current_month_income, dec!(400000));
        assert_eq!(s.current_month_expenses, dec!(120000));
        assert_eq!(
            s.date_range,
            DateRange {
                start_date: Some(date(2024, 6, 10)),
                end_date: Some(date(2024, 7, 25)),
            }
        );
    }

    #[test]
    fn test_empty_ledger_is_all_zero() {
        let s = summarize(&[], false, date(2024, 7, 31), &TaxRegimeConfig::default());
        assert_eq!(s.total_income, Decimal::ZERO);
        assert_eq!(s.total_tax_liability, Decimal::ZERO);
        assert_eq!(s.effective_tax_rate, Decimal::ZERO);
        assert_eq!(s.profit_margin, Decimal::ZERO);
        assert!(s.category_breakdown.is_empty());
        assert_eq!(s.date_range, DateRange::default());
    }

    #[test]
    fn test_gst_liability_floors_at_zero() {
        let mut purchase = txn(TransactionKind::Expense, dec!(50000), date(2024, 8, 1), "equipment");
        purchase.gst_applicable = true;
        purchase.gst_amount = dec!(9000);
        let s = summarize(&[purchase], false, date(2024, 8, 2), &TaxRegimeConfig::default());
        assert_eq!(s.gst_liability, Decimal::ZERO);
        assert_eq!(s.gst_paid, dec!(9000));
    }

    #[test]
    fn test_monthly_summary() {
        let m = monthly_summary(&sample(), 2024, 7).unwrap();
        assert_eq!(m.month, "2024-07");
        assert_eq!(m.total_income, dec!(400000));
        assert_eq!(m.total_expenses, dec!(120000));
        assert_eq!(m.net_profit, dec!(280000));
        assert_eq!(m.transaction_count, 3);
    }

    #[test]
    fn test_monthly_summary_rejects_bad_month() {
        assert!(monthly_summary(&sample(), 2024, 13).is_err());
    }

    #[test]
    fn test_envelope_filters_financial_year() {
        let mut transactions = sample();
        transactions.push(txn(TransactionKind::Income, dec!(50000), date(2024, 3, 20), "consulting"));
        let input = LedgerInput {
            transactions,
            has_health_insurance: false,
            as_of: Some(date(2024, 7, 31)),
            financial_year: Some("2024-25".into()),
            config: None,
        };
        let out = summarize_ledger(&input).unwrap();
        assert_eq!(out.result.summary.total_income, dec!(1000000));
        assert!(out.warnings.iter().any(|w| w.contains("1 transaction(s)")));
    }

    #[test]
    fn test_envelope_rejects_bad_financial_year() {
        let input = LedgerInput {
            transactions: sample(),
            has_health_insurance: false,
            as_of: Some(date(2024, 7, 31)),
            financial_year: Some("2024-2026".into()),
            config: None,
        };
        assert!(matches!(
            summarize_ledger(&input),
            Err(FreelanceTaxError::DateError(_))
        ));
    }

    #[test]
    fn test_envelope_rejects_negative_amount() {
        let mut transactions = sample();
        transactions[1].amount = dec!(-1);
        let input = LedgerInput {
            transactions,
            has_health_insurance: false,
            as_of: Some(date(2024, 7, 31)),
            financial_year: None,
            config: None,
        };
        match summarize_ledger(&input) {
            Err(FreelanceTaxError::InvalidInput { field, .. }) => {
                assert_eq!(field, "transactions[1].amount")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_rejects_gst_above_ceiling() {
        let mut transactions = sample();
        transactions[0].gst_amount = dec!(10000000000000000000000000000);
        let input = LedgerInput {
            transactions,
            has_health_insurance: false,
            as_of: Some(date(2024, 7, 31)),
            financial_year: None,
            config: None,
        };
        match summarize_ledger(&input) {
            Err(FreelanceTaxError::InvalidInput { field, .. }) => {
                assert_eq!(field, "transactions[0].gst_amount")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_includes_advice() {
        let input = LedgerInput {
            transactions: sample(),
            has_health_insurance: false,
            as_of: Some(date(2024, 7, 31)),
            financial_year: None,
            config: None,
        };
        let out = summarize_ledger(&input).unwrap();
        assert!(!out.result.advice.is_empty());
    }
}
