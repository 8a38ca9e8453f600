use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::FreelanceTaxError;
use crate::fiscal::{current_financial_year, quarter_from_date, Clock, SystemClock};
use crate::types::{check_amount, round_to_rupee, with_metadata, ComputationOutput, Money};
use crate::FreelanceTaxResult;

/// One statutory advance-tax deadline.
struct Milestone {
    quarter: u8,
    cumulative_percentage: u8,
    month: u32,
    day: u32,
    /// Deadline falls in the calendar year after the anchor year
    next_year: bool,
    description: &'static str,
}

const MILESTONES: [Milestone; 4] = [
    Milestone {
        quarter: 1,
        cumulative_percentage: 15,
        month: 6,
        day: 15,
        next_year: false,
        description: "15% by June 15",
    },
    Milestone {
        quarter: 2,
        cumulative_percentage: 45,
        month: 9,
        day: 15,
        next_year: false,
        description: "45% by September 15",
    },
    Milestone {
        quarter: 3,
        cumulative_percentage: 75,
        month: 12,
        day: 15,
        next_year: false,
        description: "75% by December 15",
    },
    Milestone {
        quarter: 4,
        cumulative_percentage: 100,
        month: 3,
        day: 15,
        next_year: true,
        description: "100% by March 15",
    },
];

/// A single advance-tax installment.
///
/// `amount` is cumulative: the total that should have been paid by
/// `due_date`. Summing `amount` across quarters over-counts; sum
/// `installment_amount` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceTaxPayment {
    pub quarter: u8,
    pub cumulative_percentage: u8,
    /// Cumulative amount due by this deadline
    pub amount: Money,
    /// Amount payable in this quarter alone
    pub installment_amount: Money,
    pub due_date: NaiveDate,
    pub description: String,
    pub is_overdue: bool,
}

/// Build the four-installment schedule for `annual_tax`.
///
/// Due dates are anchored to the calendar year of `today`: June, September
/// and December 15 of that year, and March 15 of the following year. This
/// holds even when `today` is in January-March, so the first three dates
/// then precede the March deadline of the financial year in progress.
///
/// The first three cumulative amounts are rounded to the rupee; the fourth
/// is `annual_tax` exactly.
pub fn advance_tax_schedule(annual_tax: Money, today: NaiveDate) -> Vec<AdvanceTaxPayment> {
    let anchor_year = today.year();
    let mut previous = Decimal::ZERO;

    MILESTONES
        .iter()
        .map(|m| {
            let amount = if m.cumulative_percentage == 100 {
                annual_tax
            } else {
                let share = Decimal::from(m.cumulative_percentage) / Decimal::ONE_HUNDRED;
                round_to_rupee(annual_tax * share)
            };
            let installment_amount = amount - previous;
            previous = amount;

            let year = if m.next_year { anchor_year + 1 } else { anchor_year };
            // Fails only when `today` is in chrono's final year; the envelope
            // rejects such dates before they get here.
            let due_date = NaiveDate::from_ymd_opt(year, m.month, m.day);
            debug_assert!(due_date.is_some(), "no due date for {year}-{}-{}", m.month, m.day);
            let due_date = due_date.unwrap_or(NaiveDate::MAX);

            AdvanceTaxPayment {
                quarter: m.quarter,
                cumulative_percentage: m.cumulative_percentage,
                amount,
                installment_amount,
                due_date,
                description: m.description.to_string(),
                is_overdue: today > due_date,
            }
        })
        .collect()
}

/// Reject a computation date whose schedule would need a due date past the
/// end of chrono's calendar.
pub fn check_schedulable(today: NaiveDate) -> FreelanceTaxResult<()> {
    if NaiveDate::from_ymd_opt(today.year() + 1, 3, 15).is_none() {
        return Err(FreelanceTaxError::DateError(format!(
            "{today} is too late for an advance-tax schedule"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceTaxInput {
    /// Annual income tax to spread across the four deadlines
    pub annual_tax: Money,
    /// Date the schedule is computed as of; defaults to today
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceTaxOutput {
    pub annual_tax: Money,
    pub payments: Vec<AdvanceTaxPayment>,
    /// Sum of installments still outstanding as of the computation date
    pub overdue_amount: Money,
    pub next_due: Option<NaiveDate>,
}

/// Validated advance-tax schedule wrapped in the standard output envelope.
pub fn build_advance_tax_schedule(
    input: &AdvanceTaxInput,
) -> FreelanceTaxResult<ComputationOutput<AdvanceTaxOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    check_amount("annual_tax", "Annual tax", input.annual_tax)?;

    let today = input.as_of.unwrap_or_else(|| SystemClock.today());
    check_schedulable(today)?;
    let payments = advance_tax_schedule(input.annual_tax, today);

    if quarter_from_date(today) == 4 {
        warnings.push(format!(
            "Due dates are anchored to calendar year {}, while {} is in the final \
             quarter of financial year {}; the June-December deadlines shown are \
             for the next financial year.",
            today.year(),
            today,
            current_financial_year(today)
        ));
    }

    let overdue_amount: Money = payments
        .iter()
        .filter(|p| p.is_overdue)
        .map(|p| p.installment_amount)
        .sum();
    let next_due = payments.iter().find(|p| !p.is_overdue).map(|p| p.due_date);

    debug!(annual_tax = %input.annual_tax, %today, %overdue_amount, "advance tax schedule built");

    let output = AdvanceTaxOutput {
        annual_tax: input.annual_tax,
        payments,
        overdue_amount,
        next_due,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Advance tax: cumulative 15/45/75/100% by June, September, December and March 15",
        &serde_json::json!({
            "annual_tax": input.annual_tax.to_string(),
            "as_of": today.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_schedule_for_36400() {
        let schedule = advance_tax_schedule(dec!(36400), date(2024, 5, 1));
        let amounts: Vec<Money> = schedule.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![dec!(5460), dec!(16380), dec!(27300), dec!(36400)]);
        let pct: Vec<u8> = schedule.iter().map(|p| p.cumulative_percentage).collect();
        assert_eq!(pct, vec![15, 45, 75, 100]);
    }

    #[test]
    fn test_due_dates_anchor_to_calendar_year() {
        let schedule = advance_tax_schedule(dec!(1000), date(2024, 5, 1));
        assert_eq!(schedule[0].due_date, date(2024, 6, 15));
        assert_eq!(schedule[1].due_date, date(2024, 9, 15));
        assert_eq!(schedule[2].due_date, date(2024, 12, 15));
        assert_eq!(schedule[3].due_date, date(2025, 3, 15));
    }

    #[test]
    fn test_january_run_keeps_calendar_year_anchor() {
        let schedule = advance_tax_schedule(dec!(1000), date(2025, 2, 1));
        assert_eq!(schedule[0].due_date, date(2025, 6, 15));
        assert_eq!(schedule[3].due_date, date(2026, 3, 15));
    }

    #[test]
    fn test_q4_is_exact_and_unrounded() {
        let schedule = advance_tax_schedule(dec!(1000.37), date(2024, 5, 1));
        assert_eq!(schedule[0].amount, dec!(150));
        assert_eq!(schedule[3].amount, dec!(1000.37));
    }

    #[test]
    fn test_installments_sum_to_annual_tax() {
        let annual = dec!(98765);
        let schedule = advance_tax_schedule(annual, date(2024, 5, 1));
        let total: Money = schedule.iter().map(|p| p.installment_amount).sum();
        assert_eq!(total, annual);
        assert_eq!(schedule[0].installment_amount, schedule[0].amount);
    }

    #[test]
    fn test_amounts_non_decreasing() {
        for annual in [dec!(0), dec!(1), dec!(7), dec!(5200), dec!(301600)] {
            let schedule = advance_tax_schedule(annual, date(2024, 8, 1));
            for pair in schedule.windows(2) {
                assert!(pair[0].amount <= pair[1].amount);
            }
            assert_eq!(schedule[3].amount, annual);
        }
    }

    #[test]
    fn test_overdue_flags() {
        let schedule = advance_tax_schedule(dec!(1000), date(2024, 10, 1));
        let overdue: Vec<bool> = schedule.iter().map(|p| p.is_overdue).collect();
        assert_eq!(overdue, vec![true, true, false, false]);

        // Due date itself is not overdue
        let on_deadline = advance_tax_schedule(dec!(1000), date(2024, 6, 15));
        assert!(!on_deadline[0].is_overdue);
    }

    #[test]
    fn test_envelope_rejects_negative_tax() {
        let input = AdvanceTaxInput {
            annual_tax: dec!(-1),
            as_of: Some(date(2024, 5, 1)),
        };
        assert!(build_advance_tax_schedule(&input).is_err());
    }

    #[test]
    fn test_envelope_rejects_date_without_following_march() {
        let input = AdvanceTaxInput {
            annual_tax: dec!(1000),
            as_of: Some(NaiveDate::MAX),
        };
        assert!(matches!(
            build_advance_tax_schedule(&input),
            Err(FreelanceTaxError::DateError(_))
        ));
    }

    #[test]
    fn test_envelope_rejects_tax_above_ceiling() {
        let input = AdvanceTaxInput {
            annual_tax: dec!(70000000000000000000000000000),
            as_of: Some(date(2024, 5, 1)),
        };
        assert!(build_advance_tax_schedule(&input).is_err());
    }

    #[test]
    fn test_envelope_overdue_and_next_due() {
        let input = AdvanceTaxInput {
            annual_tax: dec!(36400),
            as_of: Some(date(2024, 10, 1)),
        };
        let out = build_advance_tax_schedule(&input).unwrap();
        // Q1 5,460 + Q2 10,920
        assert_eq!(out.result.overdue_amount, dec!(16380));
        assert_eq!(out.result.next_due, Some(date(2024, 12, 15)));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_envelope_warns_in_final_quarter() {
        let input = AdvanceTaxInput {
            annual_tax: dec!(36400),
            as_of: Some(date(2025, 2, 10)),
        };
        let out = build_advance_tax_schedule(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("2024-25"));
    }
}
