use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::TaxRegimeConfig;
use crate::format::format_inr;
use crate::income_tax::regime::TaxScheme;
use crate::ledger::summary::TaxSummary;
use crate::types::Money;

/// Receipts above which detailed records are strongly advisable.
const RECORD_KEEPING_THRESHOLD: Money = dec!(1000000);

/// Aggregate turnover above which GST registration is mandatory for services.
const GST_REGISTRATION_THRESHOLD: Money = dec!(2000000);

/// Income tax above which 80C/80D investments are worth a look.
const INVESTMENT_HINT_THRESHOLD: Money = dec!(50000);

/// Rule-based guidance for a freelancer's tax position.
pub fn tax_advice(summary: &TaxSummary, config: &TaxRegimeConfig) -> Vec<String> {
    let mut advice: Vec<String> = Vec::new();
    let tax = &summary.tax;

    match tax.recommended_scheme {
        TaxScheme::Section44ada => {
            advice.push(format!(
                "Section 44ADA is cheaper for you: {}% of receipts is treated as income \
                 and no detailed expense books are needed. Estimated saving: {}.",
                (config.presumptive_ratio * Decimal::ONE_HUNDRED).normalize(),
                format_inr(tax.savings)
            ));
            let presumed_expenses = summary.total_income * (Decimal::ONE - config.presumptive_ratio);
            if summary.total_expenses > presumed_expenses {
                advice.push(
                    "Your recorded expenses exceed the share Section 44ADA presumes. \
                     Compare against a regular computation on actual expenses before filing."
                        .to_string(),
                );
            }
        }
        TaxScheme::Regular => {
            advice.push(format!(
                "Regular computation is cheaper for you by {}. Maintain books of account \
                 and keep all bills for claimed expenses.",
                format_inr(tax.savings)
            ));
        }
    }

    if summary.gst_liability > Decimal::ZERO {
        advice.push(format!(
            "You have GST liability of {}. Ensure timely GST filing.",
            format_inr(summary.gst_liability)
        ));
    }

    let overdue = tax
        .advance_tax_schedule
        .iter()
        .filter(|p| p.is_overdue && p.installment_amount > Decimal::ZERO)
        .count();
    if overdue > 0 {
        advice.push(format!(
            "You have {overdue} overdue advance tax installment(s). Pay immediately \
             to limit interest under Sections 234B and 234C."
        ));
    }

    if summary.total_income > RECORD_KEEPING_THRESHOLD {
        advice.push(
            "Your income exceeds ₹10L. Consider tax planning strategies and maintain \
             detailed records."
                .to_string(),
        );
    }

    if summary.total_income > GST_REGISTRATION_THRESHOLD {
        advice.push(
            "Consider incorporating as a company for potential tax benefits at higher \
             income levels."
                .to_string(),
        );
        if summary.gst_collected.is_zero() {
            advice.push(
                "Consider GST registration as your income exceeds the ₹20L threshold."
                    .to_string(),
            );
        }
    }

    if summary.total_income > Decimal::ZERO {
        let expense_ratio = summary.total_expenses / summary.total_income;
        if expense_ratio < dec!(0.20) {
            advice.push(
                "Your expense ratio is low. Review whether you are claiming all eligible \
                 business expenses."
                    .to_string(),
            );
        } else if expense_ratio > dec!(0.70) {
            advice.push(
                "High expense ratio detected. Ensure all expenses are business-related \
                 and well-documented."
                    .to_string(),
            );
        }
    }

    if tax.final_tax > INVESTMENT_HINT_THRESHOLD {
        advice.push(
            "Consider tax-saving investments under Section 80C and 80D to reduce your \
             tax liability."
                .to_string(),
        );
    }

    if !summary.has_health_insurance && tax.recommended_scheme == TaxScheme::Regular {
        advice.push(format!(
            "A health-insurance policy would add a {} deduction under the regular computation.",
            format_inr(config.health_insurance_deduction)
        ));
    }

    advice
}
