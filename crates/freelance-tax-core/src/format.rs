use rust_decimal::RoundingStrategy;

use crate::types::Money;

/// Format a rupee amount with Indian digit grouping, e.g. `₹12,34,567.89`.
pub fn format_inr(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}₹{}.{fraction}", group_lakh_crore(whole))
}

/// Group digits as thousands first, then pairs: 1234567 -> 12,34,567.
fn group_lakh_crore(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut rest, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    while rest.len() > 2 {
        let (head, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = head;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{last_three}", groups.join(","))
}
