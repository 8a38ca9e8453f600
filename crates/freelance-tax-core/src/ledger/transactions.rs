use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

fn default_category() -> String {
    "other".to_string()
}

/// A stored invoice or receipt, as produced by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub gst_applicable: bool,
    #[serde(default)]
    pub gst_amount: Money,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// GST that counts towards collected/paid totals.
    pub fn counted_gst(&self) -> Money {
        if self.gst_applicable {
            self.gst_amount
        } else {
            Decimal::ZERO
        }
    }

    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }
}
