use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::FreelanceTaxError;
use crate::fiscal::clock::Clock;

/// First calendar month of the Indian financial year (April).
pub const FINANCIAL_YEAR_START_MONTH: u32 = 4;

/// An Indian financial year, April 1 of `start_year` to March 31 of the next.
///
/// Displays and parses as `"2024-25"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FinancialYear {
    pub start_year: i32,
}

impl FinancialYear {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// The financial year a calendar date belongs to.
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= FINANCIAL_YEAR_START_MONTH {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::containing(date) == *self
    }

    /// April 1 of the start year.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_year, FINANCIAL_YEAR_START_MONTH, 1)
    }

    /// March 31 of the following year.
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_year + 1, 3, 31)
    }

    pub fn label(&self) -> String {
        format!(
            "{}-{:02}",
            self.start_year,
            (self.start_year + 1).rem_euclid(100)
        )
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for FinancialYear {
    type Err = FreelanceTaxError;

    /// Accepts `"2024-25"`, with an optional `"FY "` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix("FY")
            .map(str::trim_start)
            .unwrap_or(trimmed);

        let (start, end) = trimmed.split_once('-').ok_or_else(|| {
            FreelanceTaxError::DateError(format!("financial year '{s}' must look like 2024-25"))
        })?;
        let start_year: i32 = start.parse().map_err(|_| {
            FreelanceTaxError::DateError(format!("financial year '{s}' has a bad start year"))
        })?;
        let suffix: i32 = end.parse().map_err(|_| {
            FreelanceTaxError::DateError(format!("financial year '{s}' has a bad end year"))
        })?;
        if end.len() != 2 || suffix != (start_year + 1).rem_euclid(100) {
            return Err(FreelanceTaxError::DateError(format!(
                "financial year '{s}' must end the year after it starts"
            )));
        }
        Ok(Self::new(start_year))
    }
}

/// Where a date sits in the Indian fiscal calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalPosition {
    pub date: NaiveDate,
    pub financial_year: String,
    pub quarter: u8,
}

impl FiscalPosition {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            date,
            financial_year: FinancialYear::containing(date).label(),
            quarter: quarter_from_date(date),
        }
    }

    /// Resolve an optional `YYYY-MM-DD` string, defaulting to `clock`'s today.
    pub fn resolve(date: Option<&str>, clock: &impl Clock) -> Result<Self, FreelanceTaxError> {
        let date = match date {
            Some(raw) => raw
                .trim()
                .parse::<NaiveDate>()
                .map_err(|e| FreelanceTaxError::DateError(format!("'{raw}': {e}")))?,
            None => clock.today(),
        };
        Ok(Self::of(date))
    }
}

/// Label of the financial year `today` falls in, e.g. `"2024-25"`.
pub fn current_financial_year(today: NaiveDate) -> String {
    FinancialYear::containing(today).label()
}

/// Fiscal quarter (1-4) of a date. Q1 is April-June, Q4 is January-March.
pub fn quarter_from_date(date: NaiveDate) -> u8 {
    match date.month() {
        4..=6 => 1,
        7..=9 => 2,
        10..=12 => 3,
        _ => 4,
    }
}
