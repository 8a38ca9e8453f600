use chrono::{Local, NaiveDate};

/// Source of "today" for the date-dependent calculations.
///
/// Advance-tax due dates and financial-year resolution depend on the current
/// date; everything that needs it takes a `Clock` (or an explicit date) so
/// results are reproducible under test.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
