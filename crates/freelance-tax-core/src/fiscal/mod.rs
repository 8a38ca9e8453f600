pub mod clock;
pub mod year;

pub use clock::{Clock, FixedClock, SystemClock};
pub use year::{current_financial_year, quarter_from_date, FinancialYear, FiscalPosition};
