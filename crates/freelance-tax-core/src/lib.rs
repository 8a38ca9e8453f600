pub mod config;
pub mod error;
pub mod fiscal;
pub mod format;
pub mod types;

#[cfg(feature = "income_tax")]
pub mod income_tax;

#[cfg(feature = "gst")]
pub mod gst;

#[cfg(all(feature = "income_tax", feature = "gst"))]
pub mod engine;

#[cfg(feature = "ledger")]
pub mod ledger;

pub use config::TaxRegimeConfig;
pub use error::FreelanceTaxError;
pub use types::*;

/// Standard result type for all freelance-tax operations
pub type FreelanceTaxResult<T> = Result<T, FreelanceTaxError>;
