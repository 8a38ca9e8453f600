pub mod fiscal;
pub mod gst;
pub mod income_tax;
pub mod ledger;
