use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use freelance_tax_core::fiscal::{FiscalPosition, SystemClock};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Income tax
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_tax(input_json: String) -> NapiResult<String> {
    let input: freelance_tax_core::income_tax::regime::TaxComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = freelance_tax_core::income_tax::regime::compare_tax_schemes(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn advance_tax_schedule(input_json: String) -> NapiResult<String> {
    let input: freelance_tax_core::income_tax::advance_tax::AdvanceTaxInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = freelance_tax_core::income_tax::advance_tax::build_advance_tax_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// GST
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_gst(input_json: String) -> NapiResult<String> {
    let input: freelance_tax_core::gst::calculator::GstInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        freelance_tax_core::gst::calculator::compute_gst(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Financial year and quarter
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DateQuery {
    #[serde(default)]
    date: Option<String>,
}

#[napi]
pub fn financial_year(input_json: String) -> NapiResult<String> {
    let query: DateQuery = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let position =
        FiscalPosition::resolve(query.date.as_deref(), &SystemClock).map_err(to_napi_error)?;
    serde_json::to_string(&position).map_err(to_napi_error)
}

#[napi]
pub fn fiscal_quarter(input_json: String) -> NapiResult<String> {
    let query: DateQuery = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let date = query
        .date
        .ok_or_else(|| to_napi_error("fiscal_quarter requires a 'date' field"))?;
    let position = FiscalPosition::resolve(Some(date.as_str()), &SystemClock).map_err(to_napi_error)?;
    serde_json::to_string(&position).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[napi]
pub fn summarize_ledger(input_json: String) -> NapiResult<String> {
    let input: freelance_tax_core::ledger::summary::LedgerInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        freelance_tax_core::ledger::summary::summarize_ledger(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
