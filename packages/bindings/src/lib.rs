use napi::Result as NapiResult;
use napi_derive::napi;
use trade_journal_core::{project, summarize, BatchRequest, TradeRequest};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// Accepts `{ trade, settings }` or a bare trade object.
#[napi]
pub fn normalize_trade(input_json: String) -> NapiResult<String> {
    let request = TradeRequest::from_json(&input_json).map_err(to_napi_error)?;
    let record = request.normalize().map_err(to_napi_error)?;
    serde_json::to_string(&record).map_err(to_napi_error)
}

#[napi]
pub fn summarize_trades(input_json: String) -> NapiResult<String> {
    let batch = BatchRequest::from_json(&input_json).map_err(to_napi_error)?;
    let portfolio = batch.portfolio().map_err(to_napi_error)?;
    let output = summarize(&portfolio, &batch.settings);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_trades(input_json: String) -> NapiResult<String> {
    let batch = BatchRequest::from_json(&input_json).map_err(to_napi_error)?;
    let portfolio = batch.portfolio().map_err(to_napi_error)?;
    serde_json::to_string(&project(portfolio.records())).map_err(to_napi_error)
}
