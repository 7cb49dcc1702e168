//! Startup fetch of the EUR-based rate snapshot from exchangeratesapi.io.
//!
//! Fetched exactly once, before the server accepts traffic; the resulting
//! table is immutable for the life of the process.

use std::collections::HashMap;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use ledgerd_convert::RateTable;

const LATEST_RATES_URL: &str = "http://api.exchangeratesapi.io/v1/latest";

#[derive(Debug, Error)]
pub enum RatesError {
    #[error("rates request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("rates endpoint answered {0}")]
    Status(reqwest::StatusCode),

    #[error("rates endpoint reported failure")]
    Unsuccessful,
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    success: bool,
    rates: HashMap<String, Decimal>,
}

/// Fetch the current rate list. Any failure here is fatal to startup: the
/// service never runs without a rate table.
pub async fn fetch_rate_table(token: &str) -> Result<RateTable, RatesError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()?;

    let response = client
        .get(LATEST_RATES_URL)
        .query(&[("access_key", token), ("format", "1")])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RatesError::Status(response.status()));
    }

    let body: LatestRatesResponse = response.json().await?;
    if !body.success {
        return Err(RatesError::Unsuccessful);
    }

    Ok(RateTable::new(body.rates))
}
