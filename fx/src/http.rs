//! HTTP rate provider for the currency-api JSON endpoints.
//!
//! The source serves one document per pair at
//! `{base}/{from}/{to}.json`, with lower-case codes, shaped like
//! `{"date": "2024-01-15", "usd": 24.4}`.

use std::time::Duration;

use async_trait::async_trait;
use assetvault_common::{parse_decimal, CurrencyPair, ExchangeRate};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;

/// Public endpoint used when none is configured.
pub const DEFAULT_RATE_SOURCE_URL: &str =
    "https://cdn.jsdelivr.net/gh/fawazahmed0/currency-api@1/latest/currencies";

/// Message reported when the source rejects a pair.
pub const UNAVAILABLE_MESSAGE: &str =
    "Please double-check the data submitted for the currency conversion service.";

/// Configuration for [`HttpRateProvider`].
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Base URL, without a trailing slash.
    pub base_url: String,
    /// Timeout for a single rate request.
    pub request_timeout: Duration,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RATE_SOURCE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Rate provider backed by a remote JSON endpoint.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    client: Client,
    base_url: String,
}

impl HttpRateProvider {
    /// Create a provider with its own HTTP client.
    pub fn new(config: HttpProviderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, config.base_url))
    }

    /// Create a provider around an existing client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build the lookup URL for a pair.
    pub fn rate_url(&self, pair: &CurrencyPair) -> String {
        format!(
            "{}/{}/{}.json",
            self.base_url,
            pair.from.lower_code(),
            pair.to.lower_code()
        )
    }
}

/// Extract the rate for `pair` from a response document.
pub(crate) fn parse_rate(pair: &CurrencyPair, body: &Value) -> FxResult<Decimal> {
    let key = pair.to.lower_code();
    let raw = body
        .get(&key)
        .ok_or_else(|| FxError::MissingRate(pair.clone()))?;

    let rate = match raw {
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => None,
    }
    .ok_or_else(|| FxError::InvalidRate {
        pair: pair.clone(),
        rate: raw.to_string(),
    })?;

    if rate <= Decimal::ZERO {
        return Err(FxError::InvalidRate {
            pair: pair.clone(),
            rate: rate.to_string(),
        });
    }

    Ok(rate)
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn name(&self) -> &str {
        "currency-api"
    }

    async fn fetch_rate(&self, pair: &CurrencyPair) -> FxResult<ExchangeRate> {
        let url = self.rate_url(pair);
        debug!(pair = %pair, url = %url, "Fetching exchange rate");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FxError::Transport {
                pair: pair.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(pair = %pair, status = status.as_u16(), "Rate source rejected request");
            return Err(FxError::RateUnavailable(UNAVAILABLE_MESSAGE.to_string()));
        }

        let body: Value = response.json().await.map_err(|e| FxError::InvalidResponse {
            pair: pair.clone(),
            reason: e.to_string(),
        })?;

        let rate = parse_rate(pair, &body)?;
        debug!(pair = %pair, rate = %rate, "Fetched exchange rate");

        Ok(ExchangeRate::new(
            pair.clone(),
            rate,
            chrono::Utc::now(),
            self.name(),
        ))
    }
}
