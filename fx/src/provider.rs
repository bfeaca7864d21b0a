//! Rate provider trait and a test double.

use async_trait::async_trait;
use assetvault_common::{CurrencyPair, ExchangeRate};

use crate::error::FxResult;

/// Trait for exchange-rate sources.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch the current rate for a currency pair.
    ///
    /// Implementations must return a positive rate or an error; they never
    /// retry.
    async fn fetch_rate(&self, pair: &CurrencyPair) -> FxResult<ExchangeRate>;
}

/// Mock rate provider for testing.
///
/// Counts every fetch so tests can assert on cache behavior.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateProvider {
    name: String,
    rates: dashmap::DashMap<CurrencyPair, rust_decimal::Decimal>,
    calls: dashmap::DashMap<CurrencyPair, usize>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateProvider {
    /// Create a new mock provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: dashmap::DashMap::new(),
            calls: dashmap::DashMap::new(),
        }
    }

    /// Set the rate returned for `from` → `to`.
    pub fn set_rate(
        &self,
        from: impl Into<assetvault_common::Currency>,
        to: impl Into<assetvault_common::Currency>,
        rate: rust_decimal::Decimal,
    ) {
        self.rates.insert(CurrencyPair::new(from.into(), to.into()), rate);
    }

    /// Forget a rate so that further fetches for it fail.
    pub fn remove_rate(
        &self,
        from: impl Into<assetvault_common::Currency>,
        to: impl Into<assetvault_common::Currency>,
    ) {
        self.rates.remove(&CurrencyPair::new(from.into(), to.into()));
    }

    /// Total number of fetches across all pairs.
    pub fn calls(&self) -> usize {
        self.calls.iter().map(|entry| *entry.value()).sum()
    }

    /// Number of fetches for one pair.
    pub fn calls_for(&self, pair: &CurrencyPair) -> usize {
        self.calls.get(pair).map(|count| *count).unwrap_or(0)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rate(&self, pair: &CurrencyPair) -> FxResult<ExchangeRate> {
        *self.calls.entry(pair.clone()).or_insert(0) += 1;

        let rate = self.rates.get(pair).map(|r| *r).ok_or_else(|| {
            crate::error::FxError::RateUnavailable(format!("No mock rate for {}", pair))
        })?;

        Ok(ExchangeRate::new(
            pair.clone(),
            rate,
            chrono::Utc::now(),
            self.name.clone(),
        ))
    }
}
