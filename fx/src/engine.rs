//! Rate engine: a provider fronted by the rate cache.

use std::sync::Arc;

use assetvault_common::{system_clock, Currency, CurrencyPair, ExchangeRate, SharedClock};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::cache::{CacheStats, RateCache, RateCacheConfig};
use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;

/// Configuration for the FX engine.
#[derive(Debug, Clone)]
pub struct FxEngineConfig {
    /// Cache configuration.
    pub cache: RateCacheConfig,
    /// Whether to use cached rates.
    pub use_cache: bool,
}

impl Default for FxEngineConfig {
    fn default() -> Self {
        Self {
            cache: RateCacheConfig::default(),
            use_cache: true,
        }
    }
}

/// The FX engine.
pub struct FxEngine {
    provider: Arc<dyn RateProvider>,
    cache: RateCache,
    clock: SharedClock,
    config: FxEngineConfig,
}

impl FxEngine {
    /// Create a new FX engine with the given provider.
    pub fn new(provider: Arc<dyn RateProvider>, config: FxEngineConfig) -> Self {
        Self::with_clock(provider, config, system_clock())
    }

    /// Create an engine whose cache ages entries with `clock`.
    pub fn with_clock(
        provider: Arc<dyn RateProvider>,
        config: FxEngineConfig,
        clock: SharedClock,
    ) -> Self {
        Self {
            provider,
            cache: RateCache::with_clock(config.cache.clone(), clock.clone()),
            clock,
            config,
        }
    }

    /// Get the current rate for a currency pair.
    #[instrument(skip(self), fields(pair = %pair))]
    pub async fn get_rate(&self, pair: &CurrencyPair) -> FxResult<ExchangeRate> {
        if pair.is_identity() {
            return Ok(ExchangeRate::identity(pair.from.clone(), self.clock.now()));
        }

        if !self.config.use_cache {
            return self.provider.fetch_rate(pair).await;
        }

        let rate = self
            .cache
            .get_or_fetch(pair, || self.provider.fetch_rate(pair))
            .await?;
        debug!(rate = %rate.rate, source = %rate.source, "Resolved rate");
        Ok(rate)
    }

    /// Get rate between two currencies.
    pub async fn get_rate_for(&self, from: Currency, to: Currency) -> FxResult<ExchangeRate> {
        let pair = CurrencyPair::new(from, to);
        self.get_rate(&pair).await
    }

    /// Convert an amount of `from` into `to`.
    pub async fn convert(&self, amount: Decimal, from: Currency, to: Currency) -> FxResult<Decimal> {
        let rate = self.get_rate_for(from, to).await?;
        let converted = rate.convert(amount);
        converted.ok_or(FxError::Overflow(rate.pair))
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop expired cache entries.
    pub fn cleanup(&self) {
        self.cache.evict_expired();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockRateProvider;
    use assetvault_common::ManualClock;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn setup_engine() -> (FxEngine, Arc<MockRateProvider>, Arc<ManualClock>) {
        let provider = Arc::new(MockRateProvider::new("test"));
        provider.set_rate("BTC", "USD", dec!(2000500));
        provider.set_rate("IOTA", "USD", dec!(24.4));

        let clock = Arc::new(ManualClock::default());
        let engine = FxEngine::with_clock(provider.clone(), FxEngineConfig::default(), clock.clone());
        (engine, provider, clock)
    }

    fn btc_usd() -> CurrencyPair {
        CurrencyPair::new(Currency::new("BTC"), Currency::usd())
    }

    #[tokio::test]
    async fn test_get_rate() {
        let (engine, _, _) = setup_engine();

        let rate = engine.get_rate(&btc_usd()).await.unwrap();

        assert_eq!(rate.pair, btc_usd());
        assert_eq!(rate.rate, dec!(2000500));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let (engine, provider, _) = setup_engine();

        let rate1 = engine.get_rate(&btc_usd()).await.unwrap();
        let rate2 = engine.get_rate(&btc_usd()).await.unwrap();

        assert_eq!(rate1.rate, rate2.rate);
        assert_eq!(provider.calls_for(&btc_usd()), 1);
        assert_eq!(engine.stats().valid_entries, 1);
    }

    #[tokio::test]
    async fn test_expired_rate_refetched() {
        let (engine, provider, clock) = setup_engine();

        engine.get_rate(&btc_usd()).await.unwrap();
        clock.advance(Duration::seconds(3600));
        provider.set_rate("BTC", "USD", dec!(2100000));

        let rate = engine.get_rate(&btc_usd()).await.unwrap();

        assert_eq!(rate.rate, dec!(2100000));
        assert_eq!(provider.calls_for(&btc_usd()), 2);
    }

    #[tokio::test]
    async fn test_identity_pair_skips_provider() {
        let (engine, provider, _) = setup_engine();

        let rate = engine.get_rate_for(Currency::usd(), Currency::usd()).await.unwrap();

        assert_eq!(rate.rate, Decimal::ONE);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_rate_not_available_propagates() {
        let (engine, _, _) = setup_engine();

        let result = engine
            .get_rate_for(Currency::new("ETH"), Currency::usd())
            .await;

        assert!(matches!(result, Err(FxError::RateUnavailable(_))));
        assert_eq!(engine.stats().total_entries, 0);
    }

    #[tokio::test]
    async fn test_uncached_engine_always_fetches() {
        let provider = Arc::new(MockRateProvider::new("test"));
        provider.set_rate("BTC", "USD", dec!(2000500));
        let config = FxEngineConfig {
            use_cache: false,
            ..Default::default()
        };
        let engine = FxEngine::new(provider.clone(), config);

        engine.get_rate(&btc_usd()).await.unwrap();
        engine.get_rate(&btc_usd()).await.unwrap();

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_convert() {
        let (engine, _, _) = setup_engine();

        let usd = engine
            .convert(dec!(20), Currency::new("BTC"), Currency::usd())
            .await
            .unwrap();

        assert_eq!(usd, dec!(40010000));
    }

    #[tokio::test]
    async fn test_convert_overflow() {
        let (engine, _, _) = setup_engine();

        let result = engine
            .convert(Decimal::MAX, Currency::new("BTC"), Currency::usd())
            .await;

        assert!(matches!(result, Err(FxError::Overflow(_))));
    }
}
