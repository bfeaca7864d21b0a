//! Exchange-rate caching with TTL support.

use std::future::Future;
use std::sync::Arc;

use assetvault_common::{system_clock, CurrencyPair, ExchangeRate, SharedClock};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::error::FxResult;

/// Freshness window for a fetched rate.
pub const DEFAULT_RATE_TTL_SECS: i64 = 3600;

/// Cached rate entry.
#[derive(Debug, Clone)]
struct CacheEntry {
    rate: ExchangeRate,
    cached_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_valid(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.cached_at) < ttl
    }
}

/// Configuration for rate cache.
#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    /// How long a fetched rate stays fresh.
    pub ttl: Duration,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(DEFAULT_RATE_TTL_SECS),
        }
    }
}

/// Thread-safe rate cache keyed by the ordered pair.
///
/// Entries are never mutated in place: a stale entry is replaced on the next
/// miss. Concurrent misses for the same pair may each fetch; the last write
/// wins.
pub struct RateCache {
    cache: DashMap<CurrencyPair, CacheEntry>,
    config: RateCacheConfig,
    clock: SharedClock,
}

impl RateCache {
    /// Create a new rate cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(RateCacheConfig::default())
    }

    /// Create a new rate cache with custom configuration.
    pub fn with_config(config: RateCacheConfig) -> Self {
        Self::with_clock(config, system_clock())
    }

    /// Create a rate cache reading time from `clock`.
    pub fn with_clock(config: RateCacheConfig, clock: SharedClock) -> Self {
        Self {
            cache: DashMap::new(),
            config,
            clock,
        }
    }

    /// Get a rate from cache if still fresh.
    pub fn get(&self, pair: &CurrencyPair) -> Option<ExchangeRate> {
        let now = self.clock.now();

        if let Some(entry) = self.cache.get(pair) {
            if entry.is_valid(now, self.config.ttl) {
                debug!(pair = %pair, "Cache hit");
                return Some(entry.rate.clone());
            }
            debug!(pair = %pair, "Cache entry expired");
            drop(entry);
            self.cache.remove(pair);
        }

        debug!(pair = %pair, "Cache miss");
        None
    }

    /// Insert a rate, stamped with the current time.
    pub fn insert(&self, rate: ExchangeRate) {
        let entry = CacheEntry {
            cached_at: self.clock.now(),
            rate,
        };
        self.cache.insert(entry.rate.pair.clone(), entry);
    }

    /// Return the cached rate for `pair`, or run `fetch` and cache its result.
    ///
    /// A failed fetch leaves the cache untouched.
    pub async fn get_or_fetch<F, Fut>(&self, pair: &CurrencyPair, fetch: F) -> FxResult<ExchangeRate>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FxResult<ExchangeRate>>,
    {
        if let Some(rate) = self.get(pair) {
            return Ok(rate);
        }

        let rate = fetch().await?;
        self.insert(rate.clone());
        Ok(rate)
    }

    /// Drop the entry for a pair.
    pub fn invalidate(&self, pair: &CurrencyPair) {
        self.cache.remove(pair);
    }

    /// Clear all cached rates.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Get the number of entries in cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Evict expired entries.
    pub fn evict_expired(&self) {
        let now = self.clock.now();
        let ttl = self.config.ttl;
        self.cache.retain(|_, entry| entry.is_valid(now, ttl));
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let total = self.cache.len();
        let valid = self
            .cache
            .iter()
            .filter(|e| e.is_valid(now, self.config.ttl))
            .count();

        CacheStats {
            total_entries: total,
            valid_entries: valid,
            expired_entries: total - valid,
        }
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

/// Shared rate cache.
pub type SharedRateCache = Arc<RateCache>;
