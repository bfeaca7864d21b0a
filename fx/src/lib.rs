//! AssetVault FX
//!
//! Exchange-rate lookup for asset valuation.
//!
//! # Features
//!
//! - Pluggable rate providers behind [`RateProvider`]
//! - An HTTP provider for the public currency-api JSON endpoints
//! - A per-pair rate cache with an injectable TTL and clock
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use assetvault_fx::{FxEngine, FxEngineConfig, HttpRateProvider};
//! use assetvault_common::Currency;
//!
//! let provider = Arc::new(HttpRateProvider::new(Default::default())?);
//! let engine = FxEngine::new(provider, FxEngineConfig::default());
//!
//! let rate = engine.get_rate_for(Currency::new("BTC"), Currency::usd()).await?;
//! ```

pub mod engine;
pub mod provider;
pub mod http;
pub mod cache;
pub mod error;

pub use engine::{FxEngine, FxEngineConfig};
pub use provider::RateProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateProvider;
pub use http::{HttpProviderConfig, HttpRateProvider, DEFAULT_RATE_SOURCE_URL};
pub use cache::{RateCache, RateCacheConfig, DEFAULT_RATE_TTL_SECS};
pub use error::{FxError, FxResult};
