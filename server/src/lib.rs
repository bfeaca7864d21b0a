//! AssetVault Server
//!
//! HTTP API for per-user crypto asset holdings and their value in a
//! reference currency.

pub mod api;
pub mod config;
pub mod error;
pub mod service;
pub mod state;
pub mod valuation;

pub use api::app_router;
pub use config::{LogFormat, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use service::AssetService;
pub use state::{build_state, AppState};
pub use valuation::{Valuation, ValuationResult};
