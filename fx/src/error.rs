//! FX error types.

use assetvault_common::{AssetVaultError, CurrencyPair};
use thiserror::Error;

/// Errors that can occur while obtaining a rate.
#[derive(Debug, Error)]
pub enum FxError {
    /// The rate source answered with a non-success status.
    #[error("{0}")]
    RateUnavailable(String),

    /// The response did not carry a rate for the target currency.
    #[error("Rate for {0} missing from rate source response")]
    MissingRate(CurrencyPair),

    /// The rate was present but not a usable positive number.
    #[error("Invalid rate {rate} for {pair}")]
    InvalidRate { pair: CurrencyPair, rate: String },

    /// The response body could not be read as JSON.
    #[error("Invalid rate source response for {pair}: {reason}")]
    InvalidResponse { pair: CurrencyPair, reason: String },

    /// The converted amount does not fit in a decimal.
    #[error("Conversion overflowed for {0}")]
    Overflow(CurrencyPair),

    /// The request never produced a response.
    #[error("Rate source request failed for {pair}: {reason}")]
    Transport { pair: CurrencyPair, reason: String },
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;

impl From<FxError> for AssetVaultError {
    fn from(err: FxError) -> Self {
        let message = err.to_string();
        match err {
            FxError::Overflow(_) => AssetVaultError::Overflow(message),
            _ => AssetVaultError::RateUnavailable(message),
        }
    }
}
