//! Error types for AssetVault.

use crate::{AssetId, UserId};
use thiserror::Error;

/// Main error type for AssetVault operations.
#[derive(Error, Debug)]
pub enum AssetVaultError {
    /// A submitted asset field failed validation.
    #[error("{0}")]
    InvalidAsset(String),

    /// Asset does not exist or is not owned by the requesting user.
    #[error("Asset not found: {0}")]
    AssetNotFound(AssetId),

    /// User does not exist.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// The exchange-rate source failed or answered with something unusable.
    #[error("{0}")]
    RateUnavailable(String),

    /// A computed amount does not fit in a decimal.
    #[error("{0}")]
    Overflow(String),

    /// Record store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssetVaultError {
    /// Shorthand for an [`AssetVaultError::InvalidAsset`].
    pub fn invalid(message: impl Into<String>) -> Self {
        AssetVaultError::InvalidAsset(message.into())
    }

    /// Get error code for API responses and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AssetVaultError::InvalidAsset(_) => "INVALID_ASSET",
            AssetVaultError::AssetNotFound(_) => "ASSET_NOT_FOUND",
            AssetVaultError::UserNotFound(_) => "USER_NOT_FOUND",
            AssetVaultError::RateUnavailable(_) => "RATE_UNAVAILABLE",
            AssetVaultError::Overflow(_) => "VALUE_OVERFLOW",
            AssetVaultError::Storage(_) => "STORAGE_ERROR",
            AssetVaultError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias for AssetVault operations.
pub type Result<T> = std::result::Result<T, AssetVaultError>;
