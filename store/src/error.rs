//! Store error types.

use assetvault_common::{AssetVaultError, UserId};
use thiserror::Error;

/// Errors raised by an [`AssetStore`](crate::AssetStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// An asset was inserted for a user the store does not know.
    #[error("No owner {0} for asset")]
    MissingOwner(UserId),

    /// A persisted row could not be mapped back into a model.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for AssetVaultError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingOwner(user_id) => AssetVaultError::UserNotFound(user_id),
            other => AssetVaultError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_into_domain_error() {
        let err: AssetVaultError = StoreError::Corrupt("currency DOGE".into()).into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");

        let err: AssetVaultError = StoreError::MissingOwner(UserId::new(4)).into();
        assert!(matches!(err, AssetVaultError::UserNotFound(id) if id == UserId::new(4)));
    }
}
