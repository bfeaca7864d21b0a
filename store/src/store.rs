//! The record store seam.

use std::sync::Arc;

use async_trait::async_trait;
use assetvault_common::{Asset, AssetId, NewAsset, NewUser, User, UserId};

use crate::error::StoreResult;

/// Persistence for users and their assets.
///
/// Lookups return `Ok(None)` (or `false`) for missing records; errors are
/// reserved for the store itself failing.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>>;

    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn count_users(&self) -> StoreResult<u64>;

    /// Remove a user together with every asset they own.
    async fn delete_user(&self, user_id: UserId) -> StoreResult<bool>;

    /// Persist a validated asset and assign its ID.
    async fn insert_asset(&self, user_id: UserId, asset: NewAsset) -> StoreResult<Asset>;

    async fn find_asset(&self, asset_id: AssetId) -> StoreResult<Option<Asset>>;

    /// Overwrite the mutable fields of an existing asset.
    ///
    /// Returns `false` when the asset no longer exists.
    async fn update_asset(&self, asset: &Asset) -> StoreResult<bool>;

    async fn delete_asset(&self, asset_id: AssetId) -> StoreResult<bool>;

    /// All assets owned by a user, in ID order.
    async fn list_assets(&self, user_id: UserId) -> StoreResult<Vec<Asset>>;

    /// Delete every asset owned by a user, returning how many went.
    async fn delete_user_assets(&self, user_id: UserId) -> StoreResult<u64>;
}

/// Shared store handle.
pub type SharedStore = Arc<dyn AssetStore>;
