//! In-memory record store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use assetvault_common::{Asset, AssetId, NewAsset, NewUser, User, UserId};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::AssetStore;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    assets: BTreeMap<AssetId, Asset>,
    last_user_id: i64,
    last_asset_id: i64,
}

/// A store that keeps everything in process memory.
///
/// IDs are assigned from per-table counters starting at 1 and never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().users.get(&user_id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write();
        tables.last_user_id += 1;
        let user = User {
            id: UserId::new(tables.last_user_id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn count_users(&self) -> StoreResult<u64> {
        Ok(self.tables.read().users.len() as u64)
    }

    async fn delete_user(&self, user_id: UserId) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        if tables.users.remove(&user_id).is_none() {
            return Ok(false);
        }
        tables.assets.retain(|_, asset| asset.user_id != user_id);
        Ok(true)
    }

    async fn insert_asset(&self, user_id: UserId, asset: NewAsset) -> StoreResult<Asset> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::MissingOwner(user_id));
        }

        tables.last_asset_id += 1;
        let asset = Asset::from_new(AssetId::new(tables.last_asset_id), user_id, asset);
        tables.assets.insert(asset.id, asset.clone());
        debug!(asset_id = %asset.id, user_id = %user_id, "Inserted asset");
        Ok(asset)
    }

    async fn find_asset(&self, asset_id: AssetId) -> StoreResult<Option<Asset>> {
        Ok(self.tables.read().assets.get(&asset_id).cloned())
    }

    async fn update_asset(&self, asset: &Asset) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        match tables.assets.get_mut(&asset.id) {
            Some(stored) => {
                stored.label = asset.label.clone();
                stored.currency = asset.currency;
                stored.value = asset.value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_asset(&self, asset_id: AssetId) -> StoreResult<bool> {
        Ok(self.tables.write().assets.remove(&asset_id).is_some())
    }

    async fn list_assets(&self, user_id: UserId) -> StoreResult<Vec<Asset>> {
        Ok(self
            .tables
            .read()
            .assets
            .values()
            .filter(|asset| asset.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_user_assets(&self, user_id: UserId) -> StoreResult<u64> {
        let mut tables = self.tables.write();
        let before = tables.assets.len();
        tables.assets.retain(|_, asset| asset.user_id != user_id);
        Ok((before - tables.assets.len()) as u64)
    }
}
