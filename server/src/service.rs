//! Asset CRUD orchestration.

use assetvault_common::{
    validate, Asset, AssetDraft, AssetId, AssetVaultError, Result, UserId,
};
use assetvault_store::SharedStore;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

/// Submitted asset fields, keyed by name.
pub type AssetFields = Map<String, Value>;

/// Create, read, update and delete assets on behalf of a user.
///
/// An asset is only visible through the user who owns it.
#[derive(Clone)]
pub struct AssetService {
    store: SharedStore,
}

impl AssetService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    async fn require_user(&self, user_id: UserId) -> Result<()> {
        match self.store.find_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AssetVaultError::UserNotFound(user_id)),
        }
    }

    fn draft_from(mut draft: AssetDraft, fields: &AssetFields) -> Result<AssetDraft> {
        let ignored = draft.apply_fields(fields)?;
        if !ignored.is_empty() {
            debug!(fields = ?ignored, "Ignoring unassignable asset fields");
        }
        Ok(draft)
    }

    /// Validate submitted fields and persist a new asset.
    #[instrument(skip(self, fields), fields(user_id = %user_id))]
    pub async fn create_asset(&self, user_id: UserId, fields: &AssetFields) -> Result<Asset> {
        self.require_user(user_id).await?;

        let draft = Self::draft_from(AssetDraft::empty(), fields)?;
        let new = validate(&draft)?;
        let asset = self.store.insert_asset(user_id, new).await?;

        info!(asset_id = %asset.id, currency = %asset.currency, "Asset created");
        Ok(asset)
    }

    /// Fetch one asset owned by `user_id`.
    pub async fn get_asset(&self, user_id: UserId, asset_id: AssetId) -> Result<Asset> {
        self.store
            .find_asset(asset_id)
            .await?
            .filter(|asset| asset.user_id == user_id)
            .ok_or(AssetVaultError::AssetNotFound(asset_id))
    }

    /// Apply submitted fields over the stored asset, revalidate and persist.
    #[instrument(skip(self, fields), fields(user_id = %user_id, asset_id = %asset_id))]
    pub async fn update_asset(
        &self,
        user_id: UserId,
        asset_id: AssetId,
        fields: &AssetFields,
    ) -> Result<Asset> {
        let mut asset = self.get_asset(user_id, asset_id).await?;

        let draft = Self::draft_from(AssetDraft::from_asset(&asset), fields)?;
        asset.apply(validate(&draft)?);

        if !self.store.update_asset(&asset).await? {
            return Err(AssetVaultError::AssetNotFound(asset_id));
        }

        info!("Asset updated");
        Ok(asset)
    }

    #[instrument(skip(self), fields(user_id = %user_id, asset_id = %asset_id))]
    pub async fn delete_asset(&self, user_id: UserId, asset_id: AssetId) -> Result<()> {
        self.get_asset(user_id, asset_id).await?;

        if !self.store.delete_asset(asset_id).await? {
            return Err(AssetVaultError::AssetNotFound(asset_id));
        }

        info!("Asset deleted");
        Ok(())
    }

    /// All assets of a user.
    pub async fn list_assets(&self, user_id: UserId) -> Result<Vec<Asset>> {
        self.require_user(user_id).await?;
        Ok(self.store.list_assets(user_id).await?)
    }

    /// Remove every asset of a user, returning how many were removed.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn delete_all_assets(&self, user_id: UserId) -> Result<u64> {
        self.require_user(user_id).await?;

        let removed = self.store.delete_user_assets(user_id).await?;
        info!(removed, "Deleted all assets");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use assetvault_common::{validation, AssetCurrency, NewUser};
    use assetvault_store::{AssetStore, MemoryStore};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn fields(value: Value) -> AssetFields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn setup() -> (AssetService, UserId, UserId) {
        let store = Arc::new(MemoryStore::new());
        let alice = store
            .create_user(NewUser::new("user_0", "user_0@test.com", "hash"))
            .await
            .unwrap();
        let bob = store
            .create_user(NewUser::new("user_1", "user_1@test.com", "hash"))
            .await
            .unwrap();
        (AssetService::new(store), alice.id, bob.id)
    }

    fn binance_btc() -> AssetFields {
        fields(json!({ "label": "binance", "currency": "BTC", "value": 20 }))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (service, alice, _) = setup().await;

        let created = service.create_asset(alice, &binance_btc()).await.unwrap();
        let fetched = service.get_asset(alice, created.id).await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.currency, AssetCurrency::Btc);
        assert_eq!(fetched.value, dec!(20));
        assert_eq!(fetched.user_id, alice);
    }

    #[tokio::test]
    async fn test_create_ignores_unassignable_fields() {
        let (service, alice, bob) = setup().await;

        let mut submitted = binance_btc();
        submitted.insert("id".into(), json!(999));
        submitted.insert("user".into(), json!(bob.get()));

        let created = service.create_asset(alice, &submitted).await.unwrap();

        assert_ne!(created.id, AssetId::new(999));
        assert_eq!(created.user_id, alice);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let (service, alice, _) = setup().await;

        let err = service
            .create_asset(alice, &fields(json!({ "label": "x", "currency": "DOGE", "value": 1 })))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), validation::CURRENCY_INVALID);
        assert!(service.list_assets(alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_for_unknown_user() {
        let (service, _, _) = setup().await;

        let err = service
            .create_asset(UserId::new(42), &binance_btc())
            .await
            .unwrap_err();

        assert!(matches!(err, AssetVaultError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_assets_are_scoped_to_owner() {
        let (service, alice, bob) = setup().await;
        let asset = service.create_asset(alice, &binance_btc()).await.unwrap();

        let err = service.get_asset(bob, asset.id).await.unwrap_err();
        assert!(matches!(err, AssetVaultError::AssetNotFound(_)));

        let err = service.delete_asset(bob, asset.id).await.unwrap_err();
        assert!(matches!(err, AssetVaultError::AssetNotFound(_)));
        assert!(service.get_asset(alice, asset.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (service, alice, _) = setup().await;
        let asset = service.create_asset(alice, &binance_btc()).await.unwrap();

        let updated = service
            .update_asset(alice, asset.id, &fields(json!({ "value": "3.456" })))
            .await
            .unwrap();

        assert_eq!(updated.label, "binance");
        assert_eq!(updated.currency, AssetCurrency::Btc);
        assert_eq!(updated.value, dec!(3.46));
        assert_eq!(service.get_asset(alice, asset.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_asset_untouched() {
        let (service, alice, _) = setup().await;
        let asset = service.create_asset(alice, &binance_btc()).await.unwrap();

        let err = service
            .update_asset(alice, asset.id, &fields(json!({ "value": -1 })))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), validation::VALUE_NEGATIVE);
        assert_eq!(service.get_asset(alice, asset.id).await.unwrap(), asset);
    }

    #[tokio::test]
    async fn test_delete_unknown_asset() {
        let (service, alice, _) = setup().await;

        let err = service
            .delete_asset(alice, AssetId::new(77))
            .await
            .unwrap_err();

        assert!(matches!(err, AssetVaultError::AssetNotFound(id) if id == AssetId::new(77)));
    }

    #[tokio::test]
    async fn test_delete_all_assets() {
        let (service, alice, bob) = setup().await;
        for _ in 0..3 {
            service.create_asset(alice, &binance_btc()).await.unwrap();
        }
        service.create_asset(bob, &binance_btc()).await.unwrap();

        assert_eq!(service.delete_all_assets(alice).await.unwrap(), 3);
        assert!(service.list_assets(alice).await.unwrap().is_empty());
        assert_eq!(service.list_assets(bob).await.unwrap().len(), 1);

        let err = service
            .delete_all_assets(UserId::new(42))
            .await
            .unwrap_err();
        assert!(matches!(err, AssetVaultError::UserNotFound(_)));
    }
}
