//! Asset valuation in a reference currency.

use std::collections::BTreeMap;
use std::sync::Arc;

use assetvault_common::{AssetVaultError, Currency, Result, UserId};
use assetvault_fx::FxEngine;
use assetvault_store::SharedStore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Converted values grouped by label, then by the asset's own currency.
///
/// Serializes as `{"binance": {"BTC": 40010000, "IOTA": 24.4}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValuationResult(BTreeMap<String, BTreeMap<String, Decimal>>);

impl ValuationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an amount under `(label, currency)`, summing with any amount
    /// already there.
    pub fn add(&mut self, label: &str, currency: &str, amount: Decimal) -> Result<()> {
        let leaf = self
            .0
            .entry(label.to_string())
            .or_default()
            .entry(currency.to_string())
            .or_insert(Decimal::ZERO);

        *leaf = leaf.checked_add(amount).ok_or_else(|| {
            AssetVaultError::Overflow(format!("Value of {} {} overflowed", label, currency))
        })?;
        Ok(())
    }

    pub fn get(&self, label: &str, currency: &str) -> Option<Decimal> {
        self.0.get(label)?.get(currency).copied()
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    /// Every `(label, currency, amount)` leaf.
    pub fn leaves(&self) -> impl Iterator<Item = (&str, &str, Decimal)> {
        self.0.iter().flat_map(|(label, by_currency)| {
            by_currency
                .iter()
                .map(move |(currency, amount)| (label.as_str(), currency.as_str(), *amount))
        })
    }

    /// Flat sum over every leaf.
    pub fn total(&self) -> Result<Decimal> {
        self.leaves()
            .try_fold(Decimal::ZERO, |sum, (_, _, amount)| sum.checked_add(amount))
            .ok_or_else(|| AssetVaultError::Overflow("Total value overflowed".to_string()))
    }
}

/// Values a user's holdings through the rate engine.
#[derive(Clone)]
pub struct Valuation {
    store: SharedStore,
    fx: Arc<FxEngine>,
}

impl Valuation {
    pub fn new(store: SharedStore, fx: Arc<FxEngine>) -> Self {
        Self { store, fx }
    }

    /// Value every asset of `user_id` in `target`, grouped by label and
    /// currency.
    ///
    /// The first asset seen under a label contributes the bare rate; every
    /// later asset under that label contributes rate × value. A single
    /// failed rate lookup fails the whole valuation.
    #[instrument(skip(self), fields(user_id = %user_id, currency = %target))]
    pub async fn value_by_currency(
        &self,
        user_id: UserId,
        target: &Currency,
    ) -> Result<ValuationResult> {
        if self.store.find_user(user_id).await?.is_none() {
            return Err(AssetVaultError::UserNotFound(user_id));
        }

        let assets = self.store.list_assets(user_id).await?;
        let mut result = ValuationResult::new();

        for asset in &assets {
            let rate = self
                .fx
                .get_rate_for(Currency::from(asset.currency), target.clone())
                .await?;
            let amount = if result.contains_label(&asset.label) {
                rate.convert(asset.value).ok_or_else(|| {
                    AssetVaultError::Overflow(format!(
                        "Value of asset {} overflowed in {}",
                        asset.id, target
                    ))
                })?
            } else {
                rate.rate
            };
            result.add(&asset.label, asset.currency.code(), amount)?;
        }

        debug!(assets = assets.len(), "Valued assets");
        Ok(result)
    }

    /// Total value of every asset of `user_id` in `target`.
    pub async fn total_value(&self, user_id: UserId, target: &Currency) -> Result<Decimal> {
        self.value_by_currency(user_id, target).await?.total()
    }
}
