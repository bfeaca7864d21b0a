//! Asset model and the submitted-field mapping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::{AssetVaultError, Result};
use crate::{AssetCurrency, AssetId, UserId};

/// Field names a client may assign on create or update.
pub const ASSIGNABLE_FIELDS: [&str; 3] = ["label", "currency", "value"];

/// A stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Store-assigned identifier.
    pub id: AssetId,
    /// Owning user.
    pub user_id: UserId,
    /// Free-form label, e.g. the exchange or wallet holding the asset.
    pub label: String,
    /// Holding currency.
    pub currency: AssetCurrency,
    /// Amount held, two fractional digits.
    pub value: Decimal,
}

impl Asset {
    /// Materialize a validated asset under a store-assigned ID.
    pub fn from_new(id: AssetId, user_id: UserId, new: NewAsset) -> Self {
        Self {
            id,
            user_id,
            label: new.label,
            currency: new.currency,
            value: new.value,
        }
    }

    /// Replace the mutable fields with a validated set.
    pub fn apply(&mut self, update: NewAsset) {
        self.label = update.label;
        self.currency = update.currency;
        self.value = update.value;
    }
}

/// Outward representation of an asset.
///
/// The owner is deliberately absent: the client already addressed the asset
/// through its user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetView {
    pub id: AssetId,
    pub label: String,
    pub currency: AssetCurrency,
    pub value: Decimal,
}

impl From<&Asset> for AssetView {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id,
            label: asset.label.clone(),
            currency: asset.currency,
            value: asset.value,
        }
    }
}

impl From<Asset> for AssetView {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            label: asset.label,
            currency: asset.currency,
            value: asset.value,
        }
    }
}

/// A validated set of asset fields, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    pub label: String,
    pub currency: AssetCurrency,
    pub value: Decimal,
}

/// Candidate asset fields before validation.
///
/// Every field is optional so that a missing field surfaces as a validation
/// message rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDraft {
    pub label: Option<String>,
    pub currency: Option<String>,
    pub value: Option<Decimal>,
}

impl AssetDraft {
    /// A draft with nothing assigned, the starting point for creation.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A draft holding an existing asset's fields, the starting point for
    /// updates.
    pub fn from_asset(asset: &Asset) -> Self {
        Self {
            label: Some(asset.label.clone()),
            currency: Some(asset.currency.code().to_string()),
            value: Some(asset.value),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_value(mut self, value: Decimal) -> Self {
        self.value = Some(value);
        self
    }

    /// Assign submitted fields by name.
    ///
    /// Only [`ASSIGNABLE_FIELDS`] are applied; any other key is skipped and
    /// returned so the caller can log it. A JSON `null` (or an empty string
    /// for `value`) clears the field.
    pub fn apply_fields(&mut self, fields: &Map<String, Value>) -> Result<Vec<String>> {
        let mut ignored = Vec::new();

        for (key, value) in fields {
            match key.as_str() {
                "label" => self.label = text_field(value, "Label must be a string.")?,
                "currency" => self.currency = text_field(value, "Currency must be a string.")?,
                "value" => self.value = amount_field(value)?,
                _ => ignored.push(key.clone()),
            }
        }

        Ok(ignored)
    }
}

fn text_field(value: &Value, type_message: &str) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(AssetVaultError::invalid(type_message)),
    }
}

fn amount_field(value: &Value) -> Result<Option<Decimal>> {
    let raw = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(AssetVaultError::invalid("Value must be a number.")),
    };

    parse_decimal(&raw)
        .map(Some)
        .ok_or_else(|| AssetVaultError::invalid("Value must be a number."))
}

/// Parse a plain or scientific-notation decimal.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
