//! Asset field validation.
//!
//! Rules are checked in a fixed order and the first violation is reported:
//! label, then currency, then value.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::asset::{AssetDraft, NewAsset};
use crate::error::{AssetVaultError, Result};
use crate::AssetCurrency;

pub const LABEL_EMPTY: &str = "Label cannot be empty.";
pub const CURRENCY_EMPTY: &str = "Currency cannot be empty.";
pub const CURRENCY_INVALID: &str = "Invalid currency.";
pub const VALUE_EMPTY: &str = "Value cannot be empty.";
pub const VALUE_NEGATIVE: &str = "Value cannot be negative.";
pub const VALUE_TOO_LARGE: &str = "Value cannot exceed 99999999.99.";

/// Fractional digits kept on asset values.
pub const VALUE_SCALE: u32 = 2;

/// Largest storable value, the bound of a `NUMERIC(10,2)` column.
pub fn max_value() -> Decimal {
    Decimal::new(9_999_999_999, VALUE_SCALE)
}

/// Validate a draft, producing the typed fields on success.
pub fn validate(draft: &AssetDraft) -> Result<NewAsset> {
    let label = match draft.label.as_deref() {
        Some(label) if !label.trim().is_empty() => label.to_string(),
        _ => return Err(AssetVaultError::invalid(LABEL_EMPTY)),
    };

    // Only an absent currency is "empty"; a blank string is simply not in the set.
    let currency = draft
        .currency
        .as_deref()
        .ok_or_else(|| AssetVaultError::invalid(CURRENCY_EMPTY))?
        .parse::<AssetCurrency>()
        .map_err(|_| AssetVaultError::invalid(CURRENCY_INVALID))?;

    let value = draft
        .value
        .ok_or_else(|| AssetVaultError::invalid(VALUE_EMPTY))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AssetVaultError::invalid(VALUE_NEGATIVE));
    }

    let value = normalize_value(value);
    if value > max_value() {
        return Err(AssetVaultError::invalid(VALUE_TOO_LARGE));
    }

    Ok(NewAsset {
        label,
        currency,
        value,
    })
}

fn normalize_value(value: Decimal) -> Decimal {
    // -0.00 would otherwise survive as a signed zero
    value
        .round_dp_with_strategy(VALUE_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn valid_draft() -> AssetDraft {
        AssetDraft::empty()
            .with_label("test asset")
            .with_currency("BTC")
            .with_value(dec!(1))
    }

    fn message(draft: &AssetDraft) -> String {
        validate(draft).unwrap_err().to_string()
    }

    #[test]
    fn test_valid_asset() {
        let asset = validate(&valid_draft()).unwrap();
        assert_eq!(asset.label, "test asset");
        assert_eq!(asset.currency, AssetCurrency::Btc);
        assert_eq!(asset.value, dec!(1));
    }

    #[test]
    fn test_blank_label() {
        assert_eq!(message(&valid_draft().with_label("   ")), LABEL_EMPTY);

        let mut draft = valid_draft();
        draft.label = None;
        assert_eq!(message(&draft), LABEL_EMPTY);
    }

    #[test]
    fn test_currency_rules() {
        let mut draft = valid_draft();
        draft.currency = None;
        assert_eq!(message(&draft), CURRENCY_EMPTY);

        assert_eq!(message(&valid_draft().with_currency("")), CURRENCY_INVALID);
        assert_eq!(message(&valid_draft().with_currency("  ")), CURRENCY_INVALID);
        assert_eq!(message(&valid_draft().with_currency("USD")), CURRENCY_INVALID);
        assert_eq!(message(&valid_draft().with_currency("eth")), CURRENCY_INVALID);
    }

    #[test]
    fn test_value_rules() {
        let mut draft = valid_draft();
        draft.value = None;
        assert_eq!(message(&draft), VALUE_EMPTY);

        assert_eq!(message(&valid_draft().with_value(dec!(-0.01))), VALUE_NEGATIVE);
        assert!(validate(&valid_draft().with_value(Decimal::ZERO)).is_ok());
    }

    #[test]
    fn test_value_bounded_by_column_precision() {
        let asset = validate(&valid_draft().with_value(dec!(99999999.99))).unwrap();
        assert_eq!(asset.value, max_value());

        assert_eq!(message(&valid_draft().with_value(dec!(100000000))), VALUE_TOO_LARGE);
        assert_eq!(message(&valid_draft().with_value(dec!(99999999.995))), VALUE_TOO_LARGE);
        assert_eq!(
            message(&valid_draft().with_value(Decimal::from_scientific("1e25").unwrap())),
            VALUE_TOO_LARGE
        );
    }

    #[test]
    fn test_first_violation_wins() {
        let draft = AssetDraft::empty()
            .with_label("")
            .with_currency("DOGE")
            .with_value(dec!(-5));
        assert_eq!(message(&draft), LABEL_EMPTY);

        let draft = valid_draft().with_currency("DOGE").with_value(dec!(-5));
        assert_eq!(message(&draft), CURRENCY_INVALID);
    }

    #[test]
    fn test_value_rounded_to_two_places() {
        let asset = validate(&valid_draft().with_value(dec!(1.005))).unwrap();
        assert_eq!(asset.value, dec!(1.01));

        let asset = validate(&valid_draft().with_value(dec!(-0.001))).unwrap_err();
        assert_eq!(asset.to_string(), VALUE_NEGATIVE);
    }

    fn currency_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("BTC"), Just("ETH"), Just("IOTA")]
    }

    proptest! {
        #[test]
        fn prop_well_formed_assets_validate(
            label in "[a-zA-Z0-9][a-zA-Z0-9 _-]{0,30}",
            currency in currency_strategy(),
            cents in 0i64..10_000_000_000,
        ) {
            let draft = AssetDraft::empty()
                .with_label(label.clone())
                .with_currency(currency)
                .with_value(Decimal::new(cents, 2));

            let asset = validate(&draft).unwrap();
            prop_assert_eq!(asset.label, label);
            prop_assert_eq!(asset.currency.code(), currency);
            prop_assert_eq!(asset.value, Decimal::new(cents, 2));
        }

        #[test]
        fn prop_negative_values_rejected(
            currency in currency_strategy(),
            cents in 1i64..10_000_000_000,
        ) {
            let draft = AssetDraft::empty()
                .with_label("wallet")
                .with_currency(currency)
                .with_value(Decimal::new(-cents, 2));

            prop_assert_eq!(validate(&draft).unwrap_err().to_string(), VALUE_NEGATIVE);
        }
    }
}
