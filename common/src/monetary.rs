//! Currency and exchange-rate types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A currency code, normalized to upper case.
///
/// Any code is accepted here: conversion targets such as `USD` are not
/// holdable assets. See [`AssetCurrency`] for the restricted set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Get the code in the lower-case form used by remote rate sources.
    pub fn lower_code(&self) -> String {
        self.0.to_lowercase()
    }

    /// US dollar, the default reference currency.
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<AssetCurrency> for Currency {
    fn from(currency: AssetCurrency) -> Self {
        Self::new(currency.code())
    }
}

/// An ordered currency pair: converting one unit of `from` into `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(from: Currency, to: Currency) -> Self {
        Self { from, to }
    }

    /// Whether both sides are the same currency.
    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

/// A fetched exchange rate.
///
/// `rate` units of `pair.to` equal one unit of `pair.from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// The currency pair.
    pub pair: CurrencyPair,
    /// Conversion factor, always positive.
    pub rate: Decimal,
    /// When the rate was obtained.
    pub fetched_at: DateTime<Utc>,
    /// Rate source.
    pub source: String,
}

impl ExchangeRate {
    /// Create a new exchange rate.
    pub fn new(
        pair: CurrencyPair,
        rate: Decimal,
        fetched_at: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            pair,
            rate,
            fetched_at,
            source: source.into(),
        }
    }

    /// The rate of a currency against itself.
    pub fn identity(currency: Currency, fetched_at: DateTime<Utc>) -> Self {
        Self::new(
            CurrencyPair::new(currency.clone(), currency),
            Decimal::ONE,
            fetched_at,
            "IDENTITY",
        )
    }

    /// Convert an amount of the source currency into the target currency.
    ///
    /// Returns `None` when the product does not fit in a `Decimal`.
    pub fn convert(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.rate)
    }
}

/// Currencies an asset may be held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetCurrency {
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "IOTA")]
    Iota,
}

impl AssetCurrency {
    /// Every holdable currency.
    pub const ALL: [AssetCurrency; 3] = [AssetCurrency::Btc, AssetCurrency::Eth, AssetCurrency::Iota];

    /// Get the currency code.
    pub fn code(&self) -> &'static str {
        match self {
            AssetCurrency::Btc => "BTC",
            AssetCurrency::Eth => "ETH",
            AssetCurrency::Iota => "IOTA",
        }
    }
}

impl fmt::Display for AssetCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a code is not a holdable currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedCurrency(pub String);

impl fmt::Display for UnsupportedCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsupported asset currency: {}", self.0)
    }
}

impl std::error::Error for UnsupportedCurrency {}

impl FromStr for AssetCurrency {
    type Err = UnsupportedCurrency;

    /// Case-sensitive: `btc` is not a holdable currency.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetCurrency::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| UnsupportedCurrency(s.to_string()))
    }
}
