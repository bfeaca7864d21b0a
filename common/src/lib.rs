//! AssetVault Common Types
//!
//! Shared types used across the AssetVault crates: identifiers, currencies
//! and exchange rates, the asset and user models, field validation, the
//! error taxonomy and an injectable clock.

pub mod identifiers;
pub mod monetary;
pub mod asset;
pub mod user;
pub mod validation;
pub mod error;
pub mod time;

pub use identifiers::*;
pub use monetary::*;
pub use asset::*;
pub use user::*;
pub use validation::validate;
pub use error::*;
pub use time::*;
