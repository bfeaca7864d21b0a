//! AssetVault Record Stores
//!
//! Persistence for users and their assets behind the [`AssetStore`] trait,
//! with an in-memory implementation and a PostgreSQL one.

pub mod store;
pub mod memory;
pub mod postgres;
pub mod credentials;
pub mod fixtures;
pub mod error;

pub use store::{AssetStore, SharedStore};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use credentials::hash_password;
pub use fixtures::{demo_users, seed_demo_users, DEMO_USER_COUNT};
pub use error::{StoreError, StoreResult};
