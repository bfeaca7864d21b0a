//! PostgreSQL record store.

use std::str::FromStr;

use async_trait::async_trait;
use assetvault_common::{Asset, AssetCurrency, AssetId, NewAsset, NewUser, User, UserId};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::store::AssetStore;

const ASSET_COLUMNS: &str = "id, user_id, label, currency, value";
const USER_COLUMNS: &str = "id, name, email, password_hash";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

#[derive(Debug, FromRow)]
struct AssetRow {
    id: i64,
    user_id: i64,
    label: String,
    currency: String,
    value: Decimal,
}

impl TryFrom<AssetRow> for Asset {
    type Error = StoreError;

    fn try_from(row: AssetRow) -> StoreResult<Self> {
        let currency = AssetCurrency::from_str(&row.currency)
            .map_err(|e| StoreError::Corrupt(format!("asset {}: {}", row.id, e)))?;

        Ok(Asset {
            id: AssetId::new(row.id),
            user_id: UserId::new(row.user_id),
            label: row.label,
            currency,
            value: row.value,
        })
    }
}

/// A store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!(max_connections, "Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations.
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Schema migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map_or(false, |db| db.is_foreign_key_violation())
}

#[async_trait]
impl AssetStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(user_id.get())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(User::from))
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn count_users(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn delete_user(&self, user_id: UserId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_asset(&self, user_id: UserId, asset: NewAsset) -> StoreResult<Asset> {
        let row: AssetRow = sqlx::query_as(&format!(
            "INSERT INTO assets (user_id, label, currency, value) VALUES ($1, $2, $3, $4) \
             RETURNING {ASSET_COLUMNS}"
        ))
        .bind(user_id.get())
        .bind(&asset.label)
        .bind(asset.currency.code())
        .bind(asset.value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StoreError::MissingOwner(user_id)
            } else {
                StoreError::Database(e)
            }
        })?;

        debug!(asset_id = row.id, user_id = %user_id, "Inserted asset");
        row.try_into()
    }

    async fn find_asset(&self, asset_id: AssetId) -> StoreResult<Option<Asset>> {
        let row: Option<AssetRow> =
            sqlx::query_as(&format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1"))
                .bind(asset_id.get())
                .fetch_optional(&self.pool)
                .await?;
        row.map(Asset::try_from).transpose()
    }

    async fn update_asset(&self, asset: &Asset) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE assets SET label = $2, currency = $3, value = $4 WHERE id = $1")
                .bind(asset.id.get())
                .bind(&asset.label)
                .bind(asset.currency.code())
                .bind(asset.value)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_asset(&self, asset_id: AssetId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(asset_id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_assets(&self, user_id: UserId) -> StoreResult<Vec<Asset>> {
        let rows: Vec<AssetRow> = sqlx::query_as(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Asset::try_from).collect()
    }

    async fn delete_user_assets(&self, user_id: UserId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM assets WHERE user_id = $1")
            .bind(user_id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
