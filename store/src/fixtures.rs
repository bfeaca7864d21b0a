//! Demo users for development databases.

use assetvault_common::NewUser;
use tracing::info;

use crate::credentials::hash_password;
use crate::error::StoreResult;
use crate::store::AssetStore;

/// Number of demo users created by [`seed_demo_users`].
pub const DEMO_USER_COUNT: usize = 10;

/// The demo users `user_0` .. `user_9`, each with password `password_<i>`.
pub fn demo_users() -> Vec<NewUser> {
    (0..DEMO_USER_COUNT)
        .map(|i| {
            NewUser::new(
                format!("user_{i}"),
                format!("user_{i}@test.com"),
                hash_password(&format!("password_{i}")),
            )
        })
        .collect()
}

/// Create the demo users if the store has no users yet.
///
/// Returns the number of users created.
pub async fn seed_demo_users(store: &dyn AssetStore) -> StoreResult<usize> {
    if store.count_users().await? > 0 {
        return Ok(0);
    }

    let users = demo_users();
    let count = users.len();
    for user in users {
        store.create_user(user).await?;
    }

    info!(count, backend = store.backend(), "Seeded demo users");
    Ok(count)
}
