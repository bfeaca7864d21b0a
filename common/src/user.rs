//! User model.
//!
//! Users are only the owners of assets here; authentication happens
//! elsewhere.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Salted credential hash. Never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Fields for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: UserId::new(1),
            name: "user_1".to_string(),
            email: "user_1@test.com".to_string(),
            password_hash: "sha256$abc$def".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("sha256"));
    }
}
