//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stitchline_core::{Email, UserId, Username};

/// An account (domain type).
///
/// Deliberately has no password field: the hash lives only in the storage
/// layer, so serializing a `User` can never leak it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login handle, unique across all accounts.
    pub username: Username,
    /// Contact email, if provided.
    pub email: Option<Email>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Validated input for account creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
    pub email: Option<Email>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Validated partial update for an account.
///
/// `None` fields are left untouched; there is no way to null a field out
/// through a profile update.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<Username>,
    pub password_hash: Option<String>,
    pub email: Option<Email>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_user_json_never_contains_password_material() {
        let user = User {
            id: UserId::new(Uuid::new_v4()),
            username: Username::parse("alice").unwrap(),
            email: Some(Email::parse("alice@example.com").unwrap()),
            first_name: Some("Alice".to_owned()),
            last_name: None,
            address: None,
            phone_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn test_user_json_field_names_are_camel_case() {
        let user = User {
            id: UserId::new(Uuid::new_v4()),
            username: Username::parse("alice").unwrap(),
            email: None,
            first_name: Some("Alice".to_owned()),
            last_name: None,
            address: None,
            phone_number: Some("555-0100".to_owned()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"firstName\""));
        assert!(json.contains("\"phoneNumber\""));
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("\"first_name\""));
    }
}
