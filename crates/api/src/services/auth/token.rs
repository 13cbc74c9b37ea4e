//! Stateless bearer tokens.
//!
//! Tokens are HS256-signed JWTs carrying the account's identity and a
//! snapshot of its profile at issuance time. The server keeps no session
//! table: validity is purely signature + expiry, checked at verification
//! time. There is no revocation before expiry - a token stays valid for its
//! full 24 hours even if the account logs out or changes its password.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stitchline_core::UserId;

use crate::models::user::User;

/// Token lifetime.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Errors from token issuance and verification.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed.
    #[error("failed to sign token")]
    Sign(#[source] jsonwebtoken::errors::Error),

    /// The token is malformed, carries a bad signature, or has expired.
    ///
    /// One variant for all three on purpose: callers (and therefore clients)
    /// cannot tell which check rejected the token.
    #[error("invalid or expired token")]
    Invalid,
}

/// The claims embedded in a token at issuance.
///
/// This is the principal used for authorization decisions. It is the profile
/// as it was when the token was minted, not a live read: edits made after
/// issuance stay invisible to the token's holder until they log in again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject: the account's ID.
    pub sub: UserId,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

/// Issues and verifies bearer tokens with a server-held symmetric secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the signing secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Issue a token for a user, valid for [`TOKEN_TTL_HOURS`] from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Sign` if encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as of the given instant.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Sign` if encoding fails.
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: user.id,
            username: user.username.to_string(),
            email: user.email.as_ref().map(ToString::to_string),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            address: user.address.clone(),
            phone_number: user.phone_number.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            iat,
            exp: iat + TOKEN_TTL_HOURS * 3600,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Verify a token and return the claims embedded at issuance.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, a past expiry, or
    /// a structurally malformed token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use stitchline_core::{Email, Username};
    use uuid::Uuid;

    fn service() -> TokenService {
        TokenService::new(b"0123456789abcdef0123456789abcdef")
    }

    fn sample_user() -> User {
        // Truncate to whole seconds: timestamps round-trip through Unix
        // seconds inside the token.
        let now = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap();
        User {
            id: UserId::new(Uuid::new_v4()),
            username: Username::parse("alice").unwrap(),
            email: Some(Email::parse("alice@example.com").unwrap()),
            first_name: Some("Alice".to_owned()),
            last_name: Some("Carver".to_owned()),
            address: Some("1 Mill Lane".to_owned()),
            phone_number: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_roundtrip_returns_issuance_snapshot() {
        let tokens = service();
        let user = sample_user();

        let token = tokens.issue(&user).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.first_name.as_deref(), Some("Alice"));
        assert_eq!(claims.address.as_deref(), Some("1 Mill Lane"));
        assert_eq!(claims.phone_number, None);
        assert_eq!(claims.created_at, user.created_at);
        assert_eq!(claims.exp, claims.iat + TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_snapshot_is_stale_by_design() {
        // A token minted before a profile edit keeps the old profile.
        let tokens = service();
        let mut user = sample_user();

        let token = tokens.issue(&user).unwrap();
        user.first_name = Some("Alicia".to_owned());

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.first_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();
        let user = sample_user();

        // Issued 25 hours ago, so a 24-hour token is an hour past expiry,
        // well beyond the default validation leeway.
        let issued = Utc::now() - Duration::hours(25);
        let token = tokens.issue_at(&user, issued).unwrap();

        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = service();
        let token = tokens.issue(&sample_user()).unwrap();

        // Flip a character in the payload segment.
        let mut tampered = token.into_bytes();
        let mid = tampered.len() / 2;
        tampered[mid] = if tampered[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(matches!(tokens.verify(&tampered), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue(&sample_user()).unwrap();
        let other = TokenService::new(b"fedcba9876543210fedcba9876543210");

        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = service();
        assert!(tokens.verify("").is_err());
        assert!(tokens.verify("not-a-token").is_err());
        assert!(tokens.verify("a.b.c").is_err());
    }
}
