//! Account service.
//!
//! Signup, login, profile reads and mutations, and password handling.

mod error;
mod token;

pub use error::AuthError;
pub use token::{Claims, TOKEN_TTL_HOURS, TokenError, TokenService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use stitchline_core::{Email, UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{NewUser, User, UserChanges};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Signup input, not yet validated.
#[derive(Debug, Clone)]
pub struct SignupData {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Partial profile update, not yet validated. `None` means "leave as is".
#[derive(Debug, Clone, Default)]
pub struct UpdateData {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Account service.
///
/// Validates input at the boundary, hashes and verifies passwords, and
/// delegates persistence to [`UserRepository`].
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` / `AuthError::InvalidEmail` on
    /// malformed input, `AuthError::WeakPassword` if the password doesn't
    /// meet requirements, and `AuthError::UsernameTaken` if the username is
    /// already registered.
    pub async fn signup(&self, data: SignupData) -> Result<User, AuthError> {
        let username = Username::parse(&data.username)?;
        let email = data.email.as_deref().map(Email::parse).transpose()?;
        validate_password(&data.password)?;

        let password_hash = hash_password(&data.password)?;

        let user = self
            .users
            .create(&NewUser {
                username,
                password_hash,
                email,
                first_name: data.first_name,
                last_name: data.last_name,
                address: data.address,
                phone_number: data.phone_number,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Validate a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown username or a
    /// wrong password - the caller cannot tell which. A structurally invalid
    /// username is folded into the same error for the same reason.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account doesn't exist.
    pub async fn get_profile(&self, id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Apply a partial profile update.
    ///
    /// Provided fields are validated and replaced; a provided password is
    /// re-hashed. Anything omitted keeps its current value.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account doesn't exist and
    /// `AuthError::UsernameTaken` if a new username is already registered.
    pub async fn update_profile(&self, id: UserId, data: UpdateData) -> Result<User, AuthError> {
        let username = data.username.as_deref().map(Username::parse).transpose()?;
        let email = data.email.as_deref().map(Email::parse).transpose()?;

        let password_hash = match data.password.as_deref() {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let user = self
            .users
            .update(
                id,
                &UserChanges {
                    username,
                    password_hash,
                    email,
                    first_name: data.first_name,
                    last_name: data.last_name,
                    address: data.address,
                    phone_number: data.phone_number,
                },
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user)
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account doesn't exist.
    pub async fn delete_account(&self, id: UserId) -> Result<(), AuthError> {
        let deleted = self.users.delete(id).await?;
        if !deleted {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id with a fresh per-user salt.
///
/// The salt is embedded in the returned PHC string.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// Every failure mode - unparseable hash included - collapses into
/// `InvalidCredentials`; this function never panics and never logs the
/// plaintext.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
