//! User repository for database operations.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use stitchline_core::{Email, UserId, Username};

use super::RepositoryError;
use crate::models::user::{NewUser, User, UserChanges};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO users (username, password_hash, email, first_name, last_name, address, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, email, first_name, last_name, address, phone_number,
                      created_at, updated_at
            ",
        )
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(new.email.as_ref())
        .bind(new.first_name.as_deref())
        .bind(new.last_name.as_deref())
        .bind(new.address.as_deref())
        .bind(new.phone_number.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        map_user(&row)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, username, email, first_name, last_name, address, phone_number,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Get a user and their password hash by username.
    ///
    /// Returns `None` if no such account exists. The hash is returned beside
    /// the user, never inside it, so it cannot travel further than the login
    /// path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, username, email, first_name, last_name, address, phone_number,
                   created_at, updated_at, password_hash
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = map_user(&row)?;
        let password_hash: String = row.try_get("password_hash")?;

        Ok(Some((user, password_hash)))
    }

    /// Apply a partial update to an account.
    ///
    /// Unset fields keep their current value; `updated_at` is always
    /// refreshed. Concurrent updates are last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a new username is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r"
            UPDATE users
            SET username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                email = COALESCE($4, email),
                first_name = COALESCE($5, first_name),
                last_name = COALESCE($6, last_name),
                address = COALESCE($7, address),
                phone_number = COALESCE($8, phone_number),
                updated_at = now()
            WHERE id = $1
            RETURNING id, username, email, first_name, last_name, address, phone_number,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(changes.username.as_ref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.email.as_ref())
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.address.as_deref())
        .bind(changes.phone_number.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.as_ref().map(map_user).transpose()
    }

    /// Delete an account.
    ///
    /// # Returns
    ///
    /// Returns `true` if the account was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map a database row to a domain user.
///
/// Stored usernames and emails are re-parsed on the way out; a failure here
/// means the row was written by something other than this application.
fn map_user(row: &PgRow) -> Result<User, RepositoryError> {
    let username: String = row.try_get("username")?;
    let username = Username::parse(&username).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
    })?;

    let email: Option<String> = row.try_get("email")?;
    let email = email
        .map(|raw| Email::parse(&raw))
        .transpose()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))?;

    Ok(User {
        id: row.try_get("id")?,
        username,
        email,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        address: row.try_get("address")?,
        phone_number: row.try_get("phone_number")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
