//! Account management commands.

use sqlx::PgPool;

use stitchline_api::services::auth::{AuthService, SignupData};

use super::migrate::database_url;

/// Create a new account.
///
/// Goes through the same signup path as the HTTP API, so validation and
/// password hashing behave identically.
///
/// # Errors
///
/// Returns an error if the database is unreachable or signup validation
/// fails (weak password, malformed username/email, duplicate username).
pub async fn create(
    username: &str,
    password: &str,
    email: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;
    let pool = PgPool::connect(&database_url).await?;

    let user = AuthService::new(&pool)
        .signup(SignupData {
            username: username.to_owned(),
            password: password.to_owned(),
            email,
            first_name: None,
            last_name: None,
            address: None,
            phone_number: None,
        })
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "account created");
    Ok(())
}
