//! Integration tests for Stitchline.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p stitchline-cli -- migrate
//!
//! # Start the api server
//! cargo run -p stitchline-api
//!
//! # Run integration tests (they are #[ignore]d by default)
//! cargo test -p stitchline-integration-tests -- --ignored
//! ```
//!
//! The tests talk to a running server over HTTP; nothing here links against
//! the api crate, so they exercise the real wire contract.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the api (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_owned())
}

/// Plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique username per test run, so tests don't trip the unique index.
#[must_use]
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Sign up and log in a fresh account; returns `(user_id, access_token)`.
///
/// # Panics
///
/// Panics if signup or login fails - the suite cannot proceed without an
/// account.
pub async fn signup_and_login(client: &Client, username: &str, password: &str) -> (String, String) {
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/users/signup"))
        .json(&json!({"username": username, "password": password}))
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(resp.status(), 201, "signup should succeed");

    let resp = client
        .post(format!("{base_url}/api/users/login"))
        .json(&json!({"username": username, "password": password}))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), 200, "login should succeed");

    let body: Value = resp.json().await.expect("Failed to parse login response");
    let user_id = body["user"]["id"]
        .as_str()
        .expect("login response should carry the user id")
        .to_owned();
    let token = body["access_token"]
        .as_str()
        .expect("login response should carry a token")
        .to_owned();

    (user_id, token)
}
