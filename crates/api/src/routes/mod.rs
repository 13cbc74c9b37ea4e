//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Service banner
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//! GET  /api                    - Endpoint index
//!
//! # Users
//! POST   /api/users/signup     - Create an account
//! POST   /api/users/login      - Login (token + user)
//! GET    /api/users/{id}       - Own profile (bearer token, self only)
//! PUT    /api/users/{id}       - Update own profile
//! DELETE /api/users/{id}       - Delete own account
//!
//! # Auth
//! POST /api/auth/login         - Login (same handler as /api/users/login)
//! POST /api/auth/test          - Reachability probe
//!
//! # Sales
//! POST /api/sales              - Record a sale for the authenticated user
//! GET  /api/sales/{userId}     - Own sale history, newest first
//! ```

pub mod auth;
pub mod meta;
pub mod sales;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// A bare confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(users::signup))
        .route("/login", post(auth::login))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::destroy),
        )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/test", post(auth::test))
}

/// Create the sale routes router.
pub fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(sales::create))
        .route("/{user_id}", get(sales::history))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Endpoint index
        .route("/api", get(meta::api_index))
        // User routes
        .nest("/api/users", user_routes())
        // Auth routes
        .nest("/api/auth", auth_routes())
        // Sale routes
        .nest("/api/sales", sale_routes())
}
