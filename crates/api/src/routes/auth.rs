//! Authentication route handlers.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::error::{ApiError, Json};
use crate::models::user::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login: a bearer token plus the account it identifies.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub access_token: String,
    pub user: User,
}

/// Handle a login attempt.
///
/// Serves both `POST /api/users/login` and `POST /api/auth/login`. Any
/// failure - unknown username or wrong password - answers with the same
/// generic 401.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = AuthService::new(state.pool())
        .login(&request.username, &request.password)
        .await?;

    let access_token = state.tokens().issue(&user)?;

    tracing::info!(user_id = %user.id, "login");

    Ok(Json(LoginResponse {
        message: "Login successful",
        access_token,
        user,
    }))
}

/// Reachability probe for the auth surface.
pub async fn test() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Auth API is working!",
    })
}
