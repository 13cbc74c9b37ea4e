//! User route handlers.
//!
//! Signup is open; every other handler requires a bearer token and only ever
//! operates on the authenticated caller's own account.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use stitchline_core::UserId;

use super::MessageResponse;
use crate::error::{ApiError, Json};
use crate::middleware::{CurrentUser, ensure_owner};
use crate::models::user::User;
use crate::services::auth::{AuthService, SignupData, UpdateData};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Signup request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Partial profile update body. Omitted fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Confirmation envelope carrying the affected user.
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub message: &'static str,
    pub user: User,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an account.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    let user = AuthService::new(state.pool())
        .signup(SignupData {
            username: request.username,
            password: request.password,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            address: request.address,
            phone_number: request.phone_number,
        })
        .await?;

    tracing::info!(user_id = %user.id, "account created");

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User created successfully",
            user,
        }),
    ))
}

/// Fetch the caller's own profile.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
    ensure_owner(&principal, id)?;

    let user = AuthService::new(state.pool()).get_profile(id).await?;

    Ok(Json(user))
}

/// Update the caller's own profile.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<UserId>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    ensure_owner(&principal, id)?;

    let user = AuthService::new(state.pool())
        .update_profile(
            id,
            UpdateData {
                username: request.username,
                password: request.password,
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                address: request.address,
                phone_number: request.phone_number,
            },
        )
        .await?;

    Ok(Json(UserEnvelope {
        message: "User updated successfully",
        user,
    }))
}

/// Delete the caller's own account.
pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<UserId>,
) -> Result<Json<MessageResponse>, ApiError> {
    ensure_owner(&principal, id)?;

    AuthService::new(state.pool()).delete_account(id).await?;

    tracing::info!(user_id = %id, "account deleted");

    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
