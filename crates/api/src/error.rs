//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, ApiError>`. Responses are JSON bodies of the form
//! `{"statusCode": 404, "message": "..."}`, the shape the storefront
//! frontend already understands.

use axum::{
    extract::FromRequest,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::{AuthError, TokenError};
use crate::services::sales::SaleError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing, malformed, expired, or unverifiable bearer token.
    #[error("Unauthorized")]
    InvalidToken,

    /// Authenticated, but acting on a resource owned by someone else.
    #[error("Forbidden")]
    Forbidden,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Account operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Sale operation failed.
    #[error("Sale error: {0}")]
    Sale(#[from] SaleError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Sign(_) => Self::Internal("token signing failed".to_owned()),
            TokenError::Invalid => Self::InvalidToken,
        }
    }
}

/// Map a repository error to a status code.
///
/// Conflicts surface as 409 and missing rows as 404; everything else is a
/// server-side failure.
fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UsernameTaken => StatusCode::CONFLICT,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::InvalidUsername(_)
                | AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(inner) => repository_status(inner),
                AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Sale(err) => match err {
                SaleError::EmptyProducts | SaleError::InvalidItem { .. } => {
                    StatusCode::BAD_REQUEST
                }
                SaleError::Repository(inner) => repository_status(inner),
            },
            Self::Database(err) => repository_status(err),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the client.
    ///
    /// Credential failures collapse into one generic message so a caller
    /// cannot tell which check rejected them, and server-side details are
    /// never exposed.
    fn client_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::InvalidToken => "Unauthorized".to_owned(),
            Self::Forbidden => "Forbidden".to_owned(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::UsernameTaken => {
                    "An account with this username already exists".to_owned()
                }
                AuthError::UserNotFound => "User not found".to_owned(),
                AuthError::InvalidUsername(inner) => inner.to_string(),
                AuthError::InvalidEmail(inner) => inner.to_string(),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::Repository(RepositoryError::Conflict(_)) => {
                    "An account with this username already exists".to_owned()
                }
                AuthError::Repository(RepositoryError::NotFound) => "User not found".to_owned(),
                _ => "Internal server error".to_owned(),
            },
            Self::Sale(err) => match err {
                SaleError::EmptyProducts | SaleError::InvalidItem { .. } => err.to_string(),
                SaleError::Repository(RepositoryError::NotFound) => "User not found".to_owned(),
                SaleError::Repository(_) => "Internal server error".to_owned(),
            },
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(RepositoryError::NotFound) => "Not found".to_owned(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.client_message(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

/// JSON extractor whose rejection is an [`ApiError::Validation`].
///
/// Axum's stock `Json` rejection answers with plain text and a mix of 400,
/// 415, and 422 statuses; routing it through `ApiError` keeps every
/// malformed body on the 400-with-JSON-body contract.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("user 42".to_owned());
        assert_eq!(err.to_string(), "Not found: user 42");

        let err = ApiError::Validation("bad input".to_owned());
        assert_eq!(err.to_string(), "Validation failed: bad input");
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            status_of(ApiError::Validation("x".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApiError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ApiError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(ApiError::NotFound("x".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Internal("x".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            status_of(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AuthError::UsernameTaken.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AuthError::UserNotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AuthError::WeakPassword("too short".to_owned()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_sale_error_status_codes() {
        assert_eq!(
            status_of(SaleError::EmptyProducts.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(
                SaleError::InvalidItem {
                    index: 0,
                    field: "quantity",
                    reason: "must be a positive integer",
                }
                .into()
            ),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_credential_failures_share_a_message() {
        // Wrong password and unknown username must be indistinguishable.
        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.client_message(), "Invalid credentials");
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = ApiError::Internal("pool exhausted on shard 3".to_owned());
        assert_eq!(err.client_message(), "Internal server error");
    }
}
