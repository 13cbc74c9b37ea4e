//! Authentication extractor and ownership guard.
//!
//! Provides the extractor that turns an incoming bearer token into an
//! authenticated principal, and the self-only ownership check applied to
//! owner-scoped resource paths.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use stitchline_core::UserId;

use crate::error::ApiError;
use crate::services::auth::Claims;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// The wrapped [`Claims`] are the principal: the identity snapshot taken at
/// token issuance. A missing header, an empty token, and a failed
/// verification all reject with the same `401` - the caller learns nothing
/// about which check failed.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(principal): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", principal.username)
/// }
/// ```
pub struct CurrentUser(pub Claims);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::InvalidToken)?;

        let claims = state
            .tokens()
            .verify(token)
            .map_err(|_| ApiError::InvalidToken)?;

        Ok(Self(claims))
    }
}

/// Pull a non-empty bearer token out of the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}

/// Require that the principal owns the resource.
///
/// The complete authorization model: the principal's id must equal the owner
/// id named in the request path. There are no roles, scopes, or admin
/// overrides. A mismatch is a `403`, distinct from the `401` of a failed
/// authentication.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` if the ids differ.
pub fn ensure_owner(principal: &Claims, owner: UserId) -> Result<(), ApiError> {
    if principal.sub == owner {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;
    use uuid::Uuid;

    fn headers_with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn claims_for(id: UserId) -> Claims {
        let now = Utc::now();
        Claims {
            sub: id,
            username: "alice".to_owned(),
            email: None,
            first_name: None,
            last_name: None,
            address: None,
            phone_number: None,
            created_at: now,
            updated_at: now,
            iat: now.timestamp(),
            exp: now.timestamp() + 3600,
        }
    }

    #[test]
    fn test_bearer_token_extracts_token() {
        let headers = headers_with_authorization("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_bearer_token_empty_token() {
        let headers = headers_with_authorization("Bearer ");
        assert_eq!(bearer_token(&headers), None);

        let headers = headers_with_authorization("Bearer    ");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with_authorization("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_ensure_owner_accepts_self() {
        let id = UserId::new(Uuid::new_v4());
        assert!(ensure_owner(&claims_for(id), id).is_ok());
    }

    #[test]
    fn test_ensure_owner_rejects_other() {
        let principal = claims_for(UserId::new(Uuid::new_v4()));
        let other = UserId::new(Uuid::new_v4());

        assert!(matches!(
            ensure_owner(&principal, other),
            Err(ApiError::Forbidden)
        ));
    }
}
