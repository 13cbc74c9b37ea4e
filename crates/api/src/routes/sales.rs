//! Sale route handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use stitchline_core::UserId;

use crate::error::{ApiError, Json};
use crate::middleware::{CurrentUser, ensure_owner};
use crate::models::sale::{LineItem, Sale};
use crate::services::sales::SaleService;
use crate::state::AppState;

/// Checkout request body.
///
/// Unknown fields are ignored, so a client-supplied `totalPrice` is dropped
/// on the floor here and the authoritative total is computed server-side.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub products: Vec<LineItem>,
}

/// Confirmation envelope carrying the recorded sale.
#[derive(Debug, Serialize)]
pub struct SaleEnvelope {
    pub message: &'static str,
    pub sale: Sale,
}

/// A user's sale history.
#[derive(Debug, Serialize)]
pub struct SalesResponse {
    pub sales: Vec<Sale>,
}

/// Record a sale for the authenticated user.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(request): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<SaleEnvelope>), ApiError> {
    let sale = SaleService::new(state.pool())
        .create(principal.sub, request.products)
        .await?;

    tracing::info!(sale_id = %sale.id, user_id = %sale.user_id, "sale recorded");

    Ok((
        StatusCode::CREATED,
        Json(SaleEnvelope {
            message: "Sale created successfully",
            sale,
        }),
    ))
}

/// List the caller's own sales, newest first.
pub async fn history(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(user_id): Path<UserId>,
) -> Result<Json<SalesResponse>, ApiError> {
    ensure_owner(&principal, user_id)?;

    let sales = SaleService::new(state.pool()).list_by_owner(user_id).await?;

    Ok(Json(SalesResponse { sales }))
}
