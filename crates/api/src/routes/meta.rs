//! Service banner and endpoint index.

use serde_json::{Value, json};

use crate::error::Json;

/// Service banner at the root path.
pub async fn root() -> &'static str {
    "Stitchline API is running!"
}

/// Human-readable endpoint index.
pub async fn api_index() -> Json<Value> {
    Json(json!({
        "name": "Stitchline API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "REST backend for accounts and sales",
        "endpoints": {
            "users": {
                "signup": "POST /api/users/signup",
                "login": "POST /api/users/login",
                "profile": "GET /api/users/{id}",
            },
            "auth": {
                "login": "POST /api/auth/login",
                "test": "POST /api/auth/test",
            },
            "sales": {
                "create": "POST /api/sales",
                "history": "GET /api/sales/{userId}",
            },
        },
    }))
}
