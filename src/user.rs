//! `/user` collaborator — session boundary.
//!
//! Session management and profile storage are external collaborators;
//! the gateway only exposes the boundary. Without an authenticated
//! session every request here is a 401.

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

pub async fn me_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "not logged in" })),
    )
}
