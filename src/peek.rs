//! `/peek` collaborator — alias inspection without redirecting.
//!
//! Lets link previewers and curious users see where an alias leads
//! before following it. Shares the one registry instance with the
//! redirect dispatcher.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::server::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/{alias}", get(peek_handler))
}

async fn peek_handler(
    State(state): State<Arc<AppState>>,
    Path(alias): Path<String>,
) -> Response {
    match state.aliases.resolve(&alias) {
        Some(destination) => Json(json!({
            "name": alias,
            "destination": destination,
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown alias '{alias}'") })),
        )
            .into_response(),
    }
}
