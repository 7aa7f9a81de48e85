//! `GET /ready` — the readiness probe.
//!
//! Answers 204 once startup wiring has completed and 500 at any earlier
//! point. The gate flips exactly once and never reverts; a stale "not
//! ready" read during the flip is harmless, so relaxed ordering is
//! sufficient. This endpoint is excluded from access logging (see
//! [`crate::logging::DO_NOT_LOG`]).

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;

use crate::server::AppState;

pub async fn ready_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
