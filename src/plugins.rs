//! `/plugins` collaborator — plugin manifest advertisement.
//!
//! Boundary-thin: the gateway only advertises the manifest URLs it was
//! configured with. Registry CRUD is an external concern.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::server::AppState;

pub async fn list_plugins(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.settings.plugin_urls.clone())
}
