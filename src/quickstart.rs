//! `/quickstart` collaborator — starter template listing.
//!
//! Boundary-thin: a static catalogue of starter states new users can
//! open. Template authoring and generation live outside the gateway.

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use crate::server::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub destination: &'static str,
}

const TEMPLATES: &[Template] = &[
    Template {
        id: "getting-started",
        title: "Getting started",
        description: "A guided first tour of the viewer",
        destination: "/#/human?tour=intro",
    },
    Template {
        id: "region-search",
        title: "Region search",
        description: "Jump straight into the region search panel",
        destination: "/#/human?panel=search",
    },
    Template {
        id: "compare-species",
        title: "Compare species",
        description: "Side-by-side human and monkey reference spaces",
        destination: "/#/human?compare=monkey",
    },
];

/// Routes below the list endpoint; the list itself is registered at the
/// top level so `GET /quickstart` needs no trailing slash.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/{id}", get(get_template))
}

pub async fn list_templates() -> Json<&'static [Template]> {
    Json(TEMPLATES)
}

async fn get_template(Path(id): Path<String>) -> Response {
    match TEMPLATES.iter().find(|t| t.id == id) {
        Some(template) => Json(template.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown template '{id}'") })),
        )
            .into_response(),
    }
}
