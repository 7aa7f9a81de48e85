//! `GET /about` — the self-describing service descriptor.
//!
//! The descriptor core is read from `codemeta.json`, looked up at two
//! candidate locations in order (working directory, then the public
//! asset directory) and cached in a [`tokio::sync::OnceCell`] on first
//! success. Concurrent first callers may each attempt the load; every
//! attempt produces the same value, so the redundant initialization is
//! harmless. When neither candidate is readable the endpoint fails with
//! 500 and never returns partial metadata.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::Settings;
use crate::error::PorticoError;
use crate::server::AppState;

const DESCRIPTOR_CONTEXT: &str =
    "https://gitlab.ebrains.eu/lauramble/servicemeta/-/raw/main/data/contexts/servicemeta.jsonld";

/// The subset of `codemeta.json` the gateway advertises. Unknown fields
/// are ignored; a candidate missing any of these is rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMeta {
    pub author: Value,
    pub date_modified: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutResponse {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub author: Value,
    pub date_modified: String,
    pub documentation: String,
    pub name: String,
    pub version: String,
    pub input_format: String,
    pub output_format: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn candidates(settings: &Settings) -> Vec<PathBuf> {
    vec![
        PathBuf::from("codemeta.json"),
        settings.public_dir.join("codemeta.json"),
    ]
}

async fn read_descriptor(path: &PathBuf) -> Result<CodeMeta, DescriptorError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| DescriptorError::Read {
            path: path.clone(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| DescriptorError::Parse {
        path: path.clone(),
        source,
    })
}

/// Ordered two-step lookup. Every rejected candidate is logged with its
/// own error kind; only when all candidates fail does the load surface
/// an error.
pub async fn load_descriptor(settings: &Settings) -> Result<CodeMeta, PorticoError> {
    let candidates = candidates(settings);
    for path in &candidates {
        match read_descriptor(path).await {
            Ok(meta) => {
                tracing::info!(path = %path.display(), "service descriptor loaded");
                return Ok(meta);
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "descriptor candidate rejected");
            }
        }
    }
    Err(PorticoError::MetadataUnavailable { candidates })
}

pub async fn about_handler(State(state): State<Arc<AppState>>) -> Response {
    let meta = state
        .metadata
        .get_or_try_init(|| load_descriptor(&state.settings))
        .await;

    match meta {
        Ok(meta) => Json(AboutResponse {
            context: DESCRIPTOR_CONTEXT.into(),
            kind: "WebApplication".into(),
            author: meta.author.clone(),
            date_modified: meta.date_modified.clone(),
            documentation: state.settings.documentation_url.clone(),
            name: meta.name.clone(),
            version: meta.version.clone(),
            input_format: state.settings.input_format.clone(),
            output_format: state.settings.output_format.clone(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "cannot populate service descriptor");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "service descriptor unavailable" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codemeta_parses_with_extra_fields() {
        let raw = r#"{
            "@context": "https://doi.org/10.5063/schema/codemeta-2.0",
            "name": "portico",
            "version": "0.1.0",
            "author": [{"givenName": "Ada", "familyName": "Lovelace"}],
            "dateModified": "2026-05-01",
            "license": "MIT",
            "programmingLanguage": "Rust"
        }"#;
        let meta: CodeMeta = serde_json::from_str(raw).unwrap();
        assert_eq!(meta.name, "portico");
        assert_eq!(meta.date_modified, "2026-05-01");
    }

    #[test]
    fn codemeta_missing_required_field_is_rejected() {
        let raw = r#"{"name": "portico", "version": "0.1.0"}"#;
        assert!(serde_json::from_str::<CodeMeta>(raw).is_err());
    }
}
