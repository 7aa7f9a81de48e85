//! Unified error types for Portico.
//!
//! Defines [`PorticoError`] (the main crate error enum) and
//! [`ValidationError`] for settings validation failures. Both use
//! `thiserror` for `Display` and `Error` derives. Error messages
//! include contextual hints to guide the user toward a fix.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|p| format!("  {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PorticoError {
    #[error("Settings validation failed:\n{}", format_errors(.errors))]
    SettingsValidation { errors: Vec<ValidationError> },

    #[error("Duplicate alias '{name}' registered by source '{source_name}'")]
    DuplicateAlias {
        name: String,
        source_name: &'static str,
    },

    #[error("Alias file {} is malformed:\n  {source}", path.display())]
    AliasFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Service descriptor not found. Tried:\n{}",
        format_candidates(.candidates)
    )]
    MetadataUnavailable { candidates: Vec<PathBuf> },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Readiness probe failed with status {0}")]
    ProbeFailed(http::StatusCode),
}
