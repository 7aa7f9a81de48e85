//! Runtime settings assembled from CLI flags and environment variables.
//!
//! [`Settings`] is built once from [`RunArgs`](crate::cli::RunArgs) and
//! validated before the listener binds. Validation failures abort
//! startup with a [`ValidationError`] list; no partial service is ever
//! exposed.

use std::path::PathBuf;

use url::Url;

use crate::cli::RunArgs;
use crate::error::ValidationError;

/// Reserved top-level aliases, served directly under `/`. Overridable
/// with `--vip-routes`.
pub const DEFAULT_VIP_ROUTES: &[&str] = &["human", "monkey", "rat", "mouse", "bigbrain"];

/// Path segments owned by the gateway itself. A VIP name shadowing one
/// of these would make the corresponding endpoint unreachable.
pub const RESERVED_SEGMENTS: &[&str] = &[
    "ready",
    "about",
    "go",
    "saneUrl",
    "saneurl",
    "quickstart",
    "peek",
    "plugins",
    "user",
    ".well-known",
];

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Optional mount prefix for deployments behind a reverse proxy that
    /// does not strip the path. Must start with `/` and not end with `/`.
    pub base_path: Option<String>,
    pub public_dir: PathBuf,
    pub well_known_dir: PathBuf,
    pub session_secret: Option<String>,
    pub documentation_url: String,
    pub input_format: String,
    pub output_format: String,
    pub vip_routes: Vec<String>,
    pub plugin_urls: Vec<String>,
    pub max_body: usize,
}

impl Settings {
    #[must_use]
    pub fn from_args(args: &RunArgs) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            // An empty HOST_PATHNAME means "not configured", same as unset
            base_path: args
                .base_path
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(String::from),
            public_dir: args.public_dir.clone(),
            well_known_dir: args.well_known_dir.clone(),
            session_secret: args.session_secret.clone(),
            documentation_url: args.documentation_url.clone(),
            input_format: args.input_format.clone(),
            output_format: args.output_format.clone(),
            vip_routes: args.vip_routes.clone().unwrap_or_else(|| {
                DEFAULT_VIP_ROUTES.iter().map(ToString::to_string).collect()
            }),
            plugin_urls: args.plugin_urls.clone(),
            max_body: args.max_body,
        }
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(ref base) = self.base_path {
            if !base.starts_with('/') {
                errors.push(ValidationError {
                    field: "base-path".into(),
                    message: "must start with '/'".into(),
                    suggestion: Some(format!("did you mean '/{base}'?")),
                });
            }
            if base.ends_with('/') {
                errors.push(ValidationError {
                    field: "base-path".into(),
                    message: "must not end with '/'".into(),
                    suggestion: Some(format!(
                        "did you mean '{}'?",
                        base.trim_end_matches('/')
                    )),
                });
            }
        }

        let mut seen = std::collections::HashSet::new();
        for name in &self.vip_routes {
            if name.is_empty() {
                errors.push(ValidationError {
                    field: "vip-routes".into(),
                    message: "alias name cannot be empty".into(),
                    suggestion: None,
                });
                continue;
            }
            if !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            {
                errors.push(ValidationError {
                    field: "vip-routes".into(),
                    message: format!(
                        "'{name}' contains characters outside [A-Za-z0-9._-]"
                    ),
                    suggestion: None,
                });
            }
            if RESERVED_SEGMENTS.contains(&name.as_str()) {
                errors.push(ValidationError {
                    field: "vip-routes".into(),
                    message: format!("'{name}' shadows a gateway endpoint"),
                    suggestion: Some("pick a name outside the reserved set".into()),
                });
            }
            if !seen.insert(name.as_str()) {
                errors.push(ValidationError {
                    field: "vip-routes".into(),
                    message: format!("duplicate alias name '{name}'"),
                    suggestion: None,
                });
            }
        }

        if let Err(e) = Url::parse(&self.documentation_url) {
            errors.push(ValidationError {
                field: "documentation-url".into(),
                message: format!("'{}' is not a valid URL: {e}", self.documentation_url),
                suggestion: None,
            });
        }

        for url in &self.plugin_urls {
            if Url::parse(url).is_err() {
                errors.push(ValidationError {
                    field: "plugin-urls".into(),
                    message: format!("'{url}' is not a valid URL"),
                    suggestion: None,
                });
            }
        }

        if self.session_secret.as_deref() == Some("") {
            errors.push(ValidationError {
                field: "session-secret".into(),
                message: "secret cannot be empty when set".into(),
                suggestion: None,
            });
        }

        if self.input_format.is_empty() || self.output_format.is_empty() {
            errors.push(ValidationError {
                field: "input-format/output-format".into(),
                message: "format tokens cannot be empty".into(),
                suggestion: None,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_settings() -> Settings {
        Settings {
            host: "127.0.0.1".into(),
            port: 3000,
            base_path: None,
            public_dir: PathBuf::from("public"),
            well_known_dir: PathBuf::from("well-known"),
            session_secret: None,
            documentation_url: "https://portico.readthedocs.io/en/latest".into(),
            input_format: "json".into(),
            output_format: "json".into(),
            vip_routes: vec!["human".into(), "monkey".into()],
            plugin_urls: vec![],
            max_body: 1_048_576,
        }
    }

    #[test]
    fn valid_settings_pass() {
        assert!(minimal_settings().validate().is_ok());
    }

    #[test]
    fn base_path_without_leading_slash_fails() {
        let mut settings = minimal_settings();
        settings.base_path = Some("svc".into());
        let errors = settings.validate().unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean '/svc'?")));
    }

    #[test]
    fn base_path_with_trailing_slash_fails() {
        let mut settings = minimal_settings();
        settings.base_path = Some("/svc/".into());
        let errors = settings.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("must not end")));
    }

    #[test]
    fn bare_slash_base_path_fails() {
        let mut settings = minimal_settings();
        settings.base_path = Some("/".into());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn multi_segment_base_path_passes() {
        let mut settings = minimal_settings();
        settings.base_path = Some("/atlas/viewer".into());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn duplicate_vip_name_fails() {
        let mut settings = minimal_settings();
        settings.vip_routes = vec!["human".into(), "human".into()];
        let errors = settings.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
    }

    #[test]
    fn reserved_vip_name_fails() {
        let mut settings = minimal_settings();
        settings.vip_routes = vec!["ready".into()];
        let errors = settings.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("shadows")));
    }

    #[test]
    fn vip_name_with_slash_fails() {
        let mut settings = minimal_settings();
        settings.vip_routes = vec!["a/b".into()];
        assert!(settings.validate().is_err());
    }

    #[test]
    fn invalid_documentation_url_fails() {
        let mut settings = minimal_settings();
        settings.documentation_url = "not a url".into();
        let errors = settings.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "documentation-url"));
    }

    #[test]
    fn empty_session_secret_fails() {
        let mut settings = minimal_settings();
        settings.session_secret = Some(String::new());
        assert!(settings.validate().is_err());
    }
}
