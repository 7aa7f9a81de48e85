//! Backward-compatibility rewrites for deprecated path shapes.
//!
//! [`rewrite_legacy`] runs before route dispatch on every inbound
//! request. Each rule in [`RULES`] carries its policy, fixed at
//! registration time: [`Policy::Rewrite`] translates the path in place
//! so legacy clients transparently reach the renamed resource, while
//! [`Policy::Redirect`] answers with a permanent redirect so callers
//! learn the new shape. Unmatched paths pass through untouched; this
//! middleware never fails a request.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::uri::{PathAndQuery, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::server::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Translate the path in place, invisible to the client.
    Rewrite,
    /// Answer 308 so the client updates its links.
    Redirect,
}

#[derive(Debug)]
pub struct CompatRule {
    pub legacy_prefix: &'static str,
    pub canonical_prefix: &'static str,
    pub policy: Policy,
}

/// Renamed collaborator prefixes from earlier releases.
pub const RULES: &[CompatRule] = &[
    CompatRule {
        legacy_prefix: "/plugin",
        canonical_prefix: "/plugins",
        policy: Policy::Rewrite,
    },
    CompatRule {
        legacy_prefix: "/preview",
        canonical_prefix: "/peek",
        policy: Policy::Redirect,
    },
];

pub async fn rewrite_legacy(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let base = state.settings.base_path.as_deref().unwrap_or("");
    let path = req.uri().path();

    // The request may arrive through either mount; match rules against
    // the path with the mount prefix stripped.
    let (mount, local) = match strip_segment_prefix(path, base) {
        Some(rest) if !base.is_empty() && !rest.is_empty() => (base, rest),
        _ => ("", path),
    };

    if let Some((rule, canonical_local)) = apply_rules(local) {
        let query = req.uri().query();
        match rule.policy {
            Policy::Redirect => {
                // Redirect targets always carry the base path; with the
                // dual mount they resolve from either access path.
                let target = match query {
                    Some(q) => format!("{base}{canonical_local}?{q}"),
                    None => format!("{base}{canonical_local}"),
                };
                tracing::debug!(from = %path, to = %target, "legacy path redirected");
                return Redirect::permanent(&target).into_response();
            }
            Policy::Rewrite => {
                let rewritten = match query {
                    Some(q) => format!("{mount}{canonical_local}?{q}"),
                    None => format!("{mount}{canonical_local}"),
                };
                if let Some(uri) = replace_path_and_query(req.uri(), &rewritten) {
                    tracing::debug!(from = %path, to = %rewritten, "legacy path rewritten");
                    *req.uri_mut() = uri;
                }
            }
        }
    }

    next.run(req).await
}

/// Match the first rule whose legacy prefix covers `path` on a segment
/// boundary and return the translated path.
fn apply_rules(path: &str) -> Option<(&'static CompatRule, String)> {
    for rule in RULES {
        if let Some(rest) = strip_segment_prefix(path, rule.legacy_prefix) {
            return Some((rule, format!("{}{rest}", rule.canonical_prefix)));
        }
    }
    None
}

/// Strip `prefix` from `path` only when the match ends on a segment
/// boundary, so `/plugin` covers `/plugin/x` but not `/plugins`.
fn strip_segment_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

fn replace_path_and_query(uri: &Uri, path_and_query: &str) -> Option<Uri> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_plugin_prefix_is_translated() {
        let (rule, path) = apply_rules("/plugin/manifests").unwrap();
        assert_eq!(rule.policy, Policy::Rewrite);
        assert_eq!(path, "/plugins/manifests");
    }

    #[test]
    fn bare_legacy_prefix_is_translated() {
        let (_, path) = apply_rules("/plugin").unwrap();
        assert_eq!(path, "/plugins");
    }

    #[test]
    fn canonical_prefix_is_not_rewritten() {
        // "/plugins" starts with "/plugin" but not on a segment boundary
        assert!(apply_rules("/plugins").is_none());
        assert!(apply_rules("/plugins/manifests").is_none());
    }

    #[test]
    fn unrelated_prefix_passes_through() {
        assert!(apply_rules("/pluginstore").is_none());
        assert!(apply_rules("/go/human").is_none());
        assert!(apply_rules("/").is_none());
    }

    #[test]
    fn preview_rule_is_a_visible_redirect() {
        let (rule, path) = apply_rules("/preview/human").unwrap();
        assert_eq!(rule.policy, Policy::Redirect);
        assert_eq!(path, "/peek/human");
    }

    #[test]
    fn segment_prefix_stripping() {
        assert_eq!(strip_segment_prefix("/plugin/x", "/plugin"), Some("/x"));
        assert_eq!(strip_segment_prefix("/plugin", "/plugin"), Some(""));
        assert_eq!(strip_segment_prefix("/plugins", "/plugin"), None);
        assert_eq!(strip_segment_prefix("/viewer/x", "/viewer"), Some("/x"));
    }

    #[test]
    fn uri_rewrite_preserves_query() {
        let uri: Uri = "/plugin/x?a=1".parse().unwrap();
        let rewritten = replace_path_and_query(&uri, "/plugins/x?a=1").unwrap();
        assert_eq!(rewritten.path(), "/plugins/x");
        assert_eq!(rewritten.query(), Some("a=1"));
    }
}
