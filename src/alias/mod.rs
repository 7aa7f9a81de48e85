//! Short-alias resolution and redirect dispatch.
//!
//! Two dispatchers share the [`AliasRegistry`](registry::AliasRegistry):
//!
//! - the VIP dispatcher answers reserved top-level names (`GET /human`)
//!   with a temporary redirect into the prefixed alias router
//!   (`{base_path}/go/human`);
//! - the alias router, mounted under `/go`, `/saneUrl` and `/saneurl`,
//!   resolves a name against the registry and redirects to its stored
//!   destination.
//!
//! Non-VIP top-level paths never reach this module's handlers — they
//! fall through to the static catch-all.

pub mod registry;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use serde_json::json;

use crate::config::Settings;
use crate::server::AppState;

/// Add one route per reserved top-level name. Handlers are produced by
/// [`vip_route`], which takes the redirect target by value — each
/// closure owns its own target instead of reading a shared loop
/// variable at call time.
pub fn register_vip_routes(
    router: Router<Arc<AppState>>,
    settings: &Settings,
) -> Router<Arc<AppState>> {
    let base = settings.base_path.as_deref().unwrap_or("");
    let mut router = router;
    for name in &settings.vip_routes {
        let target = format!("{base}/go/{name}");
        router = router.route(&format!("/{name}"), vip_route(target));
    }
    router
}

/// One handler per VIP name, bound to its target at registration time.
/// A temporary redirect is deliberate: the destination behind an alias
/// may change between deployments.
fn vip_route(target: String) -> MethodRouter<Arc<AppState>> {
    get(move || async move { Redirect::temporary(&target) })
}

/// The prefixed alias router. Mounting it under several prefixes is
/// idempotent: every mount resolves against the single registry held in
/// [`AppState`].
pub fn alias_router() -> Router<Arc<AppState>> {
    Router::new().route("/{alias}", get(resolve_handler))
}

/// Inside the alias mount, a miss is terminal: `/go/<unknown>` has no
/// other meaning, unlike a bare top-level path.
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Path(alias): Path<String>,
) -> Response {
    match state.aliases.resolve(&alias) {
        Some(destination) => Redirect::temporary(destination).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown alias '{alias}'") })),
        )
            .into_response(),
    }
}
