//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding settings, the
//! alias registry, the readiness gate, and the metadata cache),
//! [`build_router`] for the canonical route tree, [`build_app`] for the
//! optional base-path mounting with root fallback, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use tokio::sync::OnceCell;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::about::{self, CodeMeta};
use crate::alias::{self, registry::AliasRegistry};
use crate::compat;
use crate::config::Settings;
use crate::health;
use crate::logging;
use crate::peek;
use crate::plugins;
use crate::quickstart;
use crate::user;

/// Version token attached to every response, resolved at compile time.
pub const VERSION_TOKEN: &str =
    concat!(env!("CARGO_PKG_VERSION"), "+", env!("PORTICO_GIT_SHORT"));

pub struct AppState {
    pub settings: Settings,
    pub aliases: AliasRegistry,
    /// One-shot readiness gate: false during startup wiring, flipped by
    /// [`AppState::mark_ready`], never reset.
    pub ready: AtomicBool,
    pub metadata: OnceCell<CodeMeta>,
}

impl AppState {
    #[must_use]
    pub fn new(settings: Settings, aliases: AliasRegistry) -> Self {
        Self {
            settings,
            aliases,
            ready: AtomicBool::new(false),
            metadata: OnceCell::new(),
        }
    }

    /// Monotonic flip; there is deliberately no way to unset it.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Relaxed);
    }
}

/// The canonical route tree: gateway endpoints, VIP aliases, the alias
/// router under its three prefixes, collaborator mounts, and static
/// serving as the catch-all fallback.
pub fn build_router(state: Arc<AppState>) -> Router {
    let aliases = alias::alias_router();

    let router = Router::new()
        .route("/ready", get(health::ready_handler))
        .route("/about", get(about::about_handler))
        .route("/quickstart", get(quickstart::list_templates))
        .route("/plugins", get(plugins::list_plugins))
        .route("/user", get(user::me_handler));

    // VIP routes are explicit axum routes, so they win over the static
    // fallback; unknown top-level names fall through to it.
    let router = alias::register_vip_routes(router, &state.settings);

    router
        .nest("/go", aliases.clone())
        .nest("/saneUrl", aliases.clone())
        .nest("/saneurl", aliases)
        .nest("/quickstart", quickstart::router())
        .nest("/peek", peek::router())
        .nest_service(
            "/.well-known",
            ServeDir::new(&state.settings.well_known_dir),
        )
        .fallback_service(ServeDir::new(&state.settings.public_dir))
        .with_state(state)
}

/// Expose the tree under the base path and at the root simultaneously.
/// Both mounts are thin wrappers over the same tree; the registry,
/// readiness gate, and metadata cache live in the one shared
/// [`AppState`], so behavior is identical through either access path.
pub fn mount_with_base_path(tree: Router, base: &str) -> Router {
    Router::new().nest(base, tree.clone()).merge(tree)
}

/// The finished application: canonical tree, optional dual mount, and
/// the outer layer stack (version header outermost so every response
/// carries it, access log, bare-base redirect, legacy rewrites, body
/// limit).
pub fn build_app(state: Arc<AppState>) -> Router {
    let tree = build_router(state.clone());

    let app = match state.settings.base_path.as_deref() {
        Some(base) => mount_with_base_path(tree, base),
        None => tree,
    };

    app.layer(
        ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(
                HeaderName::from_static("x-portico-version"),
                HeaderValue::from_static(VERSION_TOKEN),
            ))
            .layer(middleware::from_fn(logging::access_log))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                redirect_bare_base_path,
            ))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                compat::rewrite_legacy,
            ))
            .layer(RequestBodyLimitLayer::new(state.settings.max_body)),
    )
}

/// A request for exactly the base path would otherwise fall through to
/// the static handler; send the client to the mounted root instead.
async fn redirect_bare_base_path(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(base) = state.settings.base_path.as_deref() {
        if req.uri().path() == base {
            return Redirect::temporary(&format!("{base}/")).into_response();
        }
    }
    next.run(req).await
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
