//! `portico run` — start the gateway.
//!
//! Validates settings fail-fast, assembles the alias registry from its
//! sources, builds the (optionally dual-mounted) router, flips the
//! readiness gate once wiring is complete, and serves with graceful
//! shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::alias::registry::{AliasRegistry, AliasSource, FileSource, VipSource};
use crate::cli::RunArgs;
use crate::config::Settings;
use crate::error::PorticoError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), PorticoError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let settings = Settings::from_args(&args);
    settings
        .validate()
        .map_err(|errors| PorticoError::SettingsValidation { errors })?;

    let sources: Vec<Box<dyn AliasSource>> = vec![
        Box::new(VipSource::new(settings.vip_routes.clone())),
        Box::new(FileSource::new(settings.public_dir.join("aliases.json"))),
    ];
    let registry = AliasRegistry::from_sources(&sources).await?;

    let state = Arc::new(AppState::new(settings, registry));
    let app = server::build_app(state.clone());

    let addr: SocketAddr =
        format!("{}:{}", state.settings.host, state.settings.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    if let Some(base) = state.settings.base_path.as_deref() {
        tracing::info!(base_path = base, "listening on path, also falls back to root");
    }

    // Route registration is complete; the probe may now answer 204.
    state.mark_ready();

    tracing::info!(
        addr = %addr,
        vip_routes = state.settings.vip_routes.len(),
        aliases = state.aliases.len(),
        "portico started"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("portico stopped");
    Ok(())
}
