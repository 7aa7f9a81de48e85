//! Portico is a static-site gateway with short-alias redirection.
//!
//! It fronts a single-page application: static assets are served from a
//! public directory, reserved top-level names ("VIP routes") and
//! prefixed short aliases (`/go/<alias>`) redirect to canonical viewer
//! destinations, deprecated path shapes are rewritten for legacy
//! clients, and every response carries a build version header. The
//! whole tree can additionally be mounted under a base path for
//! deployments behind a reverse proxy that does not strip prefixes.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`config`] -- Settings assembly from flags/env and fail-fast
//!   validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`alias`] -- The alias registry, its sources, and both redirect
//!   dispatchers.
//! - [`compat`] -- Backward-compatibility rewrites for deprecated path
//!   shapes.
//! - [`health`] -- `GET /ready` readiness probe.
//! - [`about`] -- `GET /about` service descriptor with its lazy
//!   metadata cache.
//! - [`quickstart`], [`peek`], [`plugins`], [`user`] -- collaborator
//!   boundaries on the route table.
//! - [`logging`] -- Structured tracing setup and the access-log
//!   middleware.
//! - [`server`] -- Axum router composition, shared application state,
//!   base-path mounting, and graceful shutdown.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod about;
pub mod alias;
pub mod cli;
pub mod cmd;
pub mod compat;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod peek;
pub mod plugins;
pub mod quickstart;
pub mod server;
pub mod user;
