//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, health), and their associated argument structs.
//! Every flag has an environment variable equivalent for container
//! deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "portico",
    version,
    about = "Static-site gateway with short-alias redirection",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        portico run                          Serve ./public on port 3000\n  \
        portico run --base-path /viewer      Also mount under /viewer\n  \
        portico health                       Probe a running instance\n\n  \
        Docs: https://github.com/portico-gateway/portico"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway
    Run(Box<RunArgs>),

    /// Check readiness of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        portico run                                        Serve ./public\n  \
        portico run -p 8080 --public-dir dist --pretty     Local dev mode\n  \
        portico run --base-path /viewer                    Behind a non-stripping proxy\n  \
        portico run --vip-routes human,monkey              Override reserved aliases")]
pub struct RunArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Mount prefix (for reverse proxies that do not strip the path)
    #[arg(long, env = "HOST_PATHNAME")]
    pub base_path: Option<String>,

    /// Directory of public assets served at the root
    #[arg(long, env = "PATH_TO_PUBLIC", default_value = "public")]
    pub public_dir: PathBuf,

    /// Directory served under /.well-known
    #[arg(long, env = "WELL_KNOWN_DIR", default_value = "well-known")]
    pub well_known_dir: PathBuf,

    /// Session signing secret (consumed by the user collaborator)
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// Documentation URL advertised by /about
    #[arg(
        long,
        env = "DOCUMENTATION_URL",
        default_value = "https://portico.readthedocs.io/en/latest"
    )]
    pub documentation_url: String,

    /// Input format token advertised by /about
    #[arg(long, env = "INPUT_FORMAT", default_value = "json")]
    pub input_format: String,

    /// Output format token advertised by /about
    #[arg(long, env = "OUTPUT_FORMAT", default_value = "json")]
    pub output_format: String,

    /// Comma-separated reserved top-level aliases (default: built-in list)
    #[arg(long, env = "VIP_ROUTES", value_delimiter = ',')]
    pub vip_routes: Option<Vec<String>>,

    /// Comma-separated plugin manifest URLs advertised by /plugins
    #[arg(long, env = "PLUGIN_URLS", value_delimiter = ',')]
    pub plugin_urls: Vec<String>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Output the /about descriptor as raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}
