//! bookbuddy-feedback - Feedback intake service
//!
//! Startup sequence:
//! 1. Parse command line (flags fall back to `BOOKBUDDY_*` env vars)
//! 2. Load the optional TOML bootstrap file
//! 3. Initialize tracing
//! 4. Validate the `BOOKBUDDY_*` environment; any error aborts startup
//! 5. Convert typed flags (port), initialize the feedback store and serve
//!    HTTP until Ctrl+C / SIGTERM
//!
//! Flags that mirror gated variables are parsed as plain strings so a bad
//! value is reported by the environment check alongside every other failure.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bookbuddy_common::auth::SharedSecretAuthorizer;
use bookbuddy_common::config::{load_bootstrap, ServerSettings, SettingsOverrides};
use bookbuddy_common::env_check::{env_source_with_prefix, server_env_spec, validate, SERVER_ENV_PREFIX};
use bookbuddy_common::FeedbackStore;
use bookbuddy_feedback::{build_router, AppState, FeedbackIntake};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for bookbuddy-feedback
#[derive(Parser, Debug)]
#[command(name = "bookbuddy-feedback")]
#[command(about = "Feedback intake service for BookBuddy")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, env = "BOOKBUDDY_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "BOOKBUDDY_PORT")]
    port: Option<String>,

    /// Directory holding feedback.json
    #[arg(short, long, env = "BOOKBUDDY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// TOML bootstrap file
    #[arg(short, long, env = "BOOKBUDDY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml = load_bootstrap(args.config.as_deref())?;
    let log_level = toml
        .as_ref()
        .map(|t| t.logging.level.clone())
        .unwrap_or_else(|| "info".to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "bookbuddy_feedback={lvl},bookbuddy_common={lvl},tower_http={lvl}",
                lvl = log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting BookBuddy Feedback (bookbuddy-feedback) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Pre-flight gate: nothing below runs with a broken environment
    let report = validate(&server_env_spec(), &env_source_with_prefix(SERVER_ENV_PREFIX));
    report.log();
    report.into_result()?;
    info!("✓ Environment validated");

    let port = args.port.as_deref().map(parse_port).transpose()?;

    let admin_key = std::env::var("BOOKBUDDY_ADMIN_KEY").context("BOOKBUDDY_ADMIN_KEY not readable")?;
    let settings = ServerSettings::resolve(
        SettingsOverrides {
            host: args.host,
            port,
            data_dir: args.data_dir,
        },
        toml,
        admin_key,
    );
    info!("Settings: {:?}", settings);

    let store = Arc::new(FeedbackStore::in_dir(&settings.data_dir));
    store
        .ensure_initialized()
        .await
        .context("Failed to initialize feedback store")?;
    info!("✓ Feedback store ready: {}", store.path().display());

    let authorizer = Arc::new(SharedSecretAuthorizer::new(settings.admin_key.clone()));
    let state = AppState::new(FeedbackIntake::new(store, authorizer));
    let app = build_router(state);

    let bind_addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!("bookbuddy-feedback listening on http://{}", bind_addr);
    info!("Health check: http://{}/api/health", bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .with_context(|| format!("BOOKBUDDY_PORT must be a port number (0-65535), got {:?}", raw))
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
