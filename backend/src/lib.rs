//! Health-check service that accompanies the taskboard plugin.
//!
//! Serves `GET /` and `GET /health`, optionally reporting whether the
//! configured MongoDB host is reachable.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod state;

pub use config::{LogFormat, ServerConfig};
pub use db::{DbStatus, DbStatusCell};
pub use error::{BackendError, Result};
pub use http::{build_router, HealthResponse};
pub use state::AppState;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the `fmt` subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    let _ = match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
}

/// Wires state from the configuration. Must run inside a tokio runtime.
#[must_use]
pub fn app_state(config: &ServerConfig) -> AppState {
    let db = db::spawn_connectivity_check(config.mongodb_uri.clone(), db::CONNECT_TIMEOUT);
    AppState::new(db, config.sentry_dsn.is_some())
}

/// Binds the Sentry client for `dsn` to the process hub. Events are flushed
/// when the returned guard drops.
///
/// # Errors
///
/// Fails if `dsn` is not a valid Sentry DSN.
pub fn init_error_reporting(dsn: &str) -> Result<sentry::ClientInitGuard> {
    let dsn: sentry::types::Dsn = dsn.trim().parse()?;
    tracing::info!(host = %dsn.host(), "error reporting enabled");
    Ok(sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        ..Default::default()
    }))
}

/// Binds, serves until Ctrl-C or SIGTERM, then drains.
///
/// # Errors
///
/// Fails if the Sentry DSN is invalid, the address cannot be bound or the
/// server stops with an I/O error.
pub async fn run(config: ServerConfig) -> Result<()> {
    let _sentry = config
        .sentry_dsn
        .as_deref()
        .map(init_error_reporting)
        .transpose()?;
    let state = app_state(&config);
    let app = build_router(state);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("shutdown signal received");
}
