//! Database connectivity flag.
//!
//! The service never talks to the database. It only checks, once at
//! startup, whether the first host of `MONGODB_URI` accepts TCP connections
//! and reports the outcome on `/health`.

use crate::error::{BackendError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::RwLock;

pub const DEFAULT_MONGO_PORT: u16 = 27017;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbStatus {
    NotConfigured,
    Connecting,
    Connected,
    Error,
}

impl DbStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotConfigured => "not-configured",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }
}

/// Shared status written by the connection attempt and read by handlers.
#[derive(Debug, Clone)]
pub struct DbStatusCell(Arc<RwLock<DbStatus>>);

impl DbStatusCell {
    #[must_use]
    pub fn new(initial: DbStatus) -> Self {
        Self(Arc::new(RwLock::new(initial)))
    }

    pub async fn get(&self) -> DbStatus {
        *self.0.read().await
    }

    pub async fn set(&self, status: DbStatus) {
        *self.0.write().await = status;
    }
}

/// Host and port of the first server in a `mongodb://` URI.
///
/// # Errors
///
/// Returns [`BackendError::InvalidDatabaseUri`] for other schemes (including
/// `mongodb+srv://`, which needs a DNS SRV lookup), an empty host list or a
/// non-numeric port.
pub fn first_host(uri: &str) -> Result<(String, u16)> {
    let invalid = |why: &str| BackendError::InvalidDatabaseUri(why.to_string());

    if uri.starts_with("mongodb+srv://") {
        return Err(invalid("mongodb+srv URIs are not supported"));
    }
    let rest = uri
        .strip_prefix("mongodb://")
        .ok_or_else(|| invalid("expected mongodb:// scheme"))?;

    let authority = rest.split(['/', '?']).next().unwrap_or_default();
    let hosts = authority.rsplit_once('@').map_or(authority, |(_, hosts)| hosts);
    let host = hosts.split(',').next().unwrap_or_default().trim();
    if host.is_empty() {
        return Err(invalid("missing host"));
    }

    let (name, port) = if let Some(bracketed) = host.strip_prefix('[') {
        let (name, tail) = bracketed
            .split_once(']')
            .ok_or_else(|| invalid("unterminated IPv6 literal"))?;
        (name, tail.strip_prefix(':'))
    } else {
        match host.rsplit_once(':') {
            Some((name, port)) => (name, Some(port)),
            None => (host, None),
        }
    };

    let port = match port {
        Some(raw) => raw.parse::<u16>().map_err(|_| invalid("invalid port"))?,
        None => DEFAULT_MONGO_PORT,
    };

    Ok((name.to_string(), port))
}

/// Resolves the URI and tries one TCP connection within `timeout`.
pub async fn probe(uri: &str, timeout: Duration) -> Result<()> {
    let (host, port) = first_host(uri)?;
    match tokio::time::timeout(timeout, TcpStream::connect((host.as_str(), port))).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(e)) => Err(BackendError::Io(e)),
        Err(_) => Err(BackendError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("no connection to {host}:{port} within {timeout:?}"),
        ))),
    }
}

/// Initial status for the configured URI; starts the probe when there is one.
pub fn spawn_connectivity_check(uri: Option<String>, timeout: Duration) -> DbStatusCell {
    let Some(uri) = uri else {
        return DbStatusCell::new(DbStatus::NotConfigured);
    };

    let cell = DbStatusCell::new(DbStatus::Connecting);
    let task_cell = cell.clone();
    tokio::spawn(async move {
        let status = match probe(&uri, timeout).await {
            Ok(()) => {
                tracing::info!("database reachable");
                DbStatus::Connected
            }
            Err(e) => {
                tracing::error!(error = %e, "database connection failed");
                DbStatus::Error
            }
        };
        task_cell.set(status).await;
    });
    cell
}
