use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid database URI: {0}")]
    InvalidDatabaseUri(String),

    #[error("Invalid Sentry DSN: {0}")]
    InvalidSentryDsn(#[from] sentry::types::ParseDsnError),
}

pub type Result<T> = std::result::Result<T, BackendError>;
