use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Persistence failures surfaced to the dispatcher. Individual operations
/// are never retried; the startup probe is the only retry loop anywhere.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database unavailable: {0}")]
    Unavailable(String),
    #[error("database operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote connect failed: {0}")]
    Connect(String),
    #[error("remote authentication failed: {0}")]
    Auth(String),
    #[error("remote execution failed: {0}")]
    Exec(String),
}
