//! Error types for Poolgate

use thiserror::Error;

/// Core error type for pool operations
///
/// The error is `Clone` because a single initialization result is shared by
/// every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Every attempt of one retry cycle failed
    #[error("Failed to connect to {pool} after multiple attempts")]
    Exhausted { pool: String, attempts: u32 },

    /// The manager was disposed while this initialization was running
    #[error("Pool was disposed before initialization completed")]
    Disposed,

    #[error("Initialization task failed: {0}")]
    Task(String),

    #[error("{0}")]
    Other(String),
}

impl PoolError {
    /// Whether this is the terminal error of an exhausted retry cycle
    pub fn is_exhausted(&self) -> bool {
        matches!(self, PoolError::Exhausted { .. })
    }
}

/// Result type alias for pool operations
pub type Result<T> = std::result::Result<T, PoolError>;
