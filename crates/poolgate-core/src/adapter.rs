//! Driver adapter traits and the raw query descriptor

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{PoolLogger, Result};

/// SQL text of the liveness probe
pub const PROBE_SQL: &str = "SELECT 1";

/// A bind argument passed alongside a raw query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgValue {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit floating point
    Float64(f64),
    /// UTF-8 string
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
}

/// Declared type of a bind argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    Boolean,
    Int64,
    Float64,
    Text,
    Bytes,
}

/// A raw statement handed to a driver adapter
///
/// `args` and `arg_types` are positional and always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuery {
    pub sql: String,
    pub args: Vec<ArgValue>,
    pub arg_types: Vec<ArgType>,
}

impl RawQuery {
    /// A statement with no bind arguments
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
            arg_types: Vec::new(),
        }
    }

    /// The fixed liveness probe: `SELECT 1` with no arguments
    pub fn probe() -> Self {
        Self::new(PROBE_SQL)
    }

    /// Append a typed bind argument
    pub fn with_arg(mut self, value: ArgValue, arg_type: ArgType) -> Self {
        self.args.push(value);
        self.arg_types.push(arg_type);
        self
    }

    /// Whether this query is the liveness probe
    pub fn is_probe(&self) -> bool {
        self.sql == PROBE_SQL && self.args.is_empty() && self.arg_types.is_empty()
    }
}

/// A connected driver adapter, the low-level handle that executes raw SQL
#[async_trait]
pub trait DriverAdapter: Send + Sync {
    /// Provider name (e.g., "postgres", "sqlite")
    fn provider(&self) -> &str {
        "unknown"
    }

    /// Execute a raw statement, returning the number of affected rows
    async fn execute_raw(&self, query: &RawQuery) -> Result<u64>;

    /// Release the underlying connection
    async fn dispose(&self) -> Result<()>;
}

/// Produces connected driver adapters
#[async_trait]
pub trait AdapterFactory: Send + Sync {
    /// Provider name (e.g., "postgres", "sqlite")
    fn provider(&self) -> &str {
        "unknown"
    }

    /// Open a new adapter connection
    async fn connect(&self) -> Result<Box<dyn DriverAdapter>>;
}

#[async_trait]
impl<T: AdapterFactory + ?Sized> AdapterFactory for Arc<T> {
    fn provider(&self) -> &str {
        (**self).provider()
    }

    async fn connect(&self) -> Result<Box<dyn DriverAdapter>> {
        (**self).connect().await
    }
}

/// Constructs an adapter factory.
///
/// Must be synchronous; an error is treated as a failed connection attempt.
/// Implemented for any matching closure.
pub trait AdapterBuilder: Send + Sync {
    fn build(&self, logger: Arc<dyn PoolLogger>) -> Result<Arc<dyn AdapterFactory>>;
}

impl<F> AdapterBuilder for F
where
    F: Fn(Arc<dyn PoolLogger>) -> Result<Arc<dyn AdapterFactory>> + Send + Sync,
{
    fn build(&self, logger: Arc<dyn PoolLogger>) -> Result<Arc<dyn AdapterFactory>> {
        self(logger)
    }
}
