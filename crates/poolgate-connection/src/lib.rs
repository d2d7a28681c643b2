//! Poolgate Connection - Validated, single-flight client pool management
//!
//! This crate owns the lifecycle of one database client: it builds the
//! driver adapter, probes it, builds the client, probes that too, and retries
//! the whole sequence with backoff until it succeeds or runs out of attempts.

mod config;
mod events;
pub mod logging;
pub mod pool;
pub mod probe;
pub mod retry;

pub use config::PoolConfig;
pub use events::PoolEvent;
pub use pool::{PoolManager, PoolManagerBuilder};
pub use probe::{probe_adapter, probe_client};
pub use retry::{BackoffCurve, BackoffStrategy, Sleeper, TokioSleeper};

pub use poolgate_core::{
    AdapterBuilder, AdapterFactory, ClientBuilder, DriverAdapter, NoopLogger, PoolClient,
    PoolError, PoolLogger, RawQuery, Result, TracingLogger,
};
