//! Optional structured logger handed to the pool and its builders

use std::sync::Arc;

/// Logger capability with the usual level methods.
///
/// Callers that do not supply one get [`NoopLogger`], so nothing downstream
/// needs to branch on whether a logger is present.
pub trait PoolLogger: Send + Sync {
    fn log(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Logger that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl PoolLogger for NoopLogger {
    fn log(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
}

/// Logger that forwards to `tracing` under the `poolgate` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl PoolLogger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "poolgate", "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "poolgate", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "poolgate", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "poolgate", "{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "poolgate", "{message}");
    }
}

/// Shared no-op logger
pub fn noop_logger() -> Arc<dyn PoolLogger> {
    Arc::new(NoopLogger)
}

/// Resolve an optional logger, substituting the no-op logger when absent
pub fn logger_or_noop(logger: Option<Arc<dyn PoolLogger>>) -> Arc<dyn PoolLogger> {
    logger.unwrap_or_else(noop_logger)
}
