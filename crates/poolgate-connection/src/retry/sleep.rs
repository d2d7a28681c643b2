//! Sleeping between attempts

use std::time::Duration;

use async_trait::async_trait;

/// Waits out a backoff delay.
///
/// The pool calls this exactly once after every failed attempt, including the
/// last one of a cycle.
#[async_trait]
pub trait Sleeper: Send + Sync + 'static {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}
