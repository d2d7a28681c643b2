//! Liveness probes
//!
//! Both probes run the fixed `SELECT 1` statement and report the round-trip
//! time. They never retry; the pool's retry loop handles failures.

use std::time::{Duration, Instant};

use poolgate_core::{DriverAdapter, PROBE_SQL, PoolClient, RawQuery, Result};

/// Probe a connected driver adapter.
///
/// Executes `SELECT 1` with no arguments and returns the round-trip time.
///
/// ```ignore
/// let latency = probe_adapter(adapter.as_ref()).await?;
/// tracing::debug!(latency_ms = latency.as_millis() as u64, "adapter is alive");
/// ```
pub async fn probe_adapter(adapter: &dyn DriverAdapter) -> Result<Duration> {
    let start = Instant::now();
    adapter.execute_raw(&RawQuery::probe()).await?;
    Ok(start.elapsed())
}

/// Probe a constructed client through its raw-execute capability.
pub async fn probe_client<C: PoolClient + ?Sized>(client: &C) -> Result<Duration> {
    let start = Instant::now();
    client.execute_raw(PROBE_SQL).await?;
    Ok(start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use poolgate_core::PoolError;

    #[derive(Default)]
    struct RecordingAdapter {
        seen: Mutex<Vec<RawQuery>>,
        fail: bool,
    }

    #[async_trait]
    impl DriverAdapter for RecordingAdapter {
        async fn execute_raw(&self, query: &RawQuery) -> Result<u64> {
            self.seen.lock().push(query.clone());
            if self.fail {
                Err(PoolError::Connection("socket closed".into()))
            } else {
                Ok(0)
            }
        }

        async fn dispose(&self) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingClient {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PoolClient for RecordingClient {
        async fn execute_raw(&self, sql: &str) -> Result<u64> {
            self.seen.lock().push(sql.to_string());
            Ok(1)
        }

        async fn disconnect(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_probe_adapter_sends_fixed_query() {
        let adapter = RecordingAdapter::default();
        probe_adapter(&adapter).await.expect("probe");

        let seen = adapter.seen.lock();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_probe());
    }

    #[tokio::test]
    async fn test_probe_adapter_propagates_failure() {
        let adapter = RecordingAdapter {
            fail: true,
            ..Default::default()
        };
        let err = probe_adapter(&adapter).await.unwrap_err();
        assert_eq!(err, PoolError::Connection("socket closed".into()));
    }

    #[tokio::test]
    async fn test_probe_client_sends_select_one() {
        let client = RecordingClient::default();
        probe_client(&client).await.expect("probe");
        assert_eq!(*client.seen.lock(), vec!["SELECT 1".to_string()]);
    }
}
