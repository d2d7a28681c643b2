//! Client trait and client construction

use std::sync::Arc;

use async_trait::async_trait;

use crate::{AdapterFactory, PoolLogger, Result};

/// The database client a pool manager validates and hands out
#[async_trait]
pub trait PoolClient: Send + Sync + 'static {
    /// Execute a raw statement with no bind parameters
    async fn execute_raw(&self, sql: &str) -> Result<u64>;

    /// Disconnect the client and release its adapter
    async fn disconnect(&self) -> Result<()>;
}

#[async_trait]
impl<T: PoolClient + ?Sized> PoolClient for Arc<T> {
    async fn execute_raw(&self, sql: &str) -> Result<u64> {
        (**self).execute_raw(sql).await
    }

    async fn disconnect(&self) -> Result<()> {
        (**self).disconnect().await
    }
}

/// Constructs a client on top of an adapter factory.
///
/// Must be synchronous and free of side effects beyond building the client;
/// an error is treated as a failed connection attempt. Implemented for any
/// matching closure.
pub trait ClientBuilder<C>: Send + Sync {
    fn build(&self, adapter: Arc<dyn AdapterFactory>, logger: Arc<dyn PoolLogger>) -> Result<C>;
}

impl<C, F> ClientBuilder<C> for F
where
    F: Fn(Arc<dyn AdapterFactory>, Arc<dyn PoolLogger>) -> Result<C> + Send + Sync,
{
    fn build(&self, adapter: Arc<dyn AdapterFactory>, logger: Arc<dyn PoolLogger>) -> Result<C> {
        self(adapter, logger)
    }
}
