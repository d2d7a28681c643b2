//! Validated, single-flight client pool
//!
//! `PoolManager` lazily builds one database client, validating the driver
//! adapter and the client with a liveness probe before handing it out.
//! Concurrent callers share a single initialization and receive the same
//! `Arc` to the same client.
//!
//! # Example
//!
//! ```ignore
//! use poolgate_connection::{PoolConfig, PoolManager};
//!
//! let pool = PoolManager::builder(
//!     |adapter, logger| MyClient::new(adapter, logger),
//!     |logger| Ok(Arc::new(MyAdapterFactory::from_env(logger)?) as Arc<dyn AdapterFactory>),
//! )
//! .config(PoolConfig::new("orders"))
//! .build()?;
//!
//! let client = pool.get_pool(None).await?;
//! // Use client...
//! pool.dispose(None).await;
//! ```

mod manager;
mod protocol;


pub use manager::{PoolManager, PoolManagerBuilder};
