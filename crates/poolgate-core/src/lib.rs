//! Poolgate Core - Collaborator traits and types for the validated pool manager
//!
//! This crate defines the contracts a pool manager consumes without owning:
//!
//! - `AdapterFactory` / `DriverAdapter` - Low-level driver connections
//! - `PoolClient` - The higher-level database client handed to callers
//! - `AdapterBuilder` / `ClientBuilder` - Injected construction functions
//! - `PoolLogger` - Optional structured logger with a no-op default
//! - `PoolError` - The error type shared across the workspace

mod adapter;
mod client;
mod error;
mod logger;

pub use adapter::*;
pub use client::*;
pub use error::*;
pub use logger::*;
