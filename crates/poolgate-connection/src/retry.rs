//! Retry timing for pool initialization
//!
//! This module provides the backoff curve applied between failed connection
//! attempts and the sleeper that waits it out.
//!
//! # Example
//!
//! ```
//! use poolgate_connection::retry::BackoffStrategy;
//! use std::time::Duration;
//!
//! // 1000ms * attempt^2
//! let backoff = BackoffStrategy::quadratic(1000);
//! assert_eq!(backoff.delay(1), Duration::from_millis(1000));
//! assert_eq!(backoff.delay(3), Duration::from_millis(9000));
//! ```

mod backoff;
mod sleep;


pub use backoff::{BackoffCurve, BackoffStrategy};
pub use sleep::{Sleeper, TokioSleeper};
