//! Backoff calculator for pool initialization retries
//!
//! Delays are deterministic: no jitter is applied, so a failed retry cycle
//! always waits the same total time.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Growth curve of the delay between attempts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackoffCurve {
    /// `base * attempt^2`
    Quadratic,
    /// `base * multiplier^(attempt - 1)`
    Exponential { multiplier: f64 },
}

/// Backoff strategy for initialization retries.
///
/// Attempts are counted from 1: the delay after the first failed attempt
/// is `delay(1)`.
///
/// # Example
///
/// ```
/// use poolgate_connection::retry::BackoffStrategy;
/// use std::time::Duration;
///
/// let backoff = BackoffStrategy::exponential(100, 2.0).with_max_ms(1_000);
///
/// assert_eq!(backoff.delay(1), Duration::from_millis(100));
/// assert_eq!(backoff.delay(2), Duration::from_millis(200));
/// assert_eq!(backoff.delay(10), Duration::from_millis(1_000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffStrategy {
    /// Delay unit in milliseconds
    base_ms: u64,
    /// How the delay grows with the attempt number
    curve: BackoffCurve,
    /// Optional cap in milliseconds
    max_ms: Option<u64>,
}

impl BackoffStrategy {
    /// Quadratic backoff: `base_ms * attempt^2`, uncapped.
    pub fn quadratic(base_ms: u64) -> Self {
        Self {
            base_ms,
            curve: BackoffCurve::Quadratic,
            max_ms: None,
        }
    }

    /// Exponential backoff: `base_ms * multiplier^(attempt - 1)`, uncapped.
    ///
    /// Multipliers below 1.0 are raised to 1.0.
    pub fn exponential(base_ms: u64, multiplier: f64) -> Self {
        Self {
            base_ms,
            curve: BackoffCurve::Exponential {
                multiplier: multiplier.max(1.0),
            },
            max_ms: None,
        }
    }

    /// Cap every delay at `max_ms`.
    pub fn with_max_ms(mut self, max_ms: u64) -> Self {
        self.max_ms = Some(max_ms);
        self
    }

    /// Calculate the delay to wait after the given failed attempt.
    ///
    /// Attempt 0 is treated as attempt 1.
    pub fn delay(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);

        let delay_ms = match &self.curve {
            BackoffCurve::Quadratic => {
                let squared = u64::from(attempt).saturating_mul(u64::from(attempt));
                self.base_ms.saturating_mul(squared)
            }
            BackoffCurve::Exponential { multiplier } => {
                let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
                let scaled = (self.base_ms as f64) * multiplier.powi(exponent);
                if scaled >= u64::MAX as f64 {
                    u64::MAX
                } else {
                    scaled as u64
                }
            }
        };

        let capped_ms = match self.max_ms {
            Some(max_ms) => delay_ms.min(max_ms),
            None => delay_ms,
        };

        Duration::from_millis(capped_ms)
    }

    /// Total time spent sleeping over a full cycle of `attempts` failures
    pub fn total_delay(&self, attempts: u32) -> Duration {
        (1..=attempts).map(|attempt| self.delay(attempt)).sum()
    }

    /// Get the delay unit.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_ms)
    }

    /// Get the growth curve.
    pub fn curve(&self) -> &BackoffCurve {
        &self.curve
    }

    /// Get the cap if one is set.
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_ms.map(Duration::from_millis)
    }
}

impl Default for BackoffStrategy {
    /// Default backoff: 1000ms * attempt^2, no cap
    fn default() -> Self {
        Self::quadratic(1000)
    }
}
