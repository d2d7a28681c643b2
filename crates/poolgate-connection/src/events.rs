//! Lifecycle events broadcast by the pool manager

use std::time::Duration;

/// Pool lifecycle event for monitoring
#[derive(Debug, Clone, PartialEq)]
pub enum PoolEvent {
    /// An initialization attempt is starting
    Attempting { attempt: u32, max_attempts: u32 },
    /// An attempt failed and the pool will wait `delay` before continuing
    Failed {
        attempt: u32,
        error: String,
        delay: Duration,
    },
    /// A validated client is ready
    Ready { attempts_taken: u32 },
    /// All attempts of the cycle failed
    Exhausted { total_attempts: u32 },
    /// The cached client was torn down
    Disposed,
}

impl PoolEvent {
    /// Whether this event ends an initialization cycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, PoolEvent::Ready { .. } | PoolEvent::Exhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events() {
        assert!(PoolEvent::Ready { attempts_taken: 1 }.is_terminal());
        assert!(PoolEvent::Exhausted { total_attempts: 10 }.is_terminal());
        assert!(!PoolEvent::Disposed.is_terminal());
        assert!(
            !PoolEvent::Attempting {
                attempt: 1,
                max_attempts: 10
            }
            .is_terminal()
        );
    }

    #[test]
    fn test_failed_event_debug() {
        let event = PoolEvent::Failed {
            attempt: 2,
            error: "Connection refused".into(),
            delay: Duration::from_secs(4),
        };
        let debug = format!("{:?}", event);
        assert!(debug.contains("Failed"));
        assert!(debug.contains("Connection refused"));
    }
}
