//! Reconnect policy for the live update channel

use crate::consts::dashboard_consts::hub;
use std::time::Duration;

/// Fixed-interval reconnect policy.
///
/// The default retries forever, five seconds apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay between consecutive failed attempts
    pub interval: Duration,
    /// Stop after this many consecutive failures, if set
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            interval: hub::reconnect_interval(),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    pub fn new(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Whether another attempt is allowed after `failed_attempts` consecutive failures.
    pub fn should_retry(&self, failed_attempts: u32) -> bool {
        match self.max_attempts {
            Some(max) => failed_attempts < max,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retries_forever() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.interval, Duration::from_millis(5000));
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(u32::MAX));
    }

    #[test]
    fn test_bounded_attempts() {
        let policy = ReconnectPolicy::new(Duration::from_secs(1), Some(3));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }
}
