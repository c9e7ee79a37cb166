//! Bounded constant-delay reconnection policy.
//!
//! Every involuntary disconnect consumes one attempt from the budget and
//! waits the same fixed delay; a successful open refills the budget. Once the
//! budget is spent the policy reports [`RetryDecision::Exhausted`] on every
//! further disconnect until [`ReconnectPolicy::reset`] is called.

use std::time::Duration;

use wedear_settings::RealtimeSettings;

/// What to do after a disconnect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Reconnect after `delay`. `attempt` is 1-based.
    Retry {
        /// Attempt number within the current budget.
        attempt: u32,
        /// How long to wait first.
        delay: Duration,
    },
    /// Stop; the budget is spent.
    Exhausted {
        /// Attempts made before giving up.
        attempts: u32,
    },
}

/// Retry counter with a fixed cap and a fixed delay.
#[derive(Clone, Debug)]
pub struct ReconnectPolicy {
    max_attempts: u32,
    delay: Duration,
    attempts: u32,
}

impl ReconnectPolicy {
    /// Create a policy with a full budget.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            attempts: 0,
        }
    }

    /// Policy configured from realtime settings.
    pub fn from_settings(settings: &RealtimeSettings) -> Self {
        Self::new(settings.max_reconnect_attempts, settings.reconnect_delay())
    }

    /// Attempts consumed since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Configured cap.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Refill the budget.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Record a disconnect and decide whether to retry.
    pub fn on_disconnect(&mut self) -> RetryDecision {
        if self.attempts >= self.max_attempts {
            return RetryDecision::Exhausted {
                attempts: self.attempts,
            };
        }
        self.attempts += 1;
        RetryDecision::Retry {
            attempt: self.attempts,
            delay: self.delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults_from_settings() {
        let policy = ReconnectPolicy::from_settings(&RealtimeSettings::default());
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.attempts(), 0);
    }

    #[test]
    fn constant_delay_until_exhausted() {
        let mut policy = ReconnectPolicy::new(5, Duration::from_millis(3000));
        for expected in 1..=5 {
            assert_eq!(
                policy.on_disconnect(),
                RetryDecision::Retry {
                    attempt: expected,
                    delay: Duration::from_millis(3000),
                }
            );
        }
        assert_eq!(policy.on_disconnect(), RetryDecision::Exhausted { attempts: 5 });
        // Stays exhausted and never over-counts.
        assert_eq!(policy.on_disconnect(), RetryDecision::Exhausted { attempts: 5 });
        assert_eq!(policy.attempts(), 5);
    }

    #[test]
    fn reset_refills_budget() {
        let mut policy = ReconnectPolicy::new(2, Duration::from_secs(1));
        let _ = policy.on_disconnect();
        let _ = policy.on_disconnect();
        assert_matches!(policy.on_disconnect(), RetryDecision::Exhausted { .. });

        policy.reset();
        assert_eq!(policy.attempts(), 0);
        assert_matches!(policy.on_disconnect(), RetryDecision::Retry { attempt: 1, .. });
    }

    #[test]
    fn zero_budget_never_retries() {
        let mut policy = ReconnectPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.on_disconnect(), RetryDecision::Exhausted { attempts: 0 });
    }
}
