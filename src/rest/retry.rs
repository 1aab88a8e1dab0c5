//! Retry policy for the request executor.
//!
//! Each attempt ends in one of three transitions:
//!
//! - the response arrived and matched the expected shape: [`Transition::Done`]
//! - a transient failure with attempts left: [`Transition::Backoff`], sleeping
//!   `base_delay * attempt` before the next attempt
//! - anything else: [`Transition::Failed`]. A transient failure on the last
//!   attempt is wrapped in [`CoinbaseError::ExhaustedRetries`]; other errors
//!   (shape mismatch, signing problems) are returned as they are.

use std::time::Duration;

use crate::error::CoinbaseError;

/// Outcome of one attempt.
#[derive(Debug)]
pub enum Transition<T> {
    /// Stop with a value.
    Done(T),
    /// Sleep for `delay`, then run attempt `next_attempt`.
    Backoff { next_attempt: u32, delay: Duration },
    /// Stop with an error.
    Failed(CoinbaseError),
}

/// Bounded linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Attempts made when none are configured.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    /// Delay unit when none is configured.
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

    /// Create a policy. At least one attempt is always made.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay after failed attempt `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Decide what follows attempt `attempt` given its outcome.
    pub fn transition<T>(
        &self,
        attempt: u32,
        outcome: Result<T, CoinbaseError>,
        method: &str,
        target: &str,
    ) -> Transition<T> {
        match outcome {
            Ok(value) => Transition::Done(value),
            Err(error) if !error.is_transient() => Transition::Failed(error),
            Err(_) if attempt < self.max_attempts => Transition::Backoff {
                next_attempt: attempt + 1,
                delay: self.backoff(attempt),
            },
            Err(error) => Transition::Failed(CoinbaseError::ExhaustedRetries {
                method: method.to_string(),
                target: target.to_string(),
                attempts: attempt,
                source: Box::new(error),
            }),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_BASE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error() -> CoinbaseError {
        CoinbaseError::Transport {
            method: "GET".to_string(),
            target: "/x".to_string(),
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    fn schema_error() -> CoinbaseError {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        CoinbaseError::SchemaValidation {
            target: "/x".to_string(),
            source,
        }
    }

    #[test]
    fn test_success_is_done() {
        let policy = RetryPolicy::default();
        assert!(matches!(
            policy.transition(3, Ok::<_, CoinbaseError>(7), "GET", "/x"),
            Transition::Done(7)
        ));
    }

    #[test]
    fn test_backoff_grows_linearly() {
        let policy = RetryPolicy::default();
        for attempt in 1..5 {
            match policy.transition::<()>(attempt, Err(server_error()), "GET", "/x") {
                Transition::Backoff { next_attempt, delay } => {
                    assert_eq!(next_attempt, attempt + 1);
                    assert_eq!(delay, Duration::from_millis(1000 * u64::from(attempt)));
                }
                other => panic!("attempt {attempt}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_last_attempt_exhausts() {
        let policy = RetryPolicy::default();
        match policy.transition::<()>(5, Err(server_error()), "GET", "/x?a=1") {
            Transition::Failed(CoinbaseError::ExhaustedRetries {
                method,
                target,
                attempts,
                source,
            }) => {
                assert_eq!(method, "GET");
                assert_eq!(target, "/x?a=1");
                assert_eq!(attempts, 5);
                assert_eq!(source.status(), Some(503));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_schema_failure_is_immediate() {
        let policy = RetryPolicy::default();
        assert!(matches!(
            policy.transition::<()>(1, Err(schema_error()), "GET", "/x"),
            Transition::Failed(CoinbaseError::SchemaValidation { .. })
        ));
    }

    #[test]
    fn test_configuration_errors_are_not_retried() {
        let policy = RetryPolicy::default();
        assert!(matches!(
            policy.transition::<()>(1, Err(CoinbaseError::MissingCredentials), "GET", "/x"),
            Transition::Failed(CoinbaseError::MissingCredentials)
        ));
    }

    #[test]
    fn test_single_attempt_policy() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        assert_eq!(policy.max_attempts(), 1);
        assert!(matches!(
            policy.transition::<()>(1, Err(server_error()), "POST", "/x"),
            Transition::Failed(CoinbaseError::ExhaustedRetries { attempts: 1, .. })
        ));
    }

    #[test]
    fn test_transient_then_success_walk() {
        let policy = RetryPolicy::new(4, Duration::from_millis(5));
        let outcomes: Vec<Result<&str, CoinbaseError>> =
            vec![Err(server_error()), Err(server_error()), Ok("value")];

        let mut attempt = 1;
        let mut slept = Duration::ZERO;
        let mut result = None;
        for outcome in outcomes {
            match policy.transition(attempt, outcome, "GET", "/x") {
                Transition::Done(value) => {
                    result = Some(value);
                    break;
                }
                Transition::Backoff { next_attempt, delay } => {
                    slept += delay;
                    attempt = next_attempt;
                }
                Transition::Failed(e) => panic!("unexpected failure {e}"),
            }
        }
        assert_eq!(result, Some("value"));
        assert_eq!(attempt, 3);
        assert_eq!(slept, Duration::from_millis(5 + 10));
    }
}
