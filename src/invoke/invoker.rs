//! Bounded retry loop behind the rate gate.

use crate::error::{BoxError, InvokeError};
use crate::invoke::backoff::Backoff;
use crate::invoke::clock::{Clock, SystemClock};
use crate::invoke::rate_limit::RateLimiter;
use std::sync::Arc;
use std::time::Duration;

/// Default ceiling on attempts per invocation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy allowing `max_attempts` attempts in total.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::InvalidConfig`] if `max_attempts` is zero.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Result<Self, InvokeError> {
        if max_attempts == 0 {
            return Err(InvokeError::InvalidConfig {
                reason: "max attempts must be >= 1".to_string(),
            });
        }
        Ok(Self {
            max_attempts,
            backoff,
        })
    }

    /// Returns the attempt ceiling.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the backoff schedule.
    #[must_use]
    pub const fn backoff(&self) -> Backoff {
        self.backoff
    }
}

/// One call to `perform` and what it produced.
struct InvocationAttempt {
    number: u32,
    outcome: Result<String, BoxError>,
}

impl InvocationAttempt {
    fn run<F, E>(number: u32, perform: &mut F) -> Self
    where
        F: FnMut() -> Result<String, E>,
        E: Into<BoxError>,
    {
        Self {
            number,
            outcome: perform().map_err(Into::into),
        }
    }
}

/// Wraps a model call with a rate gate and bounded retries.
///
/// Every call ends in exactly one of three states: the produced text,
/// [`InvokeError::RateLimited`], or [`InvokeError::ExhaustedRetries`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use topic_cards::invoke::{Backoff, ManualClock, RateLimiter, ResilientInvoker, RetryPolicy};
///
/// let clock = Arc::new(ManualClock::new());
/// let policy = RetryPolicy::new(3, Backoff::default()).unwrap();
/// let invoker = ResilientInvoker::with_clock(policy, clock.clone());
/// let limiter = RateLimiter::new("topicgen", Duration::from_secs(1));
///
/// let mut calls = 0;
/// let text = invoker
///     .invoke(&limiter, || {
///         calls += 1;
///         if calls < 2 { Err("flaky") } else { Ok("**Topic 1**ok".to_string()) }
///     })
///     .unwrap();
/// assert_eq!(text, "**Topic 1**ok");
/// assert_eq!(clock.sleeps(), vec![Duration::from_secs(1)]);
/// ```
#[derive(Debug, Clone)]
pub struct ResilientInvoker {
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl Default for ResilientInvoker {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl ResilientInvoker {
    /// Creates an invoker on the system clock.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock))
    }

    /// Creates an invoker on the given clock.
    #[must_use]
    pub fn with_clock(policy: RetryPolicy, clock: Arc<dyn Clock>) -> Self {
        Self { policy, clock }
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Gates on `limiter`, then calls `perform` until it succeeds or the
    /// attempt ceiling is reached.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::RateLimited`] without calling `perform` if the
    /// gate is closed, or [`InvokeError::ExhaustedRetries`] carrying the
    /// final error if every attempt failed.
    pub fn invoke<F, E>(&self, limiter: &RateLimiter, perform: F) -> Result<String, InvokeError>
    where
        F: FnMut() -> Result<String, E>,
        E: Into<BoxError>,
    {
        self.invoke_with_interval(limiter, limiter.min_interval(), perform)
    }

    pub(crate) fn invoke_with_interval<F, E>(
        &self,
        limiter: &RateLimiter,
        min_interval: Duration,
        perform: F,
    ) -> Result<String, InvokeError>
    where
        F: FnMut() -> Result<String, E>,
        E: Into<BoxError>,
    {
        // Lock is released inside `check`, before any attempt or sleep.
        limiter.check(self.clock.now(), min_interval)?;
        self.run_attempts(limiter.key(), perform)
    }

    fn run_attempts<F, E>(&self, operation: &str, mut perform: F) -> Result<String, InvokeError>
    where
        F: FnMut() -> Result<String, E>,
        E: Into<BoxError>,
    {
        let max_attempts = self.policy.max_attempts;
        let mut number = 1;

        loop {
            let attempt = InvocationAttempt::run(number, &mut perform);
            match attempt.outcome {
                Ok(text) => {
                    tracing::debug!(operation, attempt = attempt.number, "invocation succeeded");
                    return Ok(text);
                }
                Err(source) if attempt.number >= max_attempts => {
                    tracing::warn!(
                        operation,
                        attempts = attempt.number,
                        error = %source,
                        "invocation retries exhausted"
                    );
                    return Err(InvokeError::ExhaustedRetries {
                        operation: operation.to_string(),
                        attempts: attempt.number,
                        source,
                    });
                }
                Err(source) => {
                    let delay = self.policy.backoff.delay(attempt.number);
                    tracing::warn!(
                        operation,
                        attempt = attempt.number,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %source,
                        "invocation attempt failed, backing off"
                    );
                    self.clock.sleep(delay);
                    number += 1;
                }
            }
        }
    }
}
