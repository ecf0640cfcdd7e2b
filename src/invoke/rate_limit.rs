//! Minimum-interval rate gate, keyed by operation.
//!
//! Each [`RateLimiter`] owns the last-invocation timestamp for one operation
//! key behind its own mutex, so the read-compare-write of the gate is a
//! single critical section per key. A [`RateLimitTable`] hands out shared
//! limiters by key; it is an ordinary value owned by the caller.

use crate::error::{BoxError, InvokeError};
use crate::invoke::backoff::Backoff;
use crate::invoke::clock::{Clock, SystemClock};
use crate::invoke::invoker::{ResilientInvoker, RetryPolicy};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Rate gate for a single operation key.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use topic_cards::invoke::{Clock, ManualClock, RateLimiter};
///
/// let clock = ManualClock::new();
/// let limiter = RateLimiter::new("topicgen", Duration::from_secs(5));
/// assert!(limiter.try_acquire_at(clock.now()).is_ok());
/// assert!(limiter.try_acquire_at(clock.now()).is_err());
/// clock.advance(Duration::from_secs(5));
/// assert!(limiter.try_acquire_at(clock.now()).is_ok());
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    key: String,
    min_interval: Duration,
    last_invocation: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter that has never been passed.
    #[must_use]
    pub fn new(key: impl Into<String>, min_interval: Duration) -> Self {
        Self {
            key: key.into(),
            min_interval,
            last_invocation: Mutex::new(None),
        }
    }

    /// Creates a limiter from an interval in (fractional) seconds.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::InvalidConfig`] for negative or non-finite intervals.
    pub fn from_secs_f64(key: impl Into<String>, min_interval_seconds: f64) -> Result<Self, InvokeError> {
        Ok(Self::new(key, interval_from_secs(min_interval_seconds)?))
    }

    /// Returns the operation key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the configured minimum interval.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Returns when the gate was last passed, if ever.
    #[must_use]
    pub fn last_invocation(&self) -> Option<Instant> {
        *self.last_invocation.lock()
    }

    /// Passes the gate at `now` using the configured interval.
    ///
    /// On success the timestamp is recorded; on rejection nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::RateLimited`] if the previous pass was less than
    /// the minimum interval before `now`.
    pub fn try_acquire_at(&self, now: Instant) -> Result<(), InvokeError> {
        self.check(now, self.min_interval)
    }

    /// Gate check against an explicit interval.
    pub(crate) fn check(&self, now: Instant, min_interval: Duration) -> Result<(), InvokeError> {
        let mut last = self.last_invocation.lock();
        if let Some(previous) = *last {
            let elapsed = now.saturating_duration_since(previous);
            if elapsed < min_interval {
                let retry_after = min_interval - elapsed;
                tracing::debug!(
                    operation = %self.key,
                    retry_after_ms = u64::try_from(retry_after.as_millis()).unwrap_or(u64::MAX),
                    "rate gate closed"
                );
                return Err(InvokeError::RateLimited {
                    operation: self.key.clone(),
                    retry_after,
                });
            }
        }
        *last = Some(now);
        Ok(())
    }

    /// Forgets the last invocation so the next call passes.
    pub fn reset(&self) {
        *self.last_invocation.lock() = None;
    }
}

/// Converts a seconds value into an interval, rejecting unusable values.
pub(crate) fn interval_from_secs(seconds: f64) -> Result<Duration, InvokeError> {
    Duration::try_from_secs_f64(seconds).map_err(|e| InvokeError::InvalidConfig {
        reason: format!("min interval {seconds}s: {e}"),
    })
}

/// Caller-owned registry of limiters keyed by operation.
///
/// [`RateLimitTable::invoke`] is the keyed entry point: it looks up (or
/// creates) the limiter for `operation_id`, gates on the interval given
/// for this call, then runs the attempt loop.
#[derive(Debug)]
pub struct RateLimitTable {
    limiters: Mutex<HashMap<String, Arc<RateLimiter>>>,
    clock: Arc<dyn Clock>,
    backoff: Backoff,
}

impl Default for RateLimitTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitTable {
    /// Creates an empty table on the system clock with fixed one-second backoff.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty table on the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            limiters: Mutex::new(HashMap::new()),
            clock,
            backoff: Backoff::default(),
        }
    }

    /// Sets the backoff schedule used by [`RateLimitTable::invoke`].
    #[must_use]
    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns the limiter for `key`, creating it with `min_interval` if absent.
    pub fn limiter(&self, key: &str, min_interval: Duration) -> Arc<RateLimiter> {
        let mut limiters = self.limiters.lock();
        Arc::clone(
            limiters
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(RateLimiter::new(key, min_interval))),
        )
    }

    /// Returns the number of keys seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.limiters.lock().len()
    }

    /// Returns true if no key has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limiters.lock().is_empty()
    }

    /// Rate-gates and retries one model invocation.
    ///
    /// `max_retries` is the ceiling on attempts, first try included.
    ///
    /// # Errors
    ///
    /// - [`InvokeError::InvalidConfig`] if `max_retries` is zero or the
    ///   interval is negative or non-finite; no state is touched.
    /// - [`InvokeError::RateLimited`] if `operation_id` passed the gate less
    ///   than `min_interval_seconds` ago; `perform` is not called.
    /// - [`InvokeError::ExhaustedRetries`] if every attempt failed.
    pub fn invoke<F, E>(
        &self,
        operation_id: &str,
        perform: F,
        max_retries: u32,
        min_interval_seconds: f64,
    ) -> Result<String, InvokeError>
    where
        F: FnMut() -> Result<String, E>,
        E: Into<BoxError>,
    {
        let policy = RetryPolicy::new(max_retries, self.backoff)?;
        let interval = interval_from_secs(min_interval_seconds)?;
        let limiter = self.limiter(operation_id, interval);

        let invoker = ResilientInvoker::with_clock(policy, Arc::clone(&self.clock));
        invoker.invoke_with_interval(&limiter, interval, perform)
    }
}
