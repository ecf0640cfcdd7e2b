//! Delay schedules between failed attempts.

use crate::error::InvokeError;
use std::str::FromStr;
use std::time::Duration;

/// Default delay between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Default ceiling for exponential backoff.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay after every failure.
    Fixed(Duration),
    /// `base * 2^(attempt - 1)`, capped at `max`.
    Exponential {
        /// Delay after the first failure.
        base: Duration,
        /// Upper bound on any single delay.
        max: Duration,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Fixed(DEFAULT_BACKOFF)
    }
}

impl Backoff {
    /// Exponential schedule starting at `base` with the default ceiling.
    #[must_use]
    pub const fn exponential(base: Duration) -> Self {
        Self::Exponential {
            base,
            max: DEFAULT_MAX_BACKOFF,
        }
    }

    /// Returns the delay to wait after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Exponential { base, max } => {
                let exponent = attempt.saturating_sub(1).min(31);
                base.checked_mul(1 << exponent).map_or(max, |d| d.min(max))
            }
        }
    }

    /// Returns the schedule name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "fixed",
            Self::Exponential { .. } => "exponential",
        }
    }
}

/// Backoff family, as chosen on the command line or in config files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// See [`Backoff::Fixed`].
    #[default]
    Fixed,
    /// See [`Backoff::Exponential`].
    Exponential,
}

impl BackoffKind {
    /// Builds a schedule of this kind.
    #[must_use]
    pub const fn build(self, base: Duration, max: Duration) -> Backoff {
        match self {
            Self::Fixed => Backoff::Fixed(base),
            Self::Exponential => Backoff::Exponential { base, max },
        }
    }
}

impl FromStr for BackoffKind {
    type Err = InvokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "exponential" | "exp" => Ok(Self::Exponential),
            _ => Err(InvokeError::InvalidConfig {
                reason: format!("unknown backoff kind: {s}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fixed_one_second() {
        let backoff = Backoff::default();
        assert_eq!(backoff, Backoff::Fixed(Duration::from_secs(1)));
        assert_eq!(backoff.delay(1), Duration::from_secs(1));
        assert_eq!(backoff.delay(5), Duration::from_secs(1));
        assert_eq!(backoff.name(), "fixed");
    }

    #[test]
    fn test_exponential_doubles() {
        let backoff = Backoff::exponential(Duration::from_millis(100));
        assert_eq!(backoff.delay(1), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(200));
        assert_eq!(backoff.delay(3), Duration::from_millis(400));
        assert_eq!(backoff.name(), "exponential");
    }

    #[test]
    fn test_exponential_capped() {
        let backoff = Backoff::Exponential {
            base: Duration::from_secs(1),
            max: Duration::from_secs(5),
        };
        assert_eq!(backoff.delay(3), Duration::from_secs(4));
        assert_eq!(backoff.delay(4), Duration::from_secs(5));
        assert_eq!(backoff.delay(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("fixed".parse::<BackoffKind>().unwrap(), BackoffKind::Fixed);
        assert_eq!(
            "Exponential".parse::<BackoffKind>().unwrap(),
            BackoffKind::Exponential
        );
        assert!("linear".parse::<BackoffKind>().is_err());
    }

    #[test]
    fn test_kind_build() {
        let base = Duration::from_millis(50);
        let max = Duration::from_secs(1);
        assert_eq!(BackoffKind::Fixed.build(base, max), Backoff::Fixed(base));
        assert_eq!(
            BackoffKind::Exponential.build(base, max),
            Backoff::Exponential { base, max }
        );
    }
}
