//! Backoff applied while a credential reports a minute throttle.

use std::time::Duration;

/// Default pause before re-trying a throttled credential.
pub const DEFAULT_THROTTLE_BACKOFF: Duration = Duration::from_secs(15);

/// Default number of extra attempts per credential after a minute throttle.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same pause before every retry.
    Fixed { delay: Duration },
    /// `base * factor^attempt`, capped at `max`, optionally with +/- 50% jitter.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Fixed {
            delay: DEFAULT_THROTTLE_BACKOFF,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(attempt.min(i32::MAX as u32) as i32);
                let seconds = (base.as_secs_f64() * scale).min(max.as_secs_f64());
                let delay = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(max);
                if !jitter {
                    return delay;
                }

                let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                let half_ms = delay_ms / 2;
                let offset = fastrand::u64(0..=half_ms.saturating_mul(2));
                Duration::from_millis((delay_ms - half_ms).saturating_add(offset))
            }
        }
    }
}

/// How many times a throttled credential is re-tried, and how long to wait
/// between tries. Total attempts per credential are `max_retries + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Backoff::default(),
        }
    }
}

impl RetryConfig {
    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed { delay },
        }
    }

    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_fifteen_seconds_with_two_retries() {
        let config = RetryConfig::default();

        assert_eq!(config.max_retries, 2);
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(15));
        assert_eq!(config.delay_for_attempt(5), Duration::from_secs(15));
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_secs(1),
            jitter: false,
        };

        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(400));
        assert_eq!(backoff.delay(4), Duration::from_secs(1));
    }

    #[test]
    fn jitter_stays_within_half_of_base_delay() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(200),
            factor: 2.0,
            max: Duration::from_secs(2),
            jitter: true,
        };

        for _ in 0..20 {
            for attempt in 0..4 {
                let expected = (200.0 * 2_f64.powi(attempt as i32)).min(2000.0);
                let actual = backoff.delay(attempt).as_millis() as f64;
                assert!(actual >= expected * 0.49, "attempt={attempt}, delay={actual}");
                assert!(actual <= expected * 1.51, "attempt={attempt}, delay={actual}");
            }
        }
    }

    #[test]
    fn huge_cap_saturates_instead_of_panicking() {
        for jitter in [false, true] {
            let backoff = Backoff::Exponential {
                base: Duration::MAX,
                factor: 4.0,
                max: Duration::MAX,
                jitter,
            };

            assert!(backoff.delay(3) >= Duration::from_secs(u64::MAX / 1000 / 2));
        }
    }

    #[test]
    fn no_retry_allows_single_attempt() {
        assert_eq!(RetryConfig::no_retry().max_retries, 0);
    }
}
