//! # Spacing between consecutive restarts.
//!
//! [`BackoffPolicy`] holds back a restart until enough time has passed since the
//! previous one. The delay before restart number `n` of a streak (0-indexed) is
//! `first × factor^(n-1)` clamped to `max`, then jittered; the first restart of a
//! streak is never delayed.
//!
//! The default policy has a zero delay, which restarts a dead container on every
//! monitor tick.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use fnvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_secs(1),
//!     max: Duration::from_secs(60),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::ZERO);
//! assert_eq!(backoff.next(1), Duration::from_secs(1));
//! assert_eq!(backoff.next(3), Duration::from_secs(4));
//! assert_eq!(backoff.next(20), Duration::from_secs(60));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Restart spacing policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the second restart of a streak.
    pub first: Duration,
    /// Maximum delay.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Randomization of the computed delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns [`BackoffPolicy::none`].
    fn default() -> Self {
        Self::none()
    }
}

impl BackoffPolicy {
    /// A policy that never delays a restart.
    pub const fn none() -> Self {
        Self {
            first: Duration::ZERO,
            max: Duration::ZERO,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Returns the minimum time between the previous restart and restart
    /// number `consecutive` of the current streak.
    pub fn next(&self, consecutive: u32) -> Duration {
        if consecutive == 0 {
            return Duration::ZERO;
        }
        let exp = (consecutive - 1).min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = Duration::try_from_secs_f64(secs)
            .map(|d| d.min(self.max))
            .unwrap_or(self.max);
        self.jitter.apply(base)
    }
}
