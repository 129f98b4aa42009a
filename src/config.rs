//! # Spawner configuration.
//!
//! Provides [`SpawnerConfig`], the timing and policy settings of one
//! [`Spawner`](crate::Spawner).
//!
//! ## Sentinel values
//! - `metrics_interval = 0s` → no monitor (no metrics collection, no restarts)
//! - `bus_capacity = 0` → clamped to 1
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use fnvisor::{RestartPolicy, SpawnerConfig};
//!
//! let mut cfg = SpawnerConfig::default();
//! cfg.metrics_interval = Duration::from_secs(10);
//! cfg.restart = RestartPolicy::UpTo { max: 5 };
//!
//! assert_eq!(cfg.monitor_interval(), Some(Duration::from_secs(10)));
//! ```

use std::time::Duration;

use crate::policies::{BackoffPolicy, RestartPolicy};

/// Configuration of a spawner.
///
/// ## Field semantics
/// - `metrics_interval`: period of the monitor tick (`0s` = monitor disabled)
/// - `max_buffered_items`: bound on the instance's internal work queue, handed to the container
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `restart`: whether a dead container is restarted
/// - `backoff`: minimum spacing between consecutive restarts
#[derive(Clone, Debug)]
pub struct SpawnerConfig {
    /// Period between two monitor ticks. The first tick fires one full period after start.
    pub metrics_interval: Duration,

    /// Maximum number of work items buffered inside the instance.
    pub max_buffered_items: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Restart policy applied on dead ticks.
    pub restart: RestartPolicy,

    /// Backoff applied between consecutive restarts.
    pub backoff: BackoffPolicy,
}

impl SpawnerConfig {
    /// Returns the monitor period as an `Option`.
    ///
    /// - `None` → the monitor is not armed
    /// - `Some(d)` → one tick every `d`
    #[inline]
    pub fn monitor_interval(&self) -> Option<Duration> {
        if self.metrics_interval == Duration::ZERO {
            None
        } else {
            Some(self.metrics_interval)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SpawnerConfig {
    /// Default configuration:
    ///
    /// - `metrics_interval = 30s`
    /// - `max_buffered_items = 1024`
    /// - `bus_capacity = 1024`
    /// - `restart = RestartPolicy::Always`
    /// - `backoff = BackoffPolicy::none()`
    fn default() -> Self {
        Self {
            metrics_interval: Duration::from_secs(30),
            max_buffered_items: 1024,
            bus_capacity: 1024,
            restart: RestartPolicy::default(),
            backoff: BackoffPolicy::default(),
        }
    }
}
