//! # Events emitted by the spawner and its monitor.
//!
//! [`EventKind`] classifies events in three groups:
//! - **Lifecycle**: start, launch failure, close
//! - **Monitor**: death, restart outcome, metrics harvest
//! - **Subscriber**: delivery problems inside the fan-out
//!
//! [`Event`] carries the metadata relevant to its kind (instance id, function
//! name, restart count, reason, delay).
//!
//! ## Ordering guarantees
//! Every event gets a globally unique, monotonically increasing `seq`.
//!
//! ## Example
//! ```rust
//! use fnvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ContainerDied)
//!     .with_function("public/default/exclaim")
//!     .with_reason("out of memory")
//!     .with_restarts(2);
//!
//! assert_eq!(ev.kind, EventKind::ContainerDied);
//! assert_eq!(ev.reason.as_deref(), Some("out of memory"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of spawner events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle ===
    /// `start()` is creating the container.
    ///
    /// Sets: `instance`, `function`
    InstanceStarting,

    /// The container was created and started.
    ///
    /// Sets: `instance`, `function`
    InstanceStarted,

    /// The factory or the first container start failed.
    ///
    /// Sets: `instance`, `function`, `reason`
    LaunchFailed,

    /// The periodic monitor was armed.
    ///
    /// Sets: `instance`, `function`, `delay_ms` (tick period)
    MonitorArmed,

    /// `close()` stopped the container and disarmed the monitor.
    ///
    /// Sets: `instance`, `function`, `restarts`
    InstanceClosed,

    // === Monitor ===
    /// A tick found the container dead.
    ///
    /// Sets: `instance`, `function`, `reason` (death cause, if known), `restarts`
    ContainerDied,

    /// The container was restarted in place.
    ///
    /// Sets: `instance`, `function`, `restarts` (count after this restart)
    InstanceRestarted,

    /// The in-place restart failed; the next tick will try again.
    ///
    /// Sets: `instance`, `function`, `reason`, `restarts`
    RestartFailed,

    /// The restart policy or backoff held the restart back.
    ///
    /// Sets: `instance`, `function`, `reason`, `delay_ms` (remaining backoff, if any)
    RestartSkipped,

    /// A non-empty metrics record was forwarded to the sink.
    ///
    /// Sets: `instance`, `function`
    MetricsCollected,

    /// Harvesting metrics failed; the cycle was skipped.
    ///
    /// Sets: `instance`, `function`, `reason`
    MetricsFetchFailed,

    // === Subscriber ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `reason` (subscriber name and panic message)
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `reason` (subscriber name and cause)
    SubscriberOverflow,
}

/// Spawner event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Instance identifier.
    pub instance: Option<Arc<str>>,
    /// Fully-qualified function name.
    pub function: Option<Arc<str>>,
    /// Restart count at the time of the event.
    pub restarts: Option<u64>,
    /// Human-readable reason (death cause, error, overflow details).
    pub reason: Option<Arc<str>>,
    /// Delay in milliseconds (tick period or remaining backoff).
    pub delay_ms: Option<u32>,
}

impl Event {
    /// Creates an event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            instance: None,
            function: None,
            restarts: None,
            reason: None,
            delay_ms: None,
        }
    }

    /// Attaches an instance identifier.
    #[inline]
    pub fn with_instance(mut self, instance: impl Into<Arc<str>>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Attaches a fully-qualified function name.
    #[inline]
    pub fn with_function(mut self, function: impl Into<Arc<str>>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Attaches the restart count.
    #[inline]
    pub fn with_restarts(mut self, n: u64) -> Self {
        self.restarts = Some(n);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} panic={info}"))
    }
}
