//! # LogWriter: events as `tracing` records.
//!
//! Renders each [`Event`] as one `tracing` record with structured fields.
//! Failures are logged at `warn`/`error`, lifecycle at `info`, harvests at `debug`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO  instance started function="public/default/exclaim" instance="9c1e.."
//! ERROR container died function="public/default/exclaim" reason="out of memory" restarts=0
//! INFO  instance restarted function="public/default/exclaim" restarts=1
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Subscriber writing events through `tracing`.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let function = e.function.as_deref().unwrap_or("-");
        let instance = e.instance.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::InstanceStarting => {
                info!(function, instance, "instance starting");
            }
            EventKind::InstanceStarted => {
                info!(function, instance, "instance started");
            }
            EventKind::LaunchFailed => {
                error!(function, instance, reason, "instance launch failed");
            }
            EventKind::MonitorArmed => {
                info!(function, instance, period_ms = ?e.delay_ms, "metrics collection scheduled");
            }
            EventKind::InstanceClosed => {
                info!(function, instance, restarts = ?e.restarts, "instance closed");
            }
            EventKind::ContainerDied => {
                error!(function, instance, reason, restarts = ?e.restarts, "container died");
            }
            EventKind::InstanceRestarted => {
                info!(function, instance, restarts = ?e.restarts, "instance restarted");
            }
            EventKind::RestartFailed => {
                error!(function, instance, reason, restarts = ?e.restarts, "restart failed");
            }
            EventKind::RestartSkipped => {
                warn!(function, instance, reason, delay_ms = ?e.delay_ms, "restart skipped");
            }
            EventKind::MetricsCollected => {
                debug!(function, instance, "metrics collected");
            }
            EventKind::MetricsFetchFailed => {
                warn!(function, instance, reason, "metrics collection failed");
            }
            EventKind::SubscriberOverflow => {
                warn!(reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                error!(reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
