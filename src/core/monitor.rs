//! # Monitor: periodic liveness check, metrics harvest and restart.
//!
//! The monitor is a task armed by [`Spawner::start`] when a metrics sink is
//! configured. It holds a weak reference to the spawner and calls
//! [`Spawner::tick`] once per period.
//!
//! ## Tick
//! ```text
//! tick()
//!   ├─ no container (closed)      ─► return
//!   ├─ alive ─► reset restart streak
//!   │          └─► spawn harvest: take_metrics()
//!   │                 ├─ Ok(Some(non-empty)) ─► sink.process_record(), MetricsCollected
//!   │                 ├─ Ok(None) / empty    ─► skip
//!   │                 └─ Err                 ─► MetricsFetchFailed, skip
//!   └─ dead  ─► ContainerDied (death cause)
//!              ├─ gate: policy exhausted / backoff pending ─► RestartSkipped
//!              └─ container.start() on the same object, restarts += 1
//!                    ├─ Ok  ─► InstanceRestarted
//!                    └─ Err ─► RestartFailed (next tick tries again)
//! ```
//!
//! ## Rules
//! - The first tick fires one full period after arming.
//! - The dead branch runs under the spawner lock, so it never races `close()`.
//! - Harvests are spawned; a slow one may overlap the next tick. Closing the
//!   spawner drops harvests still in flight.
//! - The restart counter is bumped right after `start()` returns, before any
//!   backoff bookkeeping.
//! - A panic inside a tick is caught and logged; the loop keeps running.

use std::sync::{Arc, Weak};
use std::sync::atomic::Ordering;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::spawner::Spawner;
use crate::{
    container::ContainerRef,
    events::{Event, EventKind},
    policies::{BackoffPolicy, RestartPolicy},
};

/// Handle to a running monitor task.
pub(crate) struct MonitorHandle {
    token: CancellationToken,
    _join: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stops the loop and abandons pending harvests. A tick already in
    /// progress completes first.
    pub(crate) fn cancel(self) {
        self.token.cancel();
    }

    /// Token cancelled together with the monitor.
    fn harvest_token(&self) -> CancellationToken {
        self.token.child_token()
    }
}

/// Spawns the monitor loop for `spawner`.
pub(crate) fn spawn(spawner: Weak<Spawner>, period: Duration) -> MonitorHandle {
    let token = CancellationToken::new();
    let join = tokio::spawn(run(spawner, period, token.clone()));
    MonitorHandle { token, _join: join }
}

async fn run(spawner: Weak<Spawner>, period: Duration, token: CancellationToken) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let Some(spawner) = spawner.upgrade() else { break };
                if let Err(panic) = std::panic::AssertUnwindSafe(spawner.tick()).catch_unwind().await {
                    error!(function = %spawner.fqn, ?panic, "monitor tick panicked");
                }
            }
        }
    }
}

/// Outcome of asking the gate for a restart.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    Restart,
    Exhausted,
    Wait(Duration),
}

/// Wait applied when a backoff delay does not fit on the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Tracks the current streak of restarts not followed by an alive tick.
#[derive(Debug, Default)]
pub(crate) struct RestartGate {
    consecutive: u32,
    not_before: Option<Instant>,
}

impl RestartGate {
    pub(crate) fn verdict(&self, policy: RestartPolicy, now: Instant) -> Verdict {
        if !policy.allows(self.consecutive) {
            return Verdict::Exhausted;
        }
        match self.not_before {
            Some(at) if now < at => Verdict::Wait(at - now),
            _ => Verdict::Restart,
        }
    }

    pub(crate) fn record(&mut self, backoff: &BackoffPolicy, now: Instant) {
        self.consecutive = self.consecutive.saturating_add(1);
        let delay = backoff.next(self.consecutive);
        self.not_before = now
            .checked_add(delay)
            .or_else(|| now.checked_add(FAR_FUTURE));
    }

    pub(crate) fn reset(&mut self) {
        self.consecutive = 0;
        self.not_before = None;
    }
}

impl Spawner {
    /// One monitor tick.
    pub(crate) async fn tick(&self) {
        let mut slot = self.slot.lock().await;
        let Some(container) = slot.container.clone() else {
            return;
        };

        if container.is_alive() {
            slot.gate.reset();
            let token = slot
                .monitor
                .as_ref()
                .map(MonitorHandle::harvest_token)
                .unwrap_or_default();
            drop(slot);
            self.harvest(container, token);
            return;
        }

        let cause = container.death_cause();
        let reason = cause
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        error!(function = %self.fqn, reason = %reason, restarts = self.restarts(), "function container is dead");
        self.publish_with(
            Event::new(EventKind::ContainerDied)
                .with_reason(reason)
                .with_restarts(self.restarts()),
        );

        let now = Instant::now();
        match slot.gate.verdict(self.cfg.restart, now) {
            Verdict::Restart => {}
            Verdict::Exhausted => {
                self.publish_with(
                    Event::new(EventKind::RestartSkipped).with_reason("restart policy exhausted"),
                );
                return;
            }
            Verdict::Wait(left) => {
                self.publish_with(
                    Event::new(EventKind::RestartSkipped)
                        .with_reason("backoff pending")
                        .with_delay(left),
                );
                return;
            }
        }

        warn!(function = %self.fqn, "restarting function container");
        let result = container.start().await;
        let restarts = self.restarts.fetch_add(1, Ordering::SeqCst) + 1;
        slot.gate.record(&self.cfg.backoff, now);
        drop(slot);

        match result {
            Ok(()) => {
                self.publish_with(Event::new(EventKind::InstanceRestarted).with_restarts(restarts));
            }
            Err(e) => {
                error!(function = %self.fqn, error = %e, restarts, "restart failed; retrying on next tick");
                self.publish_with(
                    Event::new(EventKind::RestartFailed)
                        .with_reason(e.to_string())
                        .with_restarts(restarts),
                );
            }
        }
    }

    /// Takes the container's metrics and forwards them to the sink, off the tick.
    ///
    /// Cancelling `token` (closing the spawner) drops the harvest in flight.
    fn harvest(&self, container: ContainerRef, token: CancellationToken) {
        let Some(sink) = self.sink.clone() else {
            return;
        };
        let config = Arc::clone(self.descriptor.function_config());
        let bus = self.bus.clone();
        let stamp = {
            let instance: Arc<str> = self.descriptor.instance_id().into();
            let function = Arc::clone(&self.fqn);
            move |ev: Event| {
                ev.with_instance(Arc::clone(&instance))
                    .with_function(Arc::clone(&function))
            }
        };

        debug!(function = %self.fqn, "collecting metrics");
        tokio::spawn(async move {
            let fetched = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(function = %config, "spawner closed; dropping metrics harvest");
                    return;
                }
                fetched = container.take_metrics() => fetched,
            };
            match fetched {
                Ok(Some(record)) if !record.is_empty() => {
                    debug!(function = %config, sink = sink.name(), metrics = record.len(), "collected metrics");
                    sink.process_record(record, &config).await;
                    bus.publish(stamp(Event::new(EventKind::MetricsCollected)));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(function = %config, error = %e, "metrics collection failed; skipping cycle");
                    bus.publish(stamp(
                        Event::new(EventKind::MetricsFetchFailed).with_reason(e.to_string()),
                    ));
                }
            }
        });
    }
}
