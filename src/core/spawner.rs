//! # Spawner: lifecycle of one function instance.
//!
//! The [`Spawner`] owns one container, restarts it in place when the monitor
//! finds it dead, and answers status requests with the container's report
//! overlaid with supervision data.
//!
//! ## State machine
//! ```text
//!            start() ok                 close()
//!   Idle ─────────────────► Running ─────────────► Closed
//!    ▲  │                    │   ▲
//!    │  │ start() err        │   │ dead tick: container.start() on the same object,
//!    └──┘ (nothing kept)     └───┘ restarts += 1
//! ```
//!
//! ## Shared state
//! The container handle, the monitor handle and the restart streak live in one
//! [`Mutex`]. `start`, `close` and the dead branch of a tick are critical
//! sections over it. `join` and `status` copy the handle out under the lock and
//! release it before awaiting the container. A tick that runs after `close`
//! finds no handle and does nothing.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use fnvisor::{FactoryRef, FunctionConfig, SinkRef, Spawner, SpawnerConfig};
//!
//! async fn run(factory: FactoryRef, sink: SinkRef) -> Result<(), fnvisor::SpawnError> {
//!     let spawner = Spawner::new(
//!         FunctionConfig::new("public", "default", "exclaim"),
//!         "/opt/functions/exclaim.jar",
//!         factory,
//!         Some(sink),
//!         SpawnerConfig::default(),
//!     );
//!
//!     spawner.start().await?;
//!     let status = spawner.status().await?;
//!     println!("restarts so far: {}", status.num_restarts);
//!     spawner.close().await;
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tokio_util::sync::DropGuard;
use tracing::{info, warn};

use super::builder::SpawnerBuilder;
use super::monitor::{self, MonitorHandle, RestartGate};
use crate::{
    config::SpawnerConfig,
    container::{ContainerRef, FactoryRef},
    error::SpawnError,
    events::{Bus, Event, EventKind},
    instance::{FunctionConfig, InstanceDescriptor},
    metrics::SinkRef,
    status::FunctionStatus,
};

/// Lifecycle state of a [`Spawner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnerState {
    /// Built, no container yet (or the last `start()` failed).
    Idle,
    /// A container was started; the monitor may be armed.
    Running,
    /// Closed for good.
    Closed,
}

/// Mutable part of the spawner, guarded by one mutex.
pub(super) struct Slot {
    pub(super) state: SpawnerState,
    pub(super) container: Option<ContainerRef>,
    pub(super) monitor: Option<MonitorHandle>,
    pub(super) gate: RestartGate,
}

/// Supervisor of a single function instance.
///
/// Create it with [`Spawner::new`] or [`Spawner::builder`]; both return an
/// `Arc` because the monitor task keeps a weak reference to it.
///
/// ### Rules
/// - `start()` succeeds at most once; a second call returns [`SpawnError::AlreadyStarted`].
/// - The [`InstanceDescriptor`] is generated at construction and reused by every restart.
/// - The restart counter only grows.
/// - `close()` is idempotent and a no-op before `start()`.
pub struct Spawner {
    pub(super) descriptor: InstanceDescriptor,
    pub(super) code_path: PathBuf,
    pub(super) factory: FactoryRef,
    pub(super) sink: Option<SinkRef>,
    pub(super) cfg: SpawnerConfig,
    pub(super) bus: Bus,
    pub(super) slot: Mutex<Slot>,
    pub(super) restarts: AtomicU64,
    pub(super) fqn: Arc<str>,
    pub(super) _listener: Option<DropGuard>,
}

impl Spawner {
    /// Creates a spawner with generated identifiers and no subscribers.
    ///
    /// The monitor is armed by `start()` only when `sink` is `Some` and
    /// `cfg.metrics_interval` is non-zero.
    pub fn new(
        function_config: impl Into<Arc<FunctionConfig>>,
        code_path: impl Into<PathBuf>,
        factory: FactoryRef,
        sink: Option<SinkRef>,
        cfg: SpawnerConfig,
    ) -> Arc<Self> {
        let mut builder = SpawnerBuilder::new(function_config, code_path, factory).with_config(cfg);
        if let Some(sink) = sink {
            builder = builder.with_metrics_sink(sink);
        }
        builder.build()
    }

    /// Returns a builder for finer control (explicit assignment, subscribers).
    pub fn builder(
        function_config: impl Into<Arc<FunctionConfig>>,
        code_path: impl Into<PathBuf>,
        factory: FactoryRef,
    ) -> SpawnerBuilder {
        SpawnerBuilder::new(function_config, code_path, factory)
    }

    /// Builds the container, starts it and arms the monitor.
    ///
    /// The first monitor tick fires one full `metrics_interval` after this call.
    ///
    /// ### Errors
    /// - [`SpawnError::Factory`] / [`SpawnError::Launch`]: nothing is kept, the
    ///   spawner stays [`SpawnerState::Idle`] and `start()` may be called again.
    /// - [`SpawnError::AlreadyStarted`]: a container is already running.
    /// - [`SpawnError::Closed`]: the spawner was closed.
    pub async fn start(self: &Arc<Self>) -> Result<(), SpawnError> {
        let mut slot = self.slot.lock().await;
        match slot.state {
            SpawnerState::Idle => {}
            SpawnerState::Running => return Err(SpawnError::AlreadyStarted),
            SpawnerState::Closed => return Err(SpawnError::Closed),
        }

        info!(function = %self.fqn, instance = self.descriptor.instance_id(), "spawner starting function");
        self.publish(EventKind::InstanceStarting);

        let container = self
            .factory
            .create_container(&self.descriptor, &self.code_path)
            .map_err(|e| {
                self.publish_with(Event::new(EventKind::LaunchFailed).with_reason(e.to_string()));
                SpawnError::Factory(e)
            })?;
        if let Err(e) = container.start().await {
            self.publish_with(Event::new(EventKind::LaunchFailed).with_reason(e.to_string()));
            return Err(SpawnError::Launch(e));
        }

        slot.container = Some(container);
        slot.state = SpawnerState::Running;
        self.publish(EventKind::InstanceStarted);

        if let (Some(_), Some(period)) = (&self.sink, self.cfg.monitor_interval()) {
            info!(function = %self.fqn, period = ?period, "scheduling metrics collection");
            slot.monitor = Some(monitor::spawn(Arc::downgrade(self), period));
            self.publish_with(Event::new(EventKind::MonitorArmed).with_delay(period));
        }
        Ok(())
    }

    /// Waits until the container terminates.
    ///
    /// Returns immediately when there is no container (never started, or closed).
    /// Closing the spawner unblocks a pending `join` only if the container's
    /// `stop` makes it terminate.
    pub async fn join(&self) -> Result<(), SpawnError> {
        let container = self.slot.lock().await.container.clone();
        match container {
            Some(c) => c.join().await.map_err(SpawnError::Container),
            None => Ok(()),
        }
    }

    /// Returns the container's status with the restart count and, if the
    /// container is dead, its death cause overlaid.
    ///
    /// ### Errors
    /// - [`SpawnError::NotStarted`] before a successful `start()`.
    /// - [`SpawnError::Closed`] after `close()`.
    /// - [`SpawnError::Container`] if the container fails to report.
    pub async fn status(&self) -> Result<FunctionStatus, SpawnError> {
        let container = {
            let slot = self.slot.lock().await;
            match (&slot.container, slot.state) {
                (Some(c), _) => Arc::clone(c),
                (None, SpawnerState::Closed) => return Err(SpawnError::Closed),
                (None, _) => return Err(SpawnError::NotStarted),
            }
        };

        let reported = container
            .function_status()
            .await
            .map_err(SpawnError::Container)?;
        let failure = if container.is_alive() {
            None
        } else {
            container.death_cause().map(|e| e.as_message())
        };
        Ok(reported.with_supervision(self.restarts(), failure))
    }

    /// Stops the container (without waiting for it) and disarms the monitor.
    ///
    /// Idempotent; does nothing when the spawner was never started.
    pub async fn close(&self) {
        let mut slot = self.slot.lock().await;
        if slot.container.is_none() && slot.monitor.is_none() {
            return;
        }
        if let Some(container) = slot.container.take() {
            container.stop();
        }
        if let Some(monitor) = slot.monitor.take() {
            monitor.cancel();
        }
        slot.state = SpawnerState::Closed;
        drop(slot);

        info!(function = %self.fqn, restarts = self.restarts(), "spawner closed");
        self.publish_with(Event::new(EventKind::InstanceClosed).with_restarts(self.restarts()));
    }

    /// Number of restarts performed so far.
    pub fn restarts(&self) -> u64 {
        self.restarts.load(Ordering::SeqCst)
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> SpawnerState {
        self.slot.lock().await.state
    }

    /// Identity and configuration of the supervised instance.
    pub fn descriptor(&self) -> &InstanceDescriptor {
        &self.descriptor
    }

    /// Path of the code artifact handed to the factory.
    pub fn code_path(&self) -> &Path {
        &self.code_path
    }

    /// Active configuration.
    pub fn config(&self) -> &SpawnerConfig {
        &self.cfg
    }

    /// Event bus; subscribe to observe lifecycle events directly.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub(super) fn publish(&self, kind: EventKind) {
        self.publish_with(Event::new(kind));
    }

    /// Stamps instance and function on the event and publishes it.
    pub(super) fn publish_with(&self, ev: Event) {
        self.bus.publish(
            ev.with_instance(self.descriptor.instance_id())
                .with_function(Arc::clone(&self.fqn)),
        );
    }
}

impl Drop for Spawner {
    fn drop(&mut self) {
        let slot = self.slot.get_mut();
        if let Some(monitor) = slot.monitor.take() {
            monitor.cancel();
        }
        if let Some(container) = slot.container.take() {
            warn!(function = %self.fqn, "spawner dropped without close; stopping container");
            container.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::{Instant, sleep};

    use super::*;
    use crate::{
        BackoffPolicy, Container, ContainerError, JitterPolicy, MetricsRecord, RestartPolicy, Subscribe,
        testing::{MockContainer, MockFactory, RecordingSink},
    };

    const CODE_PATH: &str = "/opt/functions/exclaim.jar";

    fn every(period: Duration) -> SpawnerConfig {
        SpawnerConfig {
            metrics_interval: period,
            ..SpawnerConfig::default()
        }
    }

    fn spawner(
        factory: &Arc<MockFactory>,
        sink: Option<&Arc<RecordingSink>>,
        cfg: SpawnerConfig,
    ) -> Arc<Spawner> {
        Spawner::new(
            FunctionConfig::new("public", "default", "exclaim"),
            CODE_PATH,
            factory.clone() as FactoryRef,
            sink.map(|s| s.clone() as SinkRef),
            cfg,
        )
    }

    fn setup(cfg: SpawnerConfig) -> (Arc<MockFactory>, Arc<RecordingSink>, Arc<Spawner>) {
        let factory = MockFactory::new(MockContainer::new());
        let sink = Arc::new(RecordingSink::default());
        let s = spawner(&factory, Some(&sink), cfg);
        (factory, sink, s)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_start_reports_no_restarts() {
        let (factory, _sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");

        let status = s.status().await.expect("status");
        assert!(status.running);
        assert_eq!(status.num_restarts, 0);
        assert_eq!(status.failure_exception, None);
        assert_eq!(factory.container.starts(), 1);
        assert_eq!(s.state().await, SpawnerState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_dead_tick_restarts() {
        let (factory, _sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");
        factory.container.script_liveness([false, false, false]);

        sleep(Duration::from_millis(3500)).await;

        assert_eq!(s.restarts(), 3);
        assert_eq!(factory.container.starts(), 4);
        assert_eq!(factory.created(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alive_ticks_harvest_then_dead_tick_restarts() {
        let (factory, sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");
        factory.container.script_liveness([true, true, true, false]);

        sleep(Duration::from_millis(4500)).await;

        assert_eq!(sink.count(), 3);
        assert!(sink.functions().iter().all(|f| f == "public/default/exclaim"));
        assert_eq!(factory.container.starts(), 2);
        assert_eq!(s.restarts(), 1);
        assert_eq!(s.status().await.expect("status").num_restarts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_full_period() {
        let (_factory, sink, s) = setup(every(Duration::from_secs(10)));
        s.start().await.expect("start");

        sleep(Duration::from_millis(9900)).await;
        assert_eq!(sink.count(), 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_and_failed_harvests_are_skipped() {
        let (factory, sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");
        factory.container.script_harvests([
            Ok(None),
            Ok(Some(MetricsRecord::new())),
            Err(ContainerError::Metrics {
                error: "instance unreachable".into(),
            }),
        ]);

        sleep(Duration::from_millis(4500)).await;

        assert_eq!(sink.count(), 1);
        assert_eq!(s.restarts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_failure_keeps_monitor_running() {
        let (factory, _sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");
        factory.container.script_liveness([false, false]);
        factory.container.fail_next_starts(1);

        sleep(Duration::from_millis(2500)).await;

        assert_eq!(s.restarts(), 2);
        assert_eq!(factory.container.starts(), 2);
        assert!(s.status().await.expect("status").running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_policy_stops_restarting() {
        let cfg = SpawnerConfig {
            restart: RestartPolicy::UpTo { max: 1 },
            ..every(Duration::from_secs(1))
        };
        let (factory, _sink, s) = setup(cfg);
        s.start().await.expect("start");
        factory.container.script_liveness([false, false, false]);

        sleep(Duration::from_millis(3500)).await;

        assert_eq!(s.restarts(), 1);
        assert_eq!(factory.container.starts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_spaces_restarts() {
        let cfg = SpawnerConfig {
            backoff: BackoffPolicy {
                first: Duration::from_millis(1500),
                max: Duration::from_secs(10),
                factor: 1.0,
                jitter: JitterPolicy::None,
            },
            ..every(Duration::from_secs(1))
        };
        let (factory, _sink, s) = setup(cfg);
        s.start().await.expect("start");
        factory.container.script_liveness([false, false, false, false]);

        sleep(Duration::from_millis(4500)).await;

        assert_eq!(s.restarts(), 2);
        assert_eq!(factory.container.starts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sink_means_no_monitor() {
        let factory = MockFactory::new(MockContainer::new());
        let s = spawner(&factory, None, every(Duration::from_secs(1)));
        s.start().await.expect("start");
        factory.container.script_liveness([false]);

        sleep(Duration::from_secs(5)).await;

        assert_eq!(s.restarts(), 0);
        assert_eq!(factory.container.starts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_means_no_monitor() {
        let (factory, sink, s) = setup(every(Duration::ZERO));
        s.start().await.expect("start");

        sleep(Duration::from_secs(60)).await;

        assert_eq!(sink.count(), 0);
        assert_eq!(factory.container.starts(), 1);
    }

    #[tokio::test]
    async fn test_dead_container_reports_cause_and_keeps_fields() {
        let factory = MockFactory::new(MockContainer::new());
        let s = spawner(&factory, None, SpawnerConfig::default());
        s.start().await.expect("start");

        factory.container.set_status(FunctionStatus {
            num_processed: 42,
            num_user_exceptions: 2,
            latest_user_exceptions: vec!["bad input".into()],
            ..FunctionStatus::default()
        });
        factory.container.kill(ContainerError::Crashed {
            error: "out of memory".into(),
        });

        let status = s.status().await.expect("status");
        assert!(!status.running);
        assert_eq!(status.failure_exception.as_deref(), Some("out of memory"));
        assert_eq!(status.num_restarts, 0);
        assert_eq!(status.num_processed, 42);
        assert_eq!(status.num_user_exceptions, 2);
        assert_eq!(status.latest_user_exceptions, vec!["bad input".to_string()]);
    }

    #[tokio::test]
    async fn test_status_outside_running_state() {
        let factory = MockFactory::new(MockContainer::new());
        let s = spawner(&factory, None, SpawnerConfig::default());

        assert!(matches!(s.status().await, Err(SpawnError::NotStarted)));
        s.start().await.expect("start");
        s.close().await;
        assert!(matches!(s.status().await, Err(SpawnError::Closed)));
    }

    #[tokio::test]
    async fn test_close_before_start_is_noop() {
        let factory = MockFactory::new(MockContainer::new());
        let s = spawner(&factory, None, SpawnerConfig::default());

        s.close().await;
        assert_eq!(s.state().await, SpawnerState::Idle);
        assert_eq!(factory.container.stops(), 0);

        s.start().await.expect("start after no-op close");
        assert_eq!(s.state().await, SpawnerState::Running);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (factory, _sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");

        s.close().await;
        s.close().await;

        assert_eq!(factory.container.stops(), 1);
        assert_eq!(s.state().await, SpawnerState::Closed);
        assert!(matches!(s.start().await, Err(SpawnError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_disarms_monitor() {
        let (factory, sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");
        s.close().await;
        factory.container.script_liveness([false, false]);

        sleep(Duration::from_secs(3)).await;

        assert_eq!(sink.count(), 0);
        assert_eq!(s.restarts(), 0);
        assert_eq!(factory.container.starts(), 1);
    }

    #[tokio::test]
    async fn test_second_start_is_rejected() {
        let factory = MockFactory::new(MockContainer::new());
        let s = spawner(&factory, None, SpawnerConfig::default());
        s.start().await.expect("start");

        assert!(matches!(s.start().await, Err(SpawnError::AlreadyStarted)));
        assert_eq!(factory.created(), 1);
        assert_eq!(factory.container.starts(), 1);
    }

    #[tokio::test]
    async fn test_failed_start_can_be_retried() {
        let factory = MockFactory::new(MockContainer::new());
        let s = spawner(&factory, None, SpawnerConfig::default());

        factory.fail_next(1);
        let err = s.start().await.expect_err("factory failure");
        assert_eq!(err.as_label(), "spawn_factory");
        assert_eq!(s.state().await, SpawnerState::Idle);

        factory.container.fail_next_starts(1);
        let err = s.start().await.expect_err("launch failure");
        assert_eq!(err.as_label(), "spawn_launch");
        assert_eq!(s.state().await, SpawnerState::Idle);
        assert!(matches!(s.status().await, Err(SpawnError::NotStarted)));

        s.start().await.expect("third start");
        assert_eq!(s.state().await, SpawnerState::Running);
    }

    #[tokio::test]
    async fn test_join_without_container_returns() {
        let factory = MockFactory::new(MockContainer::new());
        let s = spawner(&factory, None, SpawnerConfig::default());
        s.join().await.expect("join");
    }

    #[tokio::test]
    async fn test_close_unblocks_join() {
        let factory = MockFactory::new(MockContainer::new());
        let s = spawner(&factory, None, SpawnerConfig::default());
        s.start().await.expect("start");

        let waiter = {
            let s = Arc::clone(&s);
            tokio::spawn(async move { s.join().await })
        };
        tokio::task::yield_now().await;
        s.close().await;

        waiter.await.expect("join task").expect("join");
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarts_reuse_descriptor() {
        let (factory, _sink, s) = setup(every(Duration::from_secs(1)));
        let instance = s.descriptor().instance_id().to_string();
        s.start().await.expect("start");
        factory.container.script_liveness([false, false]);

        sleep(Duration::from_millis(2500)).await;

        assert_eq!(s.restarts(), 2);
        assert_eq!(s.descriptor().instance_id(), instance);
        assert_eq!(factory.created(), 1);
        assert_eq!(
            factory.seen(),
            vec![(instance, std::path::PathBuf::from(CODE_PATH))]
        );
    }

    #[tokio::test]
    async fn test_drop_stops_container() {
        let factory = MockFactory::new(MockContainer::new());
        let s = spawner(&factory, None, SpawnerConfig::default());
        s.start().await.expect("start");

        drop(s);
        assert_eq!(factory.container.stops(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_backoff_still_counts_restarts() {
        let cfg = SpawnerConfig {
            backoff: BackoffPolicy {
                first: Duration::MAX,
                max: Duration::MAX,
                factor: 2.0,
                jitter: JitterPolicy::None,
            },
            ..every(Duration::from_secs(1))
        };
        let (factory, _sink, s) = setup(cfg);
        s.start().await.expect("start");
        factory.container.script_liveness([false, false, false]);

        sleep(Duration::from_millis(3500)).await;

        assert_eq!(s.restarts(), 1);
        assert_eq!(factory.container.starts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_waits_for_restart_in_progress() {
        let (factory, _sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");
        let armed = Instant::now();
        factory.container.slow_starts(Duration::from_millis(500));
        factory.container.script_liveness([false]);

        sleep(Duration::from_millis(1200)).await;
        assert_eq!(factory.container.starts(), 1);

        s.close().await;

        assert!(Instant::now() >= armed + Duration::from_millis(1500));
        assert_eq!(s.restarts(), 1);
        assert_eq!(factory.container.starts(), 2);
        assert_eq!(factory.container.stops(), 1);
        assert!(!factory.container.is_alive());
        assert_eq!(s.state().await, SpawnerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_and_join_during_restart() {
        let (factory, _sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");
        factory.container.slow_starts(Duration::from_millis(500));
        factory.container.kill(ContainerError::Crashed {
            error: "out of memory".into(),
        });

        sleep(Duration::from_millis(1200)).await;
        let waiter = {
            let s = Arc::clone(&s);
            tokio::spawn(async move { s.join().await })
        };
        let status = s.status().await.expect("status");

        match (status.running, status.num_restarts) {
            (false, 0) => assert_eq!(status.failure_exception.as_deref(), Some("out of memory")),
            (true, 1) => assert_eq!(status.failure_exception, None),
            other => panic!("status mixes states around the restart: {other:?}"),
        }
        assert!(!waiter.is_finished());

        s.close().await;
        waiter.await.expect("join task").expect("join");
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_harvests_each_reach_sink_once() {
        let (factory, sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");
        factory.container.slow_harvests(Duration::from_millis(1500));
        factory.container.script_harvests((1..=6u32).map(|n| {
            let mut rec = MetricsRecord::new();
            rec.record("seq", f64::from(n));
            Ok(Some(rec))
        }));

        sleep(Duration::from_millis(3200)).await;
        assert_eq!(sink.values("seq"), vec![1.0]);

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(sink.values("seq"), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_drops_harvest_in_flight() {
        let (factory, sink, s) = setup(every(Duration::from_secs(1)));
        s.start().await.expect("start");
        factory.container.slow_harvests(Duration::from_millis(500));

        sleep(Duration::from_millis(1100)).await;
        s.close().await;
        sleep(Duration::from_secs(1)).await;

        assert_eq!(sink.count(), 0);
        assert_eq!(s.state().await, SpawnerState::Closed);
    }

    #[derive(Default)]
    struct Recorder {
        kinds: tokio::sync::Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.kinds.lock().await.push(ev.kind);
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_observe_restart() {
        let factory = MockFactory::new(MockContainer::new());
        let recorder = Arc::new(Recorder::default());
        let s = Spawner::builder(
            FunctionConfig::new("public", "default", "exclaim"),
            CODE_PATH,
            factory.clone() as FactoryRef,
        )
        .with_config(every(Duration::from_secs(1)))
        .with_metrics_sink(Arc::new(RecordingSink::default()))
        .with_subscribers(vec![recorder.clone() as Arc<dyn Subscribe>])
        .build();

        s.start().await.expect("start");
        factory.container.script_liveness([false]);
        sleep(Duration::from_millis(1500)).await;

        let kinds = recorder.kinds.lock().await.clone();
        assert_eq!(
            kinds,
            vec![
                EventKind::InstanceStarting,
                EventKind::InstanceStarted,
                EventKind::MonitorArmed,
                EventKind::ContainerDied,
                EventKind::InstanceRestarted,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_death_event_carries_cause() {
        let (factory, _sink, s) = setup(every(Duration::from_secs(1)));
        let mut rx = s.bus().subscribe();
        s.start().await.expect("start");
        factory.container.kill(ContainerError::Crashed {
            error: "segfault".into(),
        });

        let died = loop {
            let ev = rx.recv().await.expect("event");
            if ev.kind == EventKind::ContainerDied {
                break ev;
            }
        };
        assert_eq!(died.reason.as_deref(), Some("instance crashed: segfault"));
        assert_eq!(died.function.as_deref(), Some("public/default/exclaim"));
        assert_eq!(died.instance.as_deref(), Some(s.descriptor().instance_id()));
    }
}
