use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use tokio::sync::{Mutex, broadcast::error::RecvError};
use tokio_util::sync::CancellationToken;

use super::monitor::RestartGate;
use super::spawner::{Slot, Spawner, SpawnerState};
use crate::{
    config::SpawnerConfig,
    container::FactoryRef,
    events::Bus,
    instance::{Assignment, FunctionConfig, InstanceDescriptor},
    metrics::SinkRef,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for a [`Spawner`] with optional sink, subscribers and identity.
pub struct SpawnerBuilder {
    function_config: Arc<FunctionConfig>,
    code_path: PathBuf,
    factory: FactoryRef,
    cfg: SpawnerConfig,
    sink: Option<SinkRef>,
    assignment: Option<Assignment>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SpawnerBuilder {
    /// Creates a builder with the default configuration.
    pub fn new(
        function_config: impl Into<Arc<FunctionConfig>>,
        code_path: impl Into<PathBuf>,
        factory: FactoryRef,
    ) -> Self {
        Self {
            function_config: function_config.into(),
            code_path: code_path.into(),
            factory,
            cfg: SpawnerConfig::default(),
            sink: None,
            assignment: None,
            subscribers: Vec::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: SpawnerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the metrics sink. Without one the monitor is never armed.
    pub fn with_metrics_sink(mut self, sink: SinkRef) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Uses explicit identifiers instead of generated ones.
    ///
    /// The assignment's function configuration replaces the one given to [`SpawnerBuilder::new`].
    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.assignment = Some(assignment);
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive lifecycle events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the spawner.
    ///
    /// Generates the instance identifiers unless an assignment was given. With
    /// subscribers, this spawns their workers and must run inside a tokio runtime.
    pub fn build(self) -> Arc<Spawner> {
        let assignment = self
            .assignment
            .unwrap_or_else(|| Assignment::generate(self.function_config));
        let descriptor = InstanceDescriptor::new(assignment, self.cfg.max_buffered_items);
        let fqn: Arc<str> = descriptor.fully_qualified_name().into();

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener = (!self.subscribers.is_empty()).then(|| {
            let subs = SubscriberSet::new(self.subscribers, bus.clone());
            spawn_listener(&bus, subs)
        });

        Arc::new(Spawner {
            descriptor,
            code_path: self.code_path,
            factory: self.factory,
            sink: self.sink,
            cfg: self.cfg,
            bus,
            slot: Mutex::new(Slot {
                state: SpawnerState::Idle,
                container: None,
                monitor: None,
                gate: RestartGate::default(),
            }),
            restarts: AtomicU64::new(0),
            fqn,
            _listener: listener,
        })
    }
}

/// Forwards bus events to the subscriber set until the spawner is dropped.
fn spawn_listener(bus: &Bus, subs: SubscriberSet) -> tokio_util::sync::DropGuard {
    let token = CancellationToken::new();
    let stop = token.clone();
    let mut rx = bus.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => subs.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            subs.emit(&ev);
        }
        subs.shutdown().await;
    });
    token.drop_guard()
}
