//! Scripted collaborators for spawner tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::{
    Container, ContainerError, ContainerFactory, ContainerRef, FunctionConfig, FunctionStatus,
    InstanceDescriptor, MetricsRecord, MetricsSink,
};

type Harvest = Result<Option<MetricsRecord>, ContainerError>;

/// Container whose liveness, start failures and harvests are scripted.
pub(crate) struct MockContainer {
    alive: AtomicBool,
    liveness: Mutex<VecDeque<bool>>,
    failing_starts: AtomicU32,
    starts: AtomicU32,
    stops: AtomicU32,
    death: Mutex<Option<ContainerError>>,
    harvests: Mutex<VecDeque<Harvest>>,
    status: Mutex<FunctionStatus>,
    terminated: watch::Sender<bool>,
    start_delay: Mutex<Duration>,
    harvest_delay: Mutex<Duration>,
}

impl MockContainer {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            alive: AtomicBool::new(false),
            liveness: Mutex::new(VecDeque::new()),
            failing_starts: AtomicU32::new(0),
            starts: AtomicU32::new(0),
            stops: AtomicU32::new(0),
            death: Mutex::new(None),
            harvests: Mutex::new(VecDeque::new()),
            status: Mutex::new(FunctionStatus::default()),
            terminated: watch::channel(false).0,
            start_delay: Mutex::new(Duration::ZERO),
            harvest_delay: Mutex::new(Duration::ZERO),
        })
    }

    /// Answers of the next `is_alive` calls; afterwards the real flag is used.
    pub(crate) fn script_liveness(&self, answers: impl IntoIterator<Item = bool>) {
        self.liveness.lock().unwrap().extend(answers);
    }

    /// Results of the next `take_metrics` calls; afterwards a one-metric record.
    pub(crate) fn script_harvests(&self, results: impl IntoIterator<Item = Harvest>) {
        self.harvests.lock().unwrap().extend(results);
    }

    /// Makes the next `n` starts fail.
    pub(crate) fn fail_next_starts(&self, n: u32) {
        self.failing_starts.store(n, Ordering::SeqCst);
    }

    /// Makes every following `start` take `delay`.
    pub(crate) fn slow_starts(&self, delay: Duration) {
        *self.start_delay.lock().unwrap() = delay;
    }

    /// Makes every following `take_metrics` take `delay`.
    pub(crate) fn slow_harvests(&self, delay: Duration) {
        *self.harvest_delay.lock().unwrap() = delay;
    }

    pub(crate) fn set_status(&self, status: FunctionStatus) {
        *self.status.lock().unwrap() = status;
    }

    /// Kills the instance with the given cause.
    pub(crate) fn kill(&self, cause: ContainerError) {
        *self.death.lock().unwrap() = Some(cause);
        self.alive.store(false, Ordering::SeqCst);
    }

    pub(crate) fn starts(&self) -> u32 {
        self.starts.load(Ordering::SeqCst)
    }

    pub(crate) fn stops(&self) -> u32 {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Container for MockContainer {
    async fn start(&self) -> Result<(), ContainerError> {
        let delay = *self.start_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let failing = self.failing_starts.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_starts.store(failing - 1, Ordering::SeqCst);
            return Err(ContainerError::Launch {
                error: "exec format error".into(),
            });
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.death.lock().unwrap() = None;
        self.alive.store(true, Ordering::SeqCst);
        self.terminated.send_replace(false);
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.alive.store(false, Ordering::SeqCst);
        self.terminated.send_replace(true);
    }

    async fn join(&self) -> Result<(), ContainerError> {
        let mut rx = self.terminated.subscribe();
        while !*rx.borrow_and_update() {
            rx.changed().await.map_err(|e| ContainerError::Join {
                error: e.to_string(),
            })?;
        }
        Ok(())
    }

    fn is_alive(&self) -> bool {
        match self.liveness.lock().unwrap().pop_front() {
            Some(answer) => answer,
            None => self.alive.load(Ordering::SeqCst),
        }
    }

    fn death_cause(&self) -> Option<ContainerError> {
        self.death.lock().unwrap().clone()
    }

    async fn take_metrics(&self) -> Result<Option<MetricsRecord>, ContainerError> {
        let scripted = self.harvests.lock().unwrap().pop_front();
        let delay = *self.harvest_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match scripted {
            Some(scripted) => scripted,
            None => {
                let mut rec = MetricsRecord::new();
                rec.record("processed", 1.0);
                Ok(Some(rec))
            }
        }
    }

    async fn function_status(&self) -> Result<FunctionStatus, ContainerError> {
        let mut status = self.status.lock().unwrap().clone();
        status.running = self.alive.load(Ordering::SeqCst);
        Ok(status)
    }
}

/// Factory handing out one shared [`MockContainer`].
pub(crate) struct MockFactory {
    pub(crate) container: Arc<MockContainer>,
    failing: AtomicU32,
    created: AtomicU32,
    seen: Mutex<Vec<(String, PathBuf)>>,
}

impl MockFactory {
    pub(crate) fn new(container: Arc<MockContainer>) -> Arc<Self> {
        Arc::new(Self {
            container,
            failing: AtomicU32::new(0),
            created: AtomicU32::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn fail_next(&self, n: u32) {
        self.failing.store(n, Ordering::SeqCst);
    }

    pub(crate) fn created(&self) -> u32 {
        self.created.load(Ordering::SeqCst)
    }

    /// Instance ids and code paths the factory was called with.
    pub(crate) fn seen(&self) -> Vec<(String, PathBuf)> {
        self.seen.lock().unwrap().clone()
    }
}

impl ContainerFactory for MockFactory {
    fn create_container(
        &self,
        descriptor: &InstanceDescriptor,
        code_path: &Path,
    ) -> Result<ContainerRef, ContainerError> {
        let failing = self.failing.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing.store(failing - 1, Ordering::SeqCst);
            return Err(ContainerError::Launch {
                error: "no runtime available".into(),
            });
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((descriptor.instance_id().to_string(), code_path.to_path_buf()));
        Ok(self.container.clone() as ContainerRef)
    }
}

/// Sink keeping every record it receives.
#[derive(Default)]
pub(crate) struct RecordingSink {
    records: Mutex<Vec<(String, MetricsRecord)>>,
}

impl RecordingSink {
    pub(crate) fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Mean of metric `name` in every record received, in arrival order.
    pub(crate) fn values(&self, name: &str) -> Vec<f64> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(_, rec)| rec.get(name).and_then(|d| d.mean()))
            .collect()
    }

    pub(crate) fn functions(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(f, _)| f.clone())
            .collect()
    }
}

#[async_trait]
impl MetricsSink for RecordingSink {
    async fn process_record(&self, record: MetricsRecord, function: &FunctionConfig) {
        self.records
            .lock()
            .unwrap()
            .push((function.fully_qualified_name(), record));
    }
}
