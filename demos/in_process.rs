//! # Example: in_process
//!
//! Supervises a function that runs as a tokio task inside the current process.
//!
//! The function "processes" one item every 100ms and crashes after every
//! fifth item. The spawner harvests its metrics every 300ms, notices the
//! crash on the next tick and restarts the same container in place.
//!
//! ## Flow
//! ```text
//! Spawner::start()
//!   ├─► InProcessFactory::create_container()
//!   ├─► InProcessContainer::start()  (spawns the worker task)
//!   └─► monitor armed (300ms)
//!
//! tick ─► alive ─► take_metrics() ─► PrintingSink
//! tick ─► dead  ─► ContainerDied ─► start() again ─► InstanceRestarted
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example in_process --features logging
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use fnvisor::{
    Container, ContainerError, ContainerFactory, ContainerRef, FactoryRef, FunctionConfig,
    FunctionStatus, InstanceDescriptor, LogWriter, MetricsRecord, MetricsSink, SinkRef, Spawner,
    SpawnerConfig, Subscribe,
};

const CRASH_EVERY: u64 = 5;

/// Worker task state shared with the container.
#[derive(Default)]
struct Counters {
    processed: AtomicU64,
    since_harvest: AtomicU64,
}

struct InProcessContainer {
    instance_id: String,
    counters: Arc<Counters>,
    token: Mutex<CancellationToken>,
    death: Arc<Mutex<Option<ContainerError>>>,
    running: watch::Sender<bool>,
}

impl InProcessContainer {
    fn new(instance_id: String) -> Self {
        Self {
            instance_id,
            counters: Arc::new(Counters::default()),
            token: Mutex::new(CancellationToken::new()),
            death: Arc::new(Mutex::new(None)),
            running: watch::channel(false).0,
        }
    }
}

#[async_trait]
impl Container for InProcessContainer {
    async fn start(&self) -> Result<(), ContainerError> {
        let token = CancellationToken::new();
        *self.token.lock().unwrap() = token.clone();
        *self.death.lock().unwrap() = None;
        self.running.send_replace(true);

        let counters = Arc::clone(&self.counters);
        let death = Arc::clone(&self.death);
        let running = self.running.clone();
        tokio::spawn(async move {
            let mut done = 0u64;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(Duration::from_millis(100)) => {}
                }
                done += 1;
                counters.processed.fetch_add(1, Ordering::Relaxed);
                counters.since_harvest.fetch_add(1, Ordering::Relaxed);
                if done == CRASH_EVERY {
                    *death.lock().unwrap() = Some(ContainerError::Crashed {
                        error: format!("simulated crash after {done} items"),
                    });
                    break;
                }
            }
            running.send_replace(false);
        });
        Ok(())
    }

    fn stop(&self) {
        self.token.lock().unwrap().cancel();
    }

    async fn join(&self) -> Result<(), ContainerError> {
        let mut rx = self.running.subscribe();
        while *rx.borrow_and_update() {
            rx.changed().await.map_err(|e| ContainerError::Join {
                error: e.to_string(),
            })?;
        }
        Ok(())
    }

    fn is_alive(&self) -> bool {
        *self.running.borrow()
    }

    fn death_cause(&self) -> Option<ContainerError> {
        self.death.lock().unwrap().clone()
    }

    async fn take_metrics(&self) -> Result<Option<MetricsRecord>, ContainerError> {
        let n = self.counters.since_harvest.swap(0, Ordering::Relaxed);
        if n == 0 {
            return Ok(None);
        }
        let mut rec = MetricsRecord::new();
        rec.record("processed_items", n as f64);
        Ok(Some(rec))
    }

    async fn function_status(&self) -> Result<FunctionStatus, ContainerError> {
        Ok(FunctionStatus {
            running: self.is_alive(),
            num_processed: self.counters.processed.load(Ordering::Relaxed),
            num_successfully_processed: self.counters.processed.load(Ordering::Relaxed),
            instance_id: Some(self.instance_id.clone()),
            ..FunctionStatus::default()
        })
    }
}

struct InProcessFactory;

impl ContainerFactory for InProcessFactory {
    fn create_container(
        &self,
        descriptor: &InstanceDescriptor,
        code_path: &Path,
    ) -> Result<ContainerRef, ContainerError> {
        println!(
            "[factory] building {} from {}",
            descriptor.fully_qualified_name(),
            code_path.display()
        );
        Ok(Arc::new(InProcessContainer::new(
            descriptor.instance_id().to_string(),
        )))
    }
}

struct PrintingSink;

#[async_trait]
impl MetricsSink for PrintingSink {
    async fn process_record(&self, record: MetricsRecord, function: &FunctionConfig) {
        let items = record
            .get("processed_items")
            .and_then(|d| d.mean())
            .unwrap_or_default();
        println!("[sink] {function}: {items} items since last harvest");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut cfg = SpawnerConfig::default();
    cfg.metrics_interval = Duration::from_millis(300);

    let factory: FactoryRef = Arc::new(InProcessFactory);
    let sink: SinkRef = Arc::new(PrintingSink);
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    let spawner = Spawner::builder(
        FunctionConfig::new("public", "default", "counter"),
        "/opt/functions/counter.wasm",
        factory,
    )
    .with_config(cfg)
    .with_metrics_sink(sink)
    .with_subscribers(subs)
    .build();

    spawner.start().await?;
    tokio::time::sleep(Duration::from_secs(3)).await;

    let status = spawner.status().await?;
    println!(
        "[main] running={} processed={} restarts={}",
        status.running, status.num_processed, status.num_restarts
    );

    spawner.close().await;
    spawner.join().await?;
    Ok(())
}
