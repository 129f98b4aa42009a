//! # fnvisor
//!
//! **fnvisor** supervises one running instance of a user-defined function.
//!
//! It builds the instance's container, starts it, periodically harvests its
//! metrics, restarts it in place when it dies, and answers status requests with
//! the container's own report plus the restart count and last failure.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   FunctionConfig + code path
//!             │
//!             ▼
//! ┌────────────────────────────────────────────────────────────────┐
//! │  Spawner                                                       │
//! │  - InstanceDescriptor (ids generated once, reused on restart)  │
//! │  - Mutex<Slot>: container handle, monitor handle, restart gate │
//! │  - restart counter (atomic, monotonic)                         │
//! │  - Bus (broadcast events)                                      │
//! └──────┬──────────────────────┬───────────────────────┬──────────┘
//!        │ start()              │ every interval        │ status()
//!        ▼                      ▼                       ▼
//! ContainerFactory        Monitor task            Container::function_status()
//!  └─► Container            ├─ alive: take_metrics() ──► MetricsSink
//!        ▲                  └─ dead:  container.start()   (same object)
//!        └──────────────────────────┘
//!
//! Spawner / Monitor ── publish(Event) ──► Bus ──► SubscriberSet ──► Subscribe::on_event
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──start()──► Running ──close()──► Closed
//!
//! monitor tick (Running, sink configured, interval > 0):
//!   ├─► container alive? ──yes──► spawn take_metrics() → sink.process_record()
//!   └─► no ──► ContainerDied
//!              ├─ RestartPolicy/BackoffPolicy say wait or stop ─► RestartSkipped
//!              └─ container.start(); restarts += 1 ─► InstanceRestarted | RestartFailed
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Supervision**   | Start, monitor, restart, report and close one instance.      | [`Spawner`], [`SpawnerBuilder`]             |
//! | **Collaborators** | Contracts the spawner drives.                                | [`Container`], [`ContainerFactory`], [`MetricsSink`] |
//! | **Identity**      | Immutable instance identity and configuration.               | [`InstanceDescriptor`], [`FunctionConfig`]  |
//! | **Status**        | Container report with supervision overlay.                   | [`FunctionStatus`]                          |
//! | **Policies**      | Optional limits and spacing for restarts.                    | [`RestartPolicy`], [`BackoffPolicy`]        |
//! | **Events**        | Lifecycle events and subscriber fan-out.                     | [`Event`], [`Subscribe`]                    |
//! | **Errors**        | Typed errors for the spawner and containers.                 | [`SpawnError`], [`ContainerError`]          |
//! | **Configuration** | Timing and policy settings.                                  | [`SpawnerConfig`]                           |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that writes events through `tracing`.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use fnvisor::{FactoryRef, FunctionConfig, SinkRef, Spawner, SpawnerConfig};
//!
//! async fn supervise(factory: FactoryRef, sink: SinkRef) -> Result<(), fnvisor::SpawnError> {
//!     let mut cfg = SpawnerConfig::default();
//!     cfg.metrics_interval = Duration::from_secs(10);
//!
//!     let spawner = Spawner::new(
//!         FunctionConfig::new("public", "default", "exclaim"),
//!         "/opt/functions/exclaim.jar",
//!         factory,
//!         Some(sink),
//!         cfg,
//!     );
//!
//!     spawner.start().await?;
//!     let status = spawner.status().await?;
//!     assert_eq!(status.num_restarts, 0);
//!
//!     spawner.close().await;
//!     Ok(())
//! }
//! ```
mod config;
mod container;
mod core;
mod error;
mod events;
mod instance;
mod metrics;
mod policies;
mod status;
mod subscribers;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use config::SpawnerConfig;
pub use container::{Container, ContainerFactory, ContainerRef, FactoryRef};
pub use self::core::{Spawner, SpawnerBuilder, SpawnerState};
pub use error::{ContainerError, SpawnError};
pub use events::{Bus, Event, EventKind};
pub use instance::{Assignment, FunctionConfig, InstanceDescriptor};
pub use metrics::{DataDigest, MetricsRecord, MetricsSink, SinkRef};
pub use policies::{BackoffPolicy, JitterPolicy, RestartPolicy};
pub use status::FunctionStatus;
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a tracing-backed logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
