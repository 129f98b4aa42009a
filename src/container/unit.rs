//! # Container contract.
//!
//! A [`Container`] is started once by the spawner and started again **in
//! place** (same object) each time the monitor restarts it. Implementations
//! must therefore accept `start` after death.
//!
//! ## Contract
//! - `start` fails with [`ContainerError::Launch`] when the instance cannot be launched.
//! - `stop` must not block; shutdown completes in the background.
//! - `join` completes when the instance terminates (after `stop` or on its own).
//! - `death_cause` is meaningful only while `is_alive` is `false`.
//! - `take_metrics` is a destructive read: it returns what accumulated since the
//!   previous call and resets the accumulators. `Ok(None)` means nothing to report.
//!
//! # Example (skeleton)
//! ```rust
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use async_trait::async_trait;
//! use fnvisor::{Container, ContainerError, FunctionStatus, MetricsRecord};
//!
//! struct Noop { alive: AtomicBool }
//!
//! #[async_trait]
//! impl Container for Noop {
//!     async fn start(&self) -> Result<(), ContainerError> {
//!         self.alive.store(true, Ordering::SeqCst);
//!         Ok(())
//!     }
//!     fn stop(&self) { self.alive.store(false, Ordering::SeqCst); }
//!     async fn join(&self) -> Result<(), ContainerError> { Ok(()) }
//!     fn is_alive(&self) -> bool { self.alive.load(Ordering::SeqCst) }
//!     fn death_cause(&self) -> Option<ContainerError> { None }
//!     async fn take_metrics(&self) -> Result<Option<MetricsRecord>, ContainerError> { Ok(None) }
//!     async fn function_status(&self) -> Result<FunctionStatus, ContainerError> {
//!         Ok(FunctionStatus::default())
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ContainerError;
use crate::metrics::MetricsRecord;
use crate::status::FunctionStatus;

/// # Isolated execution unit hosting one function instance.
#[async_trait]
pub trait Container: Send + Sync + 'static {
    /// Launches (or relaunches) the instance.
    async fn start(&self) -> Result<(), ContainerError>;

    /// Requests the instance to stop. Returns immediately.
    fn stop(&self);

    /// Waits until the instance terminates.
    async fn join(&self) -> Result<(), ContainerError>;

    /// Returns `true` while the instance is running.
    fn is_alive(&self) -> bool;

    /// Returns why the instance died, if it did.
    fn death_cause(&self) -> Option<ContainerError>;

    /// Returns the metrics accumulated since the previous call and resets them.
    async fn take_metrics(&self) -> Result<Option<MetricsRecord>, ContainerError>;

    /// Returns the instance's own status report.
    async fn function_status(&self) -> Result<FunctionStatus, ContainerError>;
}

/// Shared handle to a container.
pub type ContainerRef = Arc<dyn Container>;
