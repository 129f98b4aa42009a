//! # Metrics sink contract.
//!
//! [`MetricsSink`] receives every non-empty record the monitor harvests,
//! together with the configuration of the function it came from. Delivery is
//! fire-and-forget: the spawner spawns the call and never looks at its outcome,
//! so failures inside the sink are the sink's own concern.
//!
//! ## Example (skeleton)
//! ```rust
//! use async_trait::async_trait;
//! use fnvisor::{FunctionConfig, MetricsRecord, MetricsSink};
//!
//! struct Stdout;
//!
//! #[async_trait]
//! impl MetricsSink for Stdout {
//!     async fn process_record(&self, record: MetricsRecord, function: &FunctionConfig) {
//!         println!("{function}: {} metrics", record.len());
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::instance::FunctionConfig;
use crate::metrics::MetricsRecord;

/// Destination of harvested metrics.
#[async_trait]
pub trait MetricsSink: Send + Sync + 'static {
    /// Accepts one record harvested from an instance of `function`.
    async fn process_record(&self, record: MetricsRecord, function: &FunctionConfig);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a metrics sink.
pub type SinkRef = Arc<dyn MetricsSink>;
