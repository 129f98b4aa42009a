//! # Harvested metrics and their destination.
//!
//! - [`MetricsRecord`] - metrics accumulated by an instance since the previous harvest
//! - [`DataDigest`] - count/sum/min/max summary of one metric
//! - [`MetricsSink`] - where the monitor forwards harvested records

mod record;
mod sink;

pub use record::{DataDigest, MetricsRecord};
pub use sink::{MetricsSink, SinkRef};
