//! # Metrics records.
//!
//! A [`MetricsRecord`] maps metric names to a [`DataDigest`]. Containers return
//! one per harvest and reset their accumulators; the spawner never merges
//! records, it forwards each one exactly once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Summary of the samples of one metric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataDigest {
    /// Number of samples.
    pub count: u64,
    /// Sum of the samples.
    pub sum: f64,
    /// Largest sample.
    pub max: f64,
    /// Smallest sample.
    pub min: f64,
}

impl DataDigest {
    /// Digest of a single sample.
    pub fn single(value: f64) -> Self {
        Self {
            count: 1,
            sum: value,
            max: value,
            min: value,
        }
    }

    /// Folds one more sample into the digest.
    pub fn record(&mut self, value: f64) {
        if self.count == 0 {
            *self = Self::single(value);
            return;
        }
        self.count += 1;
        self.sum += value;
        self.max = self.max.max(value);
        self.min = self.min.min(value);
    }

    /// Mean of the samples, `None` when there are none.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Metrics harvested from an instance in one collection cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Digest per metric name.
    pub metrics: BTreeMap<String, DataDigest>,
}

impl MetricsRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with one more metric.
    pub fn with_metric(mut self, name: impl Into<String>, digest: DataDigest) -> Self {
        self.metrics.insert(name.into(), digest);
        self
    }

    /// Records a sample under `name`.
    pub fn record(&mut self, name: impl Into<String>, value: f64) {
        self.metrics.entry(name.into()).or_default().record(value);
    }

    /// Returns the digest of a metric.
    pub fn get(&self, name: &str) -> Option<&DataDigest> {
        self.metrics.get(name)
    }

    /// True if the record holds no metric.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Number of metrics in the record.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }
}
