//! # Status records.
//!
//! [`FunctionStatus`] is what a container reports about its instance. The
//! spawner overlays two supervision fields on top of it before returning it to
//! callers:
//!
//! ```text
//! container.function_status() ──► FunctionStatus { running, num_processed, .. }
//!                                        │
//!                         with_supervision(restarts, death_cause)
//!                                        ▼
//!                    num_restarts = restarts              (always)
//!                    failure_exception = cause message    (only if dead)
//!                    every other field untouched
//! ```

use serde::{Deserialize, Serialize};

/// Status of one function instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionStatus {
    /// Whether the instance is running.
    pub running: bool,
    /// Message of the error that killed the instance, if it is dead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_exception: Option<String>,
    /// Number of restarts performed by the spawner.
    pub num_restarts: u64,
    /// Items received by the instance.
    pub num_processed: u64,
    /// Items processed without error.
    pub num_successfully_processed: u64,
    /// Errors raised by user code.
    pub num_user_exceptions: u64,
    /// Errors raised by the instance runtime.
    pub num_system_exceptions: u64,
    /// Items that timed out.
    pub num_timeouts: u64,
    /// Most recent user errors, newest last.
    #[serde(default)]
    pub latest_user_exceptions: Vec<String>,
    /// Most recent runtime errors, newest last.
    #[serde(default)]
    pub latest_system_exceptions: Vec<String>,
    /// Average processing latency in milliseconds.
    pub average_latency_ms: f64,
    /// Unix timestamp (ms) of the last invocation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_invocation_time: Option<u64>,
    /// Identifier of the instance that produced the report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

impl FunctionStatus {
    /// Overlays the spawner's restart count and failure message.
    ///
    /// `failure` replaces the container's own failure message only when present.
    #[must_use]
    pub fn with_supervision(mut self, restarts: u64, failure: Option<String>) -> Self {
        self.num_restarts = restarts;
        if let Some(msg) = failure {
            self.failure_exception = Some(msg);
        }
        self
    }
}
