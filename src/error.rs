//! Error types used by the spawner and by container implementations.
//!
//! This module defines two main error enums:
//!
//! - [`SpawnError`] — errors raised by the [`Spawner`](crate::Spawner) itself.
//! - [`ContainerError`] — errors raised by a [`Container`](crate::Container) or its factory.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

/// # Errors produced by containers and container factories.
///
/// Container implementations report failures through this type. It is `Clone`
/// because a death cause is observed repeatedly (logs, status reports) while the
/// container stays dead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// The container could not be created or launched.
    #[error("launch failed: {error}")]
    Launch {
        /// The underlying error message.
        error: String,
    },

    /// The running instance terminated abnormally.
    #[error("instance crashed: {error}")]
    Crashed {
        /// The underlying error message.
        error: String,
    },

    /// Metrics could not be collected from the instance.
    #[error("metrics collection failed: {error}")]
    Metrics {
        /// The underlying error message.
        error: String,
    },

    /// The instance did not answer a status request.
    #[error("status request failed: {error}")]
    Status {
        /// The underlying error message.
        error: String,
    },

    /// Waiting for instance termination failed.
    #[error("join failed: {error}")]
    Join {
        /// The underlying error message.
        error: String,
    },
}

impl ContainerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fnvisor::ContainerError;
    ///
    /// let err = ContainerError::Crashed { error: "segfault".into() };
    /// assert_eq!(err.as_label(), "container_crashed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ContainerError::Launch { .. } => "container_launch",
            ContainerError::Crashed { .. } => "container_crashed",
            ContainerError::Metrics { .. } => "container_metrics",
            ContainerError::Status { .. } => "container_status",
            ContainerError::Join { .. } => "container_join",
        }
    }

    /// Returns the bare error message without the variant prefix.
    ///
    /// This is the text surfaced as the failure message of a status report.
    pub fn as_message(&self) -> String {
        match self {
            ContainerError::Launch { error }
            | ContainerError::Crashed { error }
            | ContainerError::Metrics { error }
            | ContainerError::Status { error }
            | ContainerError::Join { error } => error.clone(),
        }
    }
}

/// # Errors produced by the spawner.
///
/// These represent failures of the supervision layer, either propagated from
/// the container it manages or caused by calling operations out of order.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SpawnError {
    /// The container factory refused to build a container.
    #[error("container factory failed: {0}")]
    Factory(#[source] ContainerError),

    /// The container was built but its first start failed.
    #[error("container failed to start: {0}")]
    Launch(#[source] ContainerError),

    /// A container operation failed while serving a caller request.
    #[error("container operation failed: {0}")]
    Container(#[source] ContainerError),

    /// The operation needs a container, but `start()` has not succeeded yet.
    #[error("function instance is not started")]
    NotStarted,

    /// `start()` was called on a spawner that already runs a container.
    #[error("function instance is already started")]
    AlreadyStarted,

    /// The spawner has been closed; it cannot be started again.
    #[error("spawner is closed")]
    Closed,
}

impl SpawnError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fnvisor::SpawnError;
    ///
    /// assert_eq!(SpawnError::NotStarted.as_label(), "spawn_not_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SpawnError::Factory(_) => "spawn_factory",
            SpawnError::Launch(_) => "spawn_launch",
            SpawnError::Container(_) => "spawn_container",
            SpawnError::NotStarted => "spawn_not_started",
            SpawnError::AlreadyStarted => "spawn_already_started",
            SpawnError::Closed => "spawn_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SpawnError::Factory(e) => format!("factory: {}", e.as_message()),
            SpawnError::Launch(e) => format!("launch: {}", e.as_message()),
            SpawnError::Container(e) => format!("container: {}", e.as_message()),
            SpawnError::NotStarted => "not started".to_string(),
            SpawnError::AlreadyStarted => "already started".to_string(),
            SpawnError::Closed => "closed".to_string(),
        }
    }

    /// Returns the container error behind this failure, if any.
    pub fn container_error(&self) -> Option<&ContainerError> {
        match self {
            SpawnError::Factory(e) | SpawnError::Launch(e) | SpawnError::Container(e) => Some(e),
            _ => None,
        }
    }
}
