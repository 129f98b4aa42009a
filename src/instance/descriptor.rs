//! # Instance descriptor.
//!
//! [`InstanceDescriptor`] bundles the identity of one running instance with
//! the configuration it runs. It is built once, by a single constructor, when
//! the spawner is created and never changes afterwards: restarts reuse it.
//!
//! ## Rules
//! - Identifiers come from an [`Assignment`]; [`Assignment::generate`] draws them as random UUIDs.
//! - Identifiers are opaque strings to the spawner.

use std::sync::Arc;

use uuid::Uuid;

use super::function::FunctionConfig;

/// The identifiers of one function assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    function_config: Arc<FunctionConfig>,
    function_id: String,
    function_version: String,
    instance_id: String,
}

impl Assignment {
    /// Creates an assignment with explicit identifiers.
    pub fn new(
        function_config: impl Into<Arc<FunctionConfig>>,
        function_id: impl Into<String>,
        function_version: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            function_config: function_config.into(),
            function_id: function_id.into(),
            function_version: function_version.into(),
            instance_id: instance_id.into(),
        }
    }

    /// Creates an assignment with freshly generated random identifiers.
    pub fn generate(function_config: impl Into<Arc<FunctionConfig>>) -> Self {
        Self::new(
            function_config,
            Uuid::new_v4().to_string(),
            Uuid::new_v4().to_string(),
            Uuid::new_v4().to_string(),
        )
    }
}

/// Identity and configuration of one function instance.
///
/// ## Example
/// ```rust
/// use fnvisor::{Assignment, FunctionConfig, InstanceDescriptor};
///
/// let cfg = FunctionConfig::new("public", "default", "exclaim");
/// let desc = InstanceDescriptor::new(Assignment::generate(cfg), 1024);
///
/// assert_eq!(desc.max_buffered_items(), 1024);
/// assert_ne!(desc.function_id(), desc.instance_id());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceDescriptor {
    function_config: Arc<FunctionConfig>,
    function_id: String,
    function_version: String,
    instance_id: String,
    max_buffered_items: usize,
}

impl InstanceDescriptor {
    /// Builds the descriptor from an assignment and the instance queue bound.
    pub fn new(assignment: Assignment, max_buffered_items: usize) -> Self {
        let Assignment {
            function_config,
            function_id,
            function_version,
            instance_id,
        } = assignment;
        Self {
            function_config,
            function_id,
            function_version,
            instance_id,
            max_buffered_items,
        }
    }

    /// Returns the function configuration.
    pub fn function_config(&self) -> &Arc<FunctionConfig> {
        &self.function_config
    }

    /// Returns the function identifier.
    pub fn function_id(&self) -> &str {
        &self.function_id
    }

    /// Returns the function version.
    pub fn function_version(&self) -> &str {
        &self.function_version
    }

    /// Returns the instance identifier.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Returns the bound on work items buffered inside the instance.
    pub fn max_buffered_items(&self) -> usize {
        self.max_buffered_items
    }

    /// Convenience: returns `tenant/namespace/name` of the function.
    pub fn fully_qualified_name(&self) -> String {
        self.function_config.fully_qualified_name()
    }
}
