//! # Container factory contract.
//!
//! The spawner calls [`ContainerFactory::create_container`] exactly once per
//! successful `start()`. Restarts never go back to the factory.

use std::path::Path;
use std::sync::Arc;

use crate::container::ContainerRef;
use crate::error::ContainerError;
use crate::instance::InstanceDescriptor;

/// Builds containers for function instances.
pub trait ContainerFactory: Send + Sync + 'static {
    /// Creates a container that will run `code_path` as the instance described by `descriptor`.
    ///
    /// The container is returned unstarted.
    fn create_container(
        &self,
        descriptor: &InstanceDescriptor,
        code_path: &Path,
    ) -> Result<ContainerRef, ContainerError>;
}

/// Shared handle to a container factory.
pub type FactoryRef = Arc<dyn ContainerFactory>;
