//! # Container and container factory contracts.
//!
//! The spawner does not run user code itself. It drives a [`Container`], an
//! isolated unit (thread, process, sandbox) that hosts the instance, and obtains
//! containers from a [`ContainerFactory`].
//!
//! - [`Container`] - lifecycle, liveness, metrics and status of one running unit
//! - [`ContainerFactory`] - builds a container for an [`InstanceDescriptor`](crate::InstanceDescriptor)
//! - [`ContainerRef`] - shared handle (`Arc<dyn Container>`)

mod factory;
mod unit;

pub use factory::{ContainerFactory, FactoryRef};
pub use unit::{Container, ContainerRef};
