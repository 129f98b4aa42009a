//! # Function identity and instance configuration.
//!
//! - [`FunctionConfig`] - opaque description of what to run, shared with sinks
//! - [`Assignment`] - the three identifiers of one function assignment
//! - [`InstanceDescriptor`] - immutable identity + configuration handed to the container factory

mod descriptor;
mod function;

pub use descriptor::{Assignment, InstanceDescriptor};
pub use function::FunctionConfig;
