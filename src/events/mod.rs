//! Spawner events: types and broadcast bus.
//!
//! The spawner and its monitor publish an [`Event`] at every lifecycle step
//! (start, death, restart, metrics harvest, close). Events travel over the
//! [`Bus`] and are fanned out to user [`Subscribe`](crate::Subscribe)rs.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Spawner` (start/close), the monitor task (ticks),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumer**: the listener spawned by `SpawnerBuilder::build`, which feeds the `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
