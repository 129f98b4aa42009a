//! Spawner core: lifecycle state machine and monitor.
//!
//! The only public API from this module is [`Spawner`] (with its builder and
//! state enum).
//!
//! Internal modules:
//! - [`spawner`]: start / join / status / close over one guarded container handle;
//! - [`monitor`]: the periodic tick (liveness, metrics harvest, restart) and the restart gate;
//! - [`builder`]: assembles descriptor, bus and subscribers into a spawner.

mod builder;
mod monitor;
mod spawner;

pub use builder::SpawnerBuilder;
pub use spawner::{Spawner, SpawnerState};
