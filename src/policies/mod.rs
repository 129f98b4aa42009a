//! Restart policies for a dead container.
//!
//! The monitor consults these knobs each time it finds the container dead.
//! They decide **whether** a restart happens at all and **how long** after the
//! previous restart it may happen.
//!
//! ## Contents
//! - [`RestartPolicy`] how many restarts are allowed (always / never / up to N)
//! - [`BackoffPolicy`] minimum spacing between consecutive restarts
//! - [`JitterPolicy`]  randomization of that spacing
//!
//! ## Quick wiring
//! ```text
//! SpawnerConfig { restart: RestartPolicy, backoff: BackoffPolicy, .. }
//!      └─► core::monitor (dead tick):
//!           - restart.allows(consecutive_deaths) → attempt or give up
//!           - backoff.next(consecutive_deaths)   → earliest time of the next attempt
//! ```
//!
//! ## Defaults
//! - `RestartPolicy::Always`: every dead tick restarts, forever.
//! - `BackoffPolicy::default()`: zero delay, so a restart happens on each dead tick.
//! - `JitterPolicy::None`.

mod backoff;
mod jitter;
mod restart;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use restart::RestartPolicy;
