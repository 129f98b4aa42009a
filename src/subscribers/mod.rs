//! # Event subscribers.
//!
//! Subscribers observe the [`Event`](crate::Event)s published by the spawner:
//! logging, metrics export, alerting on repeated restarts.
//!
//! ```text
//! Spawner/Monitor ── publish ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                      ├──► [queue] ─► worker ─► sub1.on_event()
//!                                                      └──► [queue] ─► worker ─► sub2.on_event()
//! ```
//!
//! - [`Subscribe`] the extension point
//! - [`SubscriberSet`] non-blocking fan-out with per-subscriber queues
//! - [`LogWriter`] `tracing`-backed writer (feature `logging`)

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
