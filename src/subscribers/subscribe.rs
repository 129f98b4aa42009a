//! # Subscriber trait.
//!
//! Each subscriber is driven by its own worker fed by a bounded queue owned by
//! the [`SubscriberSet`](crate::SubscriberSet). A slow subscriber never delays
//! the monitor nor the other subscribers; when its queue is full, events are
//! dropped for it and a `SubscriberOverflow` event is published.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use fnvisor::{Event, EventKind, Subscribe};
//!
//! struct RestartAlert;
//!
//! #[async_trait]
//! impl Subscribe for RestartAlert {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::InstanceRestarted && ev.restarts.unwrap_or(0) > 10 {
//!             // page someone...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "restart-alert" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for overflow/panic reports).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        256
    }
}
