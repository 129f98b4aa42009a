//! # Restart policy for a dead container.
//!
//! [`RestartPolicy`] determines whether the monitor restarts a container it
//! found dead.
//!
//! - [`RestartPolicy::Always`] restart on every dead tick, without limit (default).
//! - [`RestartPolicy::Never`] leave a dead container dead; only report it.
//! - [`RestartPolicy::UpTo`] restart at most `max` times in a row; an alive tick
//!   resets the streak.
//!
//! ```text
//! dead tick ──► allows(consecutive)?
//!                 ├─ Always        ─► restart
//!                 ├─ Never         ─► RestartSkipped
//!                 └─ UpTo { max }  ─► restart while consecutive < max
//! ```

/// Policy controlling whether a dead container is restarted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Restart every time the container is found dead (default).
    Always,
    /// Never restart automatically.
    Never,
    /// Restart at most `max` times without an alive tick in between.
    UpTo {
        /// Maximum number of consecutive restarts.
        max: u32,
    },
}

impl Default for RestartPolicy {
    /// Returns [`RestartPolicy::Always`].
    fn default() -> Self {
        RestartPolicy::Always
    }
}

impl RestartPolicy {
    /// Returns `true` if another restart is allowed after `consecutive`
    /// restarts that were not followed by an alive tick.
    pub fn allows(&self, consecutive: u32) -> bool {
        match self {
            RestartPolicy::Always => true,
            RestartPolicy::Never => false,
            RestartPolicy::UpTo { max } => consecutive < *max,
        }
    }
}
