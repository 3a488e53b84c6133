//! Client-side bridge to the playd playback daemon
//!
//! The daemon owns real-time audio playback in a separate, privileged
//! process. This crate keeps a persistent connection to it, serializes
//! commands onto one wire exchange at a time, and mirrors the remote
//! playback state locally so the embedding application never blocks its
//! main loop on network I/O.
//!
//! # Architecture
//!
//! ```text
//! producers ──enqueue──► command queue ──► worker thread ──► daemon
//! (UI, jobs)                                  │
//! readers  ◄──poll────── state mirror ◄───completions
//! ```
//!
//! One worker thread per [`Bridge`] drains the queue strictly FIFO with
//! exactly one request in flight; completions update the mirror. On its
//! own cadence the worker also refreshes the whole mirror and re-fetches
//! queue contents when a size, index, or shuffle change signals they are
//! stale.
//!
//! # Failure model
//!
//! Errors never cross threads: every failure lands in a single
//! [`ErrorState`] cell, observable via [`Bridge::error`]. A lost
//! connection clears the queue (pending commands are dropped, blocked
//! waiters unblock with an error) and processing halts until the caller
//! invokes [`Bridge::reconnect`]. There is no automatic retry.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use playd_bridge::{Bridge, Repeat};
//!
//! let bridge = Bridge::tcp(([127, 0, 0, 1], playd_protocol::PORT).into());
//!
//! bridge.set_queue(&[101, 102, 103]);
//! bridge.set_repeat(Repeat::All);
//! bridge.resume();
//!
//! if bridge.queue_changed() {
//!     println!("queue: {:?}", bridge.queue());
//! }
//! ```

mod bridge;
mod commands;
mod connection;
mod dispatch;
mod mirror;
mod sync;
mod worker;

pub mod daemon;
pub mod error;
pub mod logging;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use bridge::{Bridge, BridgeConfig};
pub use daemon::{DaemonError, DaemonHandle};
pub use error::{BridgeError, ErrorState, Result};
pub use logging::{init_logging, init_logging_from_env, init_silent, LoggingError, LoggingMode};
pub use mirror::Snapshot;

// Wire types shared with the protocol crate
pub use playd_protocol::{PlaybackStatus, Repeat, Shuffle, SongId};

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::bridge::{Bridge, BridgeConfig};
    pub use crate::error::{BridgeError, ErrorState};
    pub use crate::mirror::Snapshot;
    pub use playd_protocol::{PlaybackStatus, Repeat, Shuffle, SongId};
}
