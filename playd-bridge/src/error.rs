//! Error types for the bridge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for fallible bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Connection health of the bridge, readable from any thread
///
/// Exactly one value is active at a time. Any value other than `None`
/// halts command processing until an explicit [`crate::Bridge::reconnect`]
/// succeeds; no command is written while the bridge is unhealthy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorState {
    /// Connected and processing commands
    None,
    /// An unclassified failure, e.g. a malformed handshake reply
    #[default]
    Unknown,
    /// The transport never reached a connected state
    NotConnected,
    /// The daemon speaks a different protocol version
    DifferentVersion,
    /// A write or read failed after a healthy connection was established
    LostConnection,
}

impl ErrorState {
    pub fn is_healthy(self) -> bool {
        matches!(self, ErrorState::None)
    }
}

/// Failures surfaced by blocking bridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The bridge became (or already was) unhealthy while waiting
    #[error("bridge is unhealthy: {0:?}")]
    Unhealthy(ErrorState),

    /// The daemon answered with a non-zero status code
    #[error("daemon refused the request (code {0})")]
    Refused(i64),

    /// The daemon's reply could not be decoded
    #[error("malformed daemon reply: {0}")]
    Protocol(#[from] playd_protocol::ProtocolError),
}
