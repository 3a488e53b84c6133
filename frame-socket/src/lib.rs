//! Private socket transport for playd daemon communication
//!
//! This crate provides a minimal, synchronous message-stream transport
//! used by the bridge to talk to the background playback daemon. A
//! message is one line of text; framing, timeouts, and connection
//! probing live here so the layers above only ever see whole messages.

mod error;
mod tcp;

pub use error::SocketError;
pub use tcp::{TcpConnector, TcpMessageSocket};

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, SocketError>;

/// A bidirectional, message-oriented byte stream
///
/// Implementations carry exactly one request/response exchange at a
/// time; the caller is responsible for serializing access. A
/// zero-length read is never a legitimate message and surfaces as
/// [`SocketError::Disconnected`].
pub trait Transport: Send {
    /// Whether the underlying stream still looks usable
    fn is_connected(&self) -> bool;

    /// Send one message to the peer
    fn write_message(&mut self, message: &str) -> Result<()>;

    /// Receive one message from the peer, blocking up to the configured
    /// read timeout
    fn read_message(&mut self) -> Result<String>;
}

/// A factory for fresh [`Transport`] instances
///
/// Each call to `dial` must produce a brand-new stream; reconnection is
/// always a full replacement, never a repair of the old transport.
pub trait Connector: Send + Sync {
    fn dial(&self) -> Result<Box<dyn Transport>>;
}
