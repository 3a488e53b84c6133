//! Error types for the socket transport

use thiserror::Error;

/// Errors that can occur while dialing or exchanging messages
#[derive(Debug, Error)]
pub enum SocketError {
    /// The peer could not be reached or refused the connection
    #[error("connect failed: {0}")]
    Connect(String),

    /// An established stream failed mid-exchange
    #[error("I/O error: {0}")]
    Io(String),

    /// The peer closed the stream (zero-length read)
    #[error("peer disconnected")]
    Disconnected,
}

impl From<std::io::Error> for SocketError {
    fn from(err: std::io::Error) -> Self {
        SocketError::Io(err.to_string())
    }
}
