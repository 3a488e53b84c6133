//! Error types for protocol decoding

use thiserror::Error;

/// Errors that can occur while decoding a reply payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The reply carried no payload where one was required
    #[error("empty reply payload")]
    EmptyReply,

    /// A field that should be an integer was not
    #[error("malformed integer field: {0:?}")]
    BadInt(String),

    /// A field that should be a number was not
    #[error("malformed numeric field: {0:?}")]
    BadFloat(String),

    /// A field carried a code outside the known range
    #[error("unknown code {0} for {1}")]
    UnknownCode(i64, &'static str),
}
