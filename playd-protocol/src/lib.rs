//! Wire protocol spoken between the playd daemon and its clients
//!
//! Every exchange is one request message answered by one reply message.
//! A request is a decimal command code, optionally followed by
//! [`DELIMITER`]-separated argument fields in a command-defined order;
//! a reply is a single payload whose shape (integer, float, id list,
//! or label) is determined by the command that was sent.
//!
//! The delimiter is an ASCII control byte that cannot occur in decimal
//! identifiers. The only free-text field on the wire is the
//! "playing from" label, where a single space is reserved to mean
//! "empty" (see [`reply::label_from_wire`]).

mod command;
mod error;
pub mod reply;
mod request;
mod types;

pub use command::Command;
pub use error::ProtocolError;
pub use request::Request;
pub use types::{PlaybackStatus, Repeat, Shuffle, SongId, NO_SONG};

use std::time::Duration;

/// Protocol version this crate speaks
///
/// The daemon must answer [`Command::Version`] with exactly this value;
/// there is no negotiation.
pub const VERSION: i32 = 4;

/// TCP port the daemon listens on
pub const PORT: u16 = 6510;

/// Field delimiter inside a message (ASCII unit separator)
pub const DELIMITER: char = '\u{1f}';

/// Timeout applied to connecting and to each request/reply exchange
pub const TIMEOUT: Duration = Duration::from_secs(2);

/// Result type for protocol decoding
pub type Result<T> = std::result::Result<T, ProtocolError>;
