//! Reply payload decoding
//!
//! Replies are small enough that every helper here borrows the payload
//! and allocates only for its output.

use crate::{ProtocolError, Result, SongId, DELIMITER};

/// Wire encoding of an empty "playing from" label
///
/// A label of exactly one space means "no label"; it keeps the empty
/// string distinguishable from a missing field on the wire.
pub const EMPTY_LABEL: &str = " ";

/// Parse a reply that must be a single integer
pub fn parse_int(reply: &str) -> Result<i64> {
    if reply.is_empty() {
        return Err(ProtocolError::EmptyReply);
    }
    reply
        .parse()
        .map_err(|_| ProtocolError::BadInt(reply.to_string()))
}

/// Parse a reply that must be a non-negative integer index or size
pub fn parse_index(reply: &str) -> Result<usize> {
    if reply.is_empty() {
        return Err(ProtocolError::EmptyReply);
    }
    reply
        .parse()
        .map_err(|_| ProtocolError::BadInt(reply.to_string()))
}

/// Parse a reply that must be a single number (volume, position)
pub fn parse_float(reply: &str) -> Result<f64> {
    if reply.is_empty() {
        return Err(ProtocolError::EmptyReply);
    }
    reply
        .parse()
        .map_err(|_| ProtocolError::BadFloat(reply.to_string()))
}

/// Decode a delimiter-separated list of song identifiers
///
/// Returns the identifiers in wire order. Zero elements (an empty
/// queue) decode to an empty vector, a trailing delimiter is not
/// required, and unparseable tokens are skipped rather than aborting
/// the whole list.
pub fn parse_id_list(reply: &str) -> Vec<SongId> {
    reply
        .split(DELIMITER)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse().ok())
        .collect()
}

/// Map a wire label to its application value
///
/// The reserved single-space sentinel decodes to the empty string;
/// every other value decodes verbatim.
pub fn label_from_wire(label: &str) -> &str {
    if label == EMPTY_LABEL {
        ""
    } else {
        label
    }
}

/// Map an application label to its wire value
pub fn label_to_wire(label: &str) -> &str {
    if label.is_empty() {
        EMPTY_LABEL
    } else {
        label
    }
}
