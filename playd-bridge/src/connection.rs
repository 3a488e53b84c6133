//! Connection establishment and the version handshake

use frame_socket::{Connector, Transport};
use playd_protocol::{reply, Command, Request, VERSION};

use crate::error::ErrorState;

/// One established, version-checked connection to the daemon
///
/// Created by [`Connection::establish`] and replaced - never repaired -
/// on reconnect.
pub(crate) struct Connection {
    transport: Box<dyn Transport>,
    version: i32,
}

impl Connection {
    /// Dial a fresh transport and perform the version handshake
    ///
    /// Failure maps onto the bridge error states: no connectivity is
    /// `NotConnected`, an empty or unparseable handshake reply is
    /// `Unknown`, and a parseable but different version is
    /// `DifferentVersion` (no negotiation is attempted).
    pub(crate) fn establish(connector: &dyn Connector) -> Result<Self, ErrorState> {
        let mut transport = match connector.dial() {
            Ok(transport) => transport,
            Err(err) => {
                tracing::error!("unable to connect to the playback daemon: {err}");
                return Err(ErrorState::NotConnected);
            }
        };
        if !transport.is_connected() {
            tracing::error!("transport did not reach a connected state");
            return Err(ErrorState::NotConnected);
        }

        let message = Request::new(Command::Version).into_message();
        if transport.write_message(&message).is_err() {
            tracing::error!("unable to query the daemon version");
            return Err(ErrorState::Unknown);
        }
        let payload = match transport.read_message() {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!("unable to read the daemon version: {err}");
                return Err(ErrorState::Unknown);
            }
        };

        match reply::parse_int(&payload) {
            Ok(version) if version == i64::from(VERSION) => {
                tracing::info!(version, "connection established");
                Ok(Self {
                    transport,
                    version: version as i32,
                })
            }
            Ok(version) => {
                tracing::error!(
                    daemon = version,
                    client = VERSION,
                    "protocol versions do not match"
                );
                Err(ErrorState::DifferentVersion)
            }
            Err(_) => {
                tracing::error!(%payload, "malformed daemon version reply");
                Err(ErrorState::Unknown)
            }
        }
    }

    /// Perform one request/reply exchange
    ///
    /// A failed write, a failed read, and an empty reply all mean the
    /// connection is gone; legitimate replies are never empty.
    pub(crate) fn request(&mut self, message: &str) -> Result<String, ErrorState> {
        if self.transport.write_message(message).is_err() {
            return Err(ErrorState::LostConnection);
        }
        match self.transport.read_message() {
            Ok(payload) if !payload.is_empty() => Ok(payload),
            _ => Err(ErrorState::LostConnection),
        }
    }

    #[allow(dead_code)]
    pub(crate) fn version(&self) -> i32 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedConnector, Step};
    use playd_protocol::VERSION;

    #[test]
    fn test_handshake_success() {
        let connector = ScriptedConnector::single(vec![Step::reply(VERSION.to_string())]);
        let connection = Connection::establish(&connector).unwrap();
        assert_eq!(connection.version(), VERSION);
    }

    #[test]
    fn test_handshake_version_mismatch() {
        let connector = ScriptedConnector::single(vec![Step::reply((VERSION + 1).to_string())]);
        assert_eq!(
            Connection::establish(&connector).err(),
            Some(ErrorState::DifferentVersion)
        );
    }

    #[test]
    fn test_handshake_garbled_reply() {
        let connector = ScriptedConnector::single(vec![Step::reply("not-a-version")]);
        assert_eq!(
            Connection::establish(&connector).err(),
            Some(ErrorState::Unknown)
        );
    }

    #[test]
    fn test_handshake_read_failure() {
        let connector = ScriptedConnector::single(vec![Step::FailRead]);
        assert_eq!(
            Connection::establish(&connector).err(),
            Some(ErrorState::Unknown)
        );
    }

    #[test]
    fn test_handshake_unreachable() {
        let connector = ScriptedConnector::unreachable();
        assert_eq!(
            Connection::establish(&connector).err(),
            Some(ErrorState::NotConnected)
        );
    }

    #[test]
    fn test_request_empty_reply_is_lost_connection() {
        let connector = ScriptedConnector::single(vec![
            Step::reply(VERSION.to_string()),
            Step::reply(""),
        ]);
        let mut connection = Connection::establish(&connector).unwrap();
        assert_eq!(connection.request("9"), Err(ErrorState::LostConnection));
    }
}
