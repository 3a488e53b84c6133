//! TCP implementation of the transport contract
//!
//! Messages are newline-framed UTF-8 text. The daemon never embeds a
//! newline inside a message (its field delimiter is a control byte),
//! so one line is always exactly one message.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::{Connector, Result, SocketError, Transport};

/// Default connect/read/write timeout applied to new sockets
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Dials TCP message sockets to a fixed daemon address
#[derive(Debug, Clone)]
pub struct TcpConnector {
    addr: SocketAddr,
    timeout: Duration,
}

impl TcpConnector {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the timeout used for connect, read, and write
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Connector for TcpConnector {
    fn dial(&self) -> Result<Box<dyn Transport>> {
        let stream = TcpStream::connect_timeout(&self.addr, self.timeout)
            .map_err(|e| SocketError::Connect(e.to_string()))?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;
        stream.set_nodelay(true)?;
        tracing::debug!("dialed daemon at {}", self.addr);
        Ok(Box::new(TcpMessageSocket::new(stream)?))
    }
}

/// One established message stream over TCP
pub struct TcpMessageSocket {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    connected: bool,
}

impl TcpMessageSocket {
    pub fn new(stream: TcpStream) -> Result<Self> {
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self {
            reader,
            writer: stream,
            connected: true,
        })
    }
}

impl Transport for TcpMessageSocket {
    fn is_connected(&self) -> bool {
        self.connected && self.writer.peer_addr().is_ok()
    }

    fn write_message(&mut self, message: &str) -> Result<()> {
        let result = self
            .writer
            .write_all(message.as_bytes())
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush());

        if let Err(err) = result {
            self.connected = false;
            return Err(err.into());
        }
        Ok(())
    }

    fn read_message(&mut self) -> Result<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.connected = false;
                Err(SocketError::Disconnected)
            }
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Ok(line)
            }
            Err(err) => {
                self.connected = false;
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for TcpMessageSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpMessageSocket")
            .field("connected", &self.connected)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Spawn a single-connection echo peer and return its address
    fn spawn_echo_peer(replies: Vec<&'static str>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = stream;

            for reply in replies {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    return;
                }
                writer.write_all(reply.as_bytes()).unwrap();
                writer.write_all(b"\n").unwrap();
            }
            // Dropping the stream closes the connection
        });

        addr
    }

    #[test]
    fn test_round_trip() {
        let addr = spawn_echo_peer(vec!["pong"]);
        let connector = TcpConnector::new(addr);

        let mut transport = connector.dial().unwrap();
        assert!(transport.is_connected());

        transport.write_message("ping").unwrap();
        assert_eq!(transport.read_message().unwrap(), "pong");
    }

    #[test]
    fn test_disconnect_is_reported() {
        // Peer answers once then closes
        let addr = spawn_echo_peer(vec!["ok"]);
        let connector = TcpConnector::new(addr);

        let mut transport = connector.dial().unwrap();
        transport.write_message("first").unwrap();
        transport.read_message().unwrap();

        // The peer has hung up; the next read must not hand back an
        // empty message as if it were a reply
        match transport.read_message() {
            Err(SocketError::Disconnected) => {}
            other => panic!("expected Disconnected, got {:?}", other),
        }
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_dial_unreachable() {
        // Port 1 on localhost should refuse immediately
        let addr: SocketAddr = "127.0.0.1:1".parse().unwrap();
        let connector = TcpConnector::new(addr).with_timeout(Duration::from_millis(200));

        match connector.dial() {
            Err(SocketError::Connect(_)) => {}
            other => panic!("expected Connect error, got {:?}", other.map(|_| ())),
        }
    }
}
