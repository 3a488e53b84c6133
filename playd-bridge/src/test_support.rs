//! Scripted transport doubles shared by the unit tests

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use frame_socket::{Connector, Result, SocketError, Transport};
use playd_protocol::VERSION;

use crate::bridge::BridgeConfig;
use crate::dispatch::Core;

/// One scripted exchange step, consumed in order
pub(crate) enum Step {
    /// Accept the write, answer with this payload
    Reply(String),
    /// Fail the write
    FailWrite,
    /// Accept the write, fail the read
    FailRead,
}

impl Step {
    pub(crate) fn reply(payload: impl Into<String>) -> Self {
        Step::Reply(payload.into())
    }
}

/// A transport that follows a fixed script and records every write
pub(crate) struct ScriptedTransport {
    steps: VecDeque<Step>,
    written: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: Vec<Step>, written: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            steps: steps.into(),
            written,
        }
    }
}

impl Transport for ScriptedTransport {
    fn is_connected(&self) -> bool {
        true
    }

    fn write_message(&mut self, message: &str) -> Result<()> {
        if matches!(self.steps.front(), Some(Step::FailWrite)) {
            self.steps.pop_front();
            return Err(SocketError::Io("scripted write failure".to_string()));
        }
        self.written.lock().push(message.to_string());
        Ok(())
    }

    fn read_message(&mut self) -> Result<String> {
        match self.steps.pop_front() {
            Some(Step::Reply(payload)) => Ok(payload),
            Some(Step::FailRead) | Some(Step::FailWrite) | None => Err(SocketError::Disconnected),
        }
    }
}

/// Hands out scripted transports, one per dial
pub(crate) struct ScriptedConnector {
    scripts: Mutex<VecDeque<Vec<Step>>>,
    written: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConnector {
    /// A connector whose first (and only) dial yields the given script
    pub(crate) fn single(steps: Vec<Step>) -> Self {
        Self {
            scripts: Mutex::new(VecDeque::from([steps])),
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A connector that never reaches the daemon
    pub(crate) fn unreachable() -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a script for a later dial (reconnect tests)
    pub(crate) fn push_script(&self, steps: Vec<Step>) {
        self.scripts.lock().push_back(steps);
    }

    /// Every message successfully written across all dials
    pub(crate) fn written(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.written)
    }
}

impl Connector for ScriptedConnector {
    fn dial(&self) -> Result<Box<dyn Transport>> {
        match self.scripts.lock().pop_front() {
            Some(steps) => Ok(Box::new(ScriptedTransport::new(
                steps,
                Arc::clone(&self.written),
            ))),
            None => Err(SocketError::Connect("scripted refusal".to_string())),
        }
    }
}

/// A healthy core whose connection follows `steps` after the handshake
///
/// Returns the core plus the record of written messages (the handshake
/// message is already in it).
pub(crate) fn connected_core(steps: Vec<Step>) -> (Arc<Core>, Arc<Mutex<Vec<String>>>) {
    let mut script = vec![Step::reply(VERSION.to_string())];
    script.extend(steps);
    let connector = ScriptedConnector::single(script);
    let written = connector.written();

    let core = Arc::new(Core::new(Box::new(connector), BridgeConfig::default()));
    core.reconnect();
    assert!(core.error().is_healthy(), "handshake should have succeeded");
    (core, written)
}
