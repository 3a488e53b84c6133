//! Command queue, completions, and the shared bridge core
//!
//! Producers push encoded commands here; the worker thread pops them
//! one at a time, performs the exchange, and runs the completion. A
//! pending command is owned exclusively by the queue from submission
//! until it is popped, or until an error clears the queue.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam::atomic::AtomicCell;
use parking_lot::{Condvar, Mutex};

use frame_socket::Connector;

use crate::bridge::BridgeConfig;
use crate::connection::Connection;
use crate::error::ErrorState;
use crate::mirror::StateMirror;

/// Raw outcome of one submitted command
pub(crate) type CommandResult = Result<String, ErrorState>;

/// What to do with a command's reply
pub(crate) enum Completion {
    /// Run on the worker thread with the reply payload; receives the
    /// core so it can update the mirror or submit follow-up commands.
    /// Dropped uninvoked if the command is discarded on error.
    Apply(Box<dyn FnOnce(&Core, &str) + Send>),

    /// Fulfill a promise a producer thread is (or will be) waiting on.
    /// Failed, not dropped, if the command is discarded on error.
    Ticket(Ticket),
}

/// One encoded message awaiting dispatch
pub(crate) struct PendingCommand {
    pub(crate) message: String,
    pub(crate) completion: Completion,
}

// ----------------------------------------------------------------------
// Ticket - per-command promise
// ----------------------------------------------------------------------

struct TicketInner {
    result: Mutex<Option<CommandResult>>,
    cond: Condvar,
}

/// A promise for one command's reply
///
/// Fulfilled by the worker with the raw payload, or failed with the
/// error state that aborted the command, so a waiting thread always
/// unblocks - on success or on failure - without polling.
#[derive(Clone)]
pub(crate) struct Ticket {
    inner: Arc<TicketInner>,
}

impl Ticket {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(TicketInner {
                result: Mutex::new(None),
                cond: Condvar::new(),
            }),
        }
    }

    pub(crate) fn fulfill(&self, reply: String) {
        self.settle(Ok(reply));
    }

    pub(crate) fn fail(&self, error: ErrorState) {
        self.settle(Err(error));
    }

    fn settle(&self, result: CommandResult) {
        let mut slot = self.inner.result.lock();
        // First settlement wins; a ticket resolves exactly once
        if slot.is_none() {
            *slot = Some(result);
            self.inner.cond.notify_all();
        }
    }

    /// Block until the command completes or is aborted
    pub(crate) fn wait(&self) -> CommandResult {
        let mut slot = self.inner.result.lock();
        loop {
            if let Some(result) = slot.clone() {
                return result;
            }
            self.inner.cond.wait(&mut slot);
        }
    }

    /// Block up to `timeout`; `None` means the ticket is still pending
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> Option<CommandResult> {
        let mut slot = self.inner.result.lock();
        if slot.is_none() {
            self.inner.cond.wait_for(&mut slot, timeout);
        }
        slot.clone()
    }
}

// ----------------------------------------------------------------------
// Core - state shared between the bridge handle and its worker
// ----------------------------------------------------------------------

/// Everything the bridge owns, shared with the worker via `Arc`
///
/// There are no ambient singletons: producers hold the `Bridge` handle,
/// the worker holds its own `Arc<Core>`, and teardown is tied to the
/// bridge's lifetime.
pub(crate) struct Core {
    /// FIFO command queue, shared between producers and the worker
    pub(crate) queue: Mutex<VecDeque<PendingCommand>>,
    /// Cached playback state, written by completions
    pub(crate) mirror: StateMirror,
    /// Connection slot; replaced wholesale on every (re)connect
    pub(crate) connection: Mutex<Option<Connection>>,
    pub(crate) config: BridgeConfig,
    connector: Box<dyn Connector>,
    error: AtomicCell<ErrorState>,
    queue_limit: AtomicCell<Option<usize>>,
    exit: AtomicBool,
}

impl Core {
    pub(crate) fn new(connector: Box<dyn Connector>, config: BridgeConfig) -> Self {
        let queue_limit = config.queue_limit;
        Self {
            queue: Mutex::new(VecDeque::new()),
            mirror: StateMirror::new(),
            connection: Mutex::new(None),
            config,
            connector,
            error: AtomicCell::new(ErrorState::Unknown),
            queue_limit: AtomicCell::new(queue_limit),
            exit: AtomicBool::new(false),
        }
    }

    pub(crate) fn error(&self) -> ErrorState {
        self.error.load()
    }

    pub(crate) fn set_error(&self, error: ErrorState) {
        let previous = self.error.swap(error);
        if previous != error {
            tracing::debug!(?previous, current = ?error, "error state changed");
        }
    }

    pub(crate) fn queue_limit(&self) -> Option<usize> {
        self.queue_limit.load()
    }

    pub(crate) fn set_queue_limit(&self, limit: Option<usize>) {
        self.queue_limit.store(limit);
    }

    pub(crate) fn request_exit(&self) {
        self.exit.store(true, Ordering::Relaxed);
    }

    pub(crate) fn should_exit(&self) -> bool {
        self.exit.load(Ordering::Relaxed)
    }

    /// Submit a command whose reply updates the mirror
    ///
    /// Returns `false` without enqueuing when the bridge is unhealthy.
    pub(crate) fn submit(
        &self,
        message: String,
        apply: impl FnOnce(&Core, &str) + Send + 'static,
    ) -> bool {
        self.push(message, Completion::Apply(Box::new(apply)))
    }

    /// Submit a command and obtain a promise for its reply
    ///
    /// When the bridge is unhealthy, the returned ticket is already
    /// failed with the current error state.
    pub(crate) fn submit_ticket(&self, message: String) -> Ticket {
        let ticket = Ticket::new();
        if !self.push(message, Completion::Ticket(ticket.clone())) {
            ticket.fail(self.error());
        }
        ticket
    }

    fn push(&self, message: String, completion: Completion) -> bool {
        if !self.error().is_healthy() {
            return false;
        }
        self.queue
            .lock()
            .push_back(PendingCommand { message, completion });
        true
    }

    /// Discard every queued command after an error transition
    ///
    /// Apply completions are dropped without being invoked; tickets are
    /// failed so blocked waiters observe the error instead of hanging.
    pub(crate) fn clear_queue(&self, error: ErrorState) {
        let discarded: Vec<PendingCommand> = self.queue.lock().drain(..).collect();
        if discarded.is_empty() {
            return;
        }
        tracing::error!(
            count = discarded.len(),
            "command queue cleared after error during processing"
        );
        for command in discarded {
            if let Completion::Ticket(ticket) = command.completion {
                ticket.fail(error);
            }
        }
    }

    /// Replace the connection and re-run the handshake
    ///
    /// Called for the initial connect and for every explicit reconnect.
    /// The previous connection, healthy or not, is always discarded.
    pub(crate) fn reconnect(&self) {
        let mut slot = self.connection.lock();
        match Connection::establish(self.connector.as_ref()) {
            Ok(connection) => {
                *slot = Some(connection);
                self.set_error(ErrorState::None);
            }
            Err(error) => {
                *slot = None;
                self.set_error(error);
            }
        }
    }
}
