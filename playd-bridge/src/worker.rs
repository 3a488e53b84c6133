//! The dispatcher worker loop
//!
//! One worker thread runs per bridge for its whole lifetime. It is the
//! only code that touches the transport, so exactly one request is in
//! flight at any moment and responses come back in submission order.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::dispatch::{Completion, Core};
use crate::error::ErrorState;
use crate::sync;

pub(crate) fn spawn_worker(core: Arc<Core>) -> JoinHandle<()> {
    thread::spawn(move || run(core))
}

fn run(core: Arc<Core>) {
    tracing::debug!("dispatcher worker started");
    let mut last_refresh = Instant::now();

    while !core.should_exit() {
        // While unhealthy, only sleep; an external caller may be
        // reconnecting and must not race an in-flight write
        if !core.error().is_healthy() {
            thread::sleep(core.config.error_retry);
            continue;
        }

        drain_once(&core);
        if !core.error().is_healthy() {
            continue;
        }

        if last_refresh.elapsed() >= core.config.refresh_interval {
            sync::refresh_battery(&core);
            last_refresh = Instant::now();
        } else {
            thread::sleep(core.config.idle_poll);
        }
    }

    tracing::debug!("dispatcher worker stopped");
}

/// Process every queued command, strictly FIFO, until the queue is
/// empty or an error halts the drain
///
/// The queue lock is never held across the exchange or the completion,
/// so completions are free to submit follow-up commands; those are
/// picked up later in the same drain.
pub(crate) fn drain_once(core: &Core) {
    loop {
        let Some(pending) = core.queue.lock().pop_front() else {
            return;
        };

        let outcome = {
            let mut slot = core.connection.lock();
            match slot.as_mut() {
                Some(connection) => connection.request(&pending.message),
                None => Err(ErrorState::LostConnection),
            }
        };

        match outcome {
            Ok(payload) => match pending.completion {
                Completion::Apply(apply) => apply(core, &payload),
                Completion::Ticket(ticket) => ticket.fulfill(payload),
            },
            Err(error) => {
                // The failed command and everything behind it are
                // discarded; callers must observe the error state and
                // resubmit after a successful reconnect
                if let Completion::Ticket(ticket) = pending.completion {
                    ticket.fail(error);
                }
                core.set_error(error);
                core.clear_queue(error);
                return;
            }
        }
    }
}
