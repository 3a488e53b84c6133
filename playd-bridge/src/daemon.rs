//! Lifecycle control for the background daemon process
//!
//! The daemon is launched and stopped out-of-band; none of this speaks
//! the wire protocol. Stopping a daemon the bridge is connected to will
//! surface as a lost connection.

use std::process::{Child, Command};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;

/// How long to wait for a graceful exit before force-killing
const STOP_GRACE: Duration = Duration::from_secs(2);
const STOP_POLL: Duration = Duration::from_millis(100);

/// Result type for daemon process control
pub type Result<T> = std::result::Result<T, DaemonError>;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to control the daemon process: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle on a spawned daemon process
pub struct DaemonHandle {
    child: Mutex<Option<Child>>,
}

impl DaemonHandle {
    /// Spawn the daemon from a prepared command
    pub fn spawn(mut command: Command) -> Result<Self> {
        let child = command.spawn()?;
        tracing::info!(pid = child.id(), "daemon process started");
        Ok(Self {
            child: Mutex::new(Some(child)),
        })
    }

    /// Whether the process is still alive
    pub fn is_running(&self) -> bool {
        let mut guard = self.child.lock();
        match guard.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(Some(_)) => false,
                Ok(None) => true,
                Err(err) => {
                    tracing::error!("failed to probe daemon process: {err}");
                    false
                }
            },
            None => false,
        }
    }

    /// Stop the process: ask politely, then kill after a grace period
    pub fn stop(&self) -> Result<()> {
        let Some(mut child) = self.child.lock().take() else {
            return Ok(());
        };
        let pid = child.id();
        tracing::info!(pid, "stopping daemon process");

        #[cfg(unix)]
        {
            // SIGTERM first so the daemon can flush its state
            let _ = Command::new("kill")
                .arg("-TERM")
                .arg(pid.to_string())
                .output();
        }

        let mut waited = Duration::ZERO;
        while waited < STOP_GRACE {
            if let Some(status) = child.try_wait()? {
                tracing::info!(pid, ?status, "daemon exited");
                return Ok(());
            }
            thread::sleep(STOP_POLL);
            waited += STOP_POLL;
        }

        tracing::warn!(pid, "daemon did not exit in time, killing");
        child.kill()?;
        child.wait()?;
        Ok(())
    }
}

impl Drop for DaemonHandle {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            tracing::error!("failed to stop daemon on drop: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_lived_process_is_reaped() {
        let mut command = Command::new("true");
        command.stdout(std::process::Stdio::null());

        let handle = DaemonHandle::spawn(command).unwrap();
        // `true` exits immediately; stop must not error on a dead child
        thread::sleep(Duration::from_millis(50));
        assert!(handle.stop().is_ok());
        assert!(!handle.is_running());
    }

    #[test]
    fn test_long_running_process_is_stopped() {
        let mut command = Command::new("sleep");
        command.arg("30");

        let handle = DaemonHandle::spawn(command).unwrap();
        assert!(handle.is_running());
        assert!(handle.stop().is_ok());
        assert!(!handle.is_running());
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let command = Command::new("/nonexistent/playd-daemon");
        assert!(DaemonHandle::spawn(command).is_err());
    }
}
