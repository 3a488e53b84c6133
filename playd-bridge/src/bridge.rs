//! The public bridge handle
//!
//! A `Bridge` owns one connection to the playback daemon and one worker
//! thread that drains its command queue. Every send method returns as
//! soon as the command is enqueued; the mirror accessors read the
//! locally cached state without touching the network.

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use frame_socket::{Connector, TcpConnector};
use playd_protocol::{reply, Command, PlaybackStatus, Repeat, Request, Shuffle, SongId};

use crate::commands;
use crate::daemon::{self, DaemonHandle};
use crate::dispatch::Core;
use crate::error::{BridgeError, ErrorState, Result};
use crate::mirror::Snapshot;
use crate::sync;
use crate::worker;

/// Tunables for one bridge instance
///
/// These are construction parameters, not a config file; loading
/// configuration from disk is the application's business.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Cadence of the automatic state refresh battery
    pub refresh_interval: Duration,
    /// Sleep between health checks while the bridge is unhealthy
    pub error_retry: Duration,
    /// Sleep between queue polls while idle
    pub idle_poll: Duration,
    /// Upper bound of the main-queue content fetch range
    pub queue_fetch_max: usize,
    /// Upper bound of the up-next content fetch range
    pub up_next_fetch_max: usize,
    /// Cap on songs sent by `set_queue`; `None` means unlimited and
    /// zero drops the send entirely
    pub queue_limit: Option<usize>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(100),
            error_retry: Duration::from_millis(50),
            idle_poll: Duration::from_millis(5),
            queue_fetch_max: 25_000,
            up_next_fetch_max: 5_000,
            queue_limit: None,
        }
    }
}

/// Client-side bridge to the playback daemon
///
/// # Example
///
/// ```rust,ignore
/// use playd_bridge::Bridge;
///
/// let bridge = Bridge::tcp(([127, 0, 0, 1], playd_protocol::PORT).into());
/// bridge.set_volume(65.0);
///
/// // The worker refreshes the mirror on its own cadence
/// println!("status: {:?}", bridge.status());
///
/// // Recovery is explicit: watch the error state and reconnect
/// if !bridge.error().is_healthy() {
///     bridge.reconnect();
/// }
/// ```
pub struct Bridge {
    core: Arc<Core>,
    worker: Option<JoinHandle<()>>,
}

impl Bridge {
    /// Connect over TCP with default configuration
    pub fn tcp(addr: SocketAddr) -> Self {
        Self::new(Box::new(
            TcpConnector::new(addr).with_timeout(playd_protocol::TIMEOUT),
        ))
    }

    /// Connect through the given connector with default configuration
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self::with_config(connector, BridgeConfig::default())
    }

    /// Connect through the given connector
    ///
    /// Construction always succeeds; a failed connection attempt is
    /// recorded in [`Bridge::error`] rather than returned, and the
    /// caller recovers with [`Bridge::reconnect`].
    pub fn with_config(connector: Box<dyn Connector>, config: BridgeConfig) -> Self {
        let core = Arc::new(Core::new(connector, config));
        core.reconnect();

        // Seed the ordered queues so the mirror is complete before the
        // first size change would trigger a fetch
        sync::fetch_queue(&core);
        sync::fetch_up_next(&core);

        let worker = worker::spawn_worker(Arc::clone(&core));
        Self {
            core,
            worker: Some(worker),
        }
    }

    // ------------------------------------------------------------------
    // Health and lifecycle
    // ------------------------------------------------------------------

    /// Current connection health
    pub fn error(&self) -> ErrorState {
        self.core.error()
    }

    /// Tear down the current connection and redo connect + handshake
    ///
    /// Never automatic: callers observe a non-healthy [`Bridge::error`]
    /// and decide when to retry.
    pub fn reconnect(&self) {
        self.core.reconnect();
    }

    /// Stop the worker and discard any queued commands
    pub fn shutdown(mut self) {
        self.stop_worker();
    }

    fn stop_worker(&mut self) {
        self.core.request_exit();
        self.core.clear_queue(ErrorState::LostConnection);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    // ------------------------------------------------------------------
    // Playback control (fire and forget)
    // ------------------------------------------------------------------

    pub fn resume(&self) -> bool {
        commands::resume(&self.core)
    }

    pub fn pause(&self) -> bool {
        commands::pause(&self.core)
    }

    pub fn previous(&self) -> bool {
        commands::previous(&self.core)
    }

    pub fn next(&self) -> bool {
        commands::next(&self.core)
    }

    pub fn set_volume(&self, volume: f64) -> bool {
        commands::set_volume(&self.core, volume)
    }

    pub fn mute(&self) -> bool {
        commands::mute(&self.core)
    }

    pub fn unmute(&self) -> bool {
        commands::unmute(&self.core)
    }

    /// Seek within the current song (seconds)
    pub fn set_position(&self, position: f64) -> bool {
        commands::set_position(&self.core, position)
    }

    pub fn set_repeat(&self, mode: Repeat) -> bool {
        commands::set_repeat(&self.core, mode)
    }

    pub fn set_shuffle(&self, mode: Shuffle) -> bool {
        commands::set_shuffle(&self.core, mode)
    }

    pub fn set_playing_from(&self, label: &str) -> bool {
        commands::set_playing_from(&self.core, label)
    }

    /// Jump straight to a song, bypassing the queue order
    pub fn set_song(&self, id: SongId) -> bool {
        commands::set_song(&self.core, id)
    }

    // ------------------------------------------------------------------
    // Queue management
    // ------------------------------------------------------------------

    /// Replace the daemon's queue with the given songs
    pub fn set_queue(&self, songs: &[SongId]) -> bool {
        commands::set_queue(&self.core, songs)
    }

    pub fn set_queue_index(&self, index: usize) -> bool {
        commands::set_queue_index(&self.core, index)
    }

    pub fn remove_from_queue(&self, position: usize) -> bool {
        commands::remove_from_queue(&self.core, position)
    }

    pub fn add_to_up_next(&self, id: SongId) -> bool {
        commands::add_to_up_next(&self.core, id)
    }

    pub fn remove_from_up_next(&self, position: usize) -> bool {
        commands::remove_from_up_next(&self.core, position)
    }

    pub fn skip_up_next(&self, count: usize) -> bool {
        commands::skip_up_next(&self.core, count)
    }

    /// Override the configured `set_queue` submission cap at runtime
    pub fn set_queue_limit(&self, limit: Option<usize>) {
        self.core.set_queue_limit(limit);
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Release the exclusive write lock on the shared library store
    pub fn release_db_lock(&self) -> bool {
        commands::release_db_lock(&self.core)
    }

    /// Ask the daemon to reload its configuration
    pub fn reload_config(&self) -> bool {
        commands::reload_config(&self.core)
    }

    // ------------------------------------------------------------------
    // Blocking operations
    // ------------------------------------------------------------------

    /// Acquire the exclusive write lock on the shared library store,
    /// blocking until the daemon grants it
    ///
    /// Unblocks with [`BridgeError::Unhealthy`] if the connection fails
    /// while waiting.
    pub fn wait_db_lock(&self) -> Result<()> {
        let ticket = self
            .core
            .submit_ticket(Request::new(Command::RequestDbLock).into_message());
        match ticket.wait() {
            Ok(payload) => commands::expect_ok(&payload),
            Err(error) => Err(BridgeError::Unhealthy(error)),
        }
    }

    /// Reset the daemon's playback state and wait for completion
    pub fn wait_reset(&self) -> Result<()> {
        let ticket = self
            .core
            .submit_ticket(Request::new(Command::Reset).into_message());
        match ticket.wait() {
            Ok(_) => Ok(()),
            Err(error) => Err(BridgeError::Unhealthy(error)),
        }
    }

    /// Query the queue index and wait for the fresh value
    pub fn wait_queue_index(&self) -> Result<usize> {
        let ticket = self
            .core
            .submit_ticket(Request::new(Command::GetQueueIdx).into_message());
        match ticket.wait() {
            Ok(payload) => {
                let index = reply::parse_index(&payload)?;
                self.core.mirror.set_queue_index(index);
                Ok(index)
            }
            Err(error) => Err(BridgeError::Unhealthy(error)),
        }
    }

    // ------------------------------------------------------------------
    // Daemon process control
    // ------------------------------------------------------------------

    /// Stop the background daemon process
    ///
    /// On success the bridge is marked [`ErrorState::LostConnection`]
    /// immediately instead of waiting for the next write to fail.
    pub fn terminate_daemon(&self, handle: &DaemonHandle) -> daemon::Result<()> {
        handle.stop()?;
        self.core.set_error(ErrorState::LostConnection);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mirror accessors
    // ------------------------------------------------------------------

    /// Currently loaded song, if any
    pub fn current_song(&self) -> Option<SongId> {
        self.core.mirror.current_song()
    }

    /// Playback position in seconds
    pub fn position(&self) -> f64 {
        self.core.mirror.position()
    }

    /// Volume, 0 to 100
    pub fn volume(&self) -> f64 {
        self.core.mirror.volume()
    }

    pub fn repeat(&self) -> Repeat {
        self.core.mirror.repeat()
    }

    pub fn shuffle(&self) -> Shuffle {
        self.core.mirror.shuffle()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.core.mirror.status()
    }

    /// Where playback was started from, empty when unset
    pub fn playing_from(&self) -> String {
        self.core.mirror.playing_from()
    }

    pub fn queue(&self) -> Vec<SongId> {
        self.core.mirror.queue()
    }

    pub fn queue_index(&self) -> usize {
        self.core.mirror.queue_index()
    }

    pub fn queue_size(&self) -> usize {
        self.core.mirror.queue_size()
    }

    /// Whether the cached queue contents changed since the last call
    pub fn queue_changed(&self) -> bool {
        self.core.mirror.take_queue_dirty()
    }

    pub fn up_next(&self) -> Vec<SongId> {
        self.core.mirror.up_next()
    }

    pub fn up_next_size(&self) -> usize {
        self.core.mirror.up_next_size()
    }

    /// Whether the cached up-next contents changed since the last call
    pub fn up_next_changed(&self) -> bool {
        self.core.mirror.take_up_next_dirty()
    }

    /// One point-in-time copy of every cached field
    pub fn snapshot(&self) -> Snapshot {
        self.core.mirror.snapshot()
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("error", &self.error())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::test_support::{ScriptedConnector, Step};
    use playd_protocol::VERSION;

    /// Poll `probe` until it returns true or the deadline passes
    fn wait_until(probe: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if probe() {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        panic!("condition not reached within deadline");
    }

    /// A config whose periodic refresh never fires, so scripted replies
    /// line up with the commands the test submits
    fn quiet_config() -> BridgeConfig {
        BridgeConfig {
            refresh_interval: Duration::from_secs(3600),
            ..BridgeConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_set_volume() {
        let connector = ScriptedConnector::single(vec![
            Step::reply(VERSION.to_string()), // handshake
            Step::reply("7"),                 // seeded queue fetch
            Step::reply("8"),                 // seeded up-next fetch
            Step::reply("42.5"),              // set volume
        ]);

        let bridge = Bridge::with_config(Box::new(connector), quiet_config());
        wait_until(|| bridge.queue() == vec![7]);

        assert!(bridge.set_volume(42.5));
        wait_until(|| bridge.volume() == 42.5);

        assert!(bridge.error().is_healthy());
        bridge.shutdown();
    }

    #[test]
    fn test_construction_records_failed_connection() {
        let bridge = Bridge::with_config(
            Box::new(ScriptedConnector::unreachable()),
            quiet_config(),
        );

        assert_eq!(bridge.error(), ErrorState::NotConnected);
        // Submissions are rejected while unhealthy
        assert!(!bridge.resume());
    }

    #[test]
    fn test_blocking_wait_unblocks_on_connection_failure() {
        let connector = ScriptedConnector::single(vec![
            Step::reply(VERSION.to_string()),
            Step::reply("\u{1f}"), // seeded queue fetch: empty queue
            Step::reply("\u{1f}"), // seeded up-next fetch
            Step::FailWrite,       // the lock request dies
        ]);

        let bridge = Bridge::with_config(Box::new(connector), quiet_config());
        wait_until(|| bridge.queue_changed());

        match bridge.wait_db_lock() {
            Err(BridgeError::Unhealthy(ErrorState::LostConnection)) => {}
            other => panic!("expected Unhealthy(LostConnection), got {:?}", other),
        }
        assert_eq!(bridge.error(), ErrorState::LostConnection);
    }

    #[test]
    fn test_wait_db_lock_granted() {
        let connector = ScriptedConnector::single(vec![
            Step::reply(VERSION.to_string()),
            Step::reply("\u{1f}"),
            Step::reply("\u{1f}"),
            Step::reply("0"), // lock granted
        ]);

        let bridge = Bridge::with_config(Box::new(connector), quiet_config());
        assert!(bridge.wait_db_lock().is_ok());
    }

    #[test]
    fn test_wait_queue_index_returns_fresh_value() {
        let connector = ScriptedConnector::single(vec![
            Step::reply(VERSION.to_string()),
            Step::reply("\u{1f}"),
            Step::reply("\u{1f}"),
            Step::reply("6"),
        ]);

        let bridge = Bridge::with_config(Box::new(connector), quiet_config());
        assert_eq!(bridge.wait_queue_index().unwrap(), 6);
        assert_eq!(bridge.queue_index(), 6);
    }
}
