//! Watch the daemon's playback state from the terminal
//!
//! Demonstrates the intended ownership model: the bridge worker keeps
//! the mirror fresh while this thread only polls cached fields, and
//! reconnection is driven by the watchdog loop, not by the bridge.

use std::net::SocketAddr;
use std::thread;
use std::time::Duration;

use playd_bridge::{init_logging, Bridge, ErrorState, LoggingMode};

fn main() {
    init_logging(LoggingMode::Development).expect("logging setup");

    let addr: SocketAddr = ([127, 0, 0, 1], playd_protocol::PORT).into();
    let bridge = Bridge::tcp(addr);

    loop {
        match bridge.error() {
            ErrorState::None => {
                let snapshot = bridge.snapshot();
                println!(
                    "{:?} song={:?} pos={:.1}s vol={:.0} queue={}({}) from={:?}",
                    snapshot.status,
                    snapshot.current_song,
                    snapshot.position,
                    snapshot.volume,
                    snapshot.queue_index,
                    snapshot.queue_size,
                    snapshot.playing_from,
                );
            }
            ErrorState::LostConnection => {
                // Recovery is always explicit
                eprintln!("connection lost, reconnecting...");
                bridge.reconnect();
            }
            state => {
                eprintln!("bridge unhealthy: {state:?}");
            }
        }

        thread::sleep(Duration::from_secs(1));
    }
}
