//! Submission helpers for user-initiated commands
//!
//! Each helper encodes one daemon operation and attaches the completion
//! that folds the reply back into the mirror. All of them return
//! immediately after enqueuing; `false` means the bridge is unhealthy
//! and nothing was queued.

use playd_protocol::{reply, Command, PlaybackStatus, Repeat, Request, Shuffle, SongId};

use crate::dispatch::Core;
use crate::sync;

pub(crate) fn resume(core: &Core) -> bool {
    core.submit(
        Request::new(Command::Resume).into_message(),
        |core, payload| {
            if let Ok(id) = reply::parse_int(payload) {
                core.mirror.set_current_song(id);
            }
        },
    )
}

pub(crate) fn pause(core: &Core) -> bool {
    core.submit(
        Request::new(Command::Pause).into_message(),
        |core, payload| {
            if let Ok(id) = reply::parse_int(payload) {
                core.mirror.set_current_song(id);
            }
        },
    )
}

pub(crate) fn previous(core: &Core) -> bool {
    core.submit(
        Request::new(Command::Previous).into_message(),
        |_, payload| ack(Command::Previous, payload),
    )
}

pub(crate) fn next(core: &Core) -> bool {
    core.submit(Request::new(Command::Next).into_message(), |_, payload| {
        ack(Command::Next, payload)
    })
}

pub(crate) fn set_volume(core: &Core, volume: f64) -> bool {
    core.submit(
        Request::new(Command::SetVolume).arg(volume).into_message(),
        |core, payload| {
            if let Ok(volume) = reply::parse_float(payload) {
                core.mirror.set_volume(volume);
            }
        },
    )
}

pub(crate) fn mute(core: &Core) -> bool {
    core.submit(
        Request::new(Command::Mute).into_message(),
        |core, payload| {
            if let Ok(volume) = reply::parse_float(payload) {
                core.mirror.set_volume(volume);
            }
        },
    )
}

pub(crate) fn unmute(core: &Core) -> bool {
    core.submit(
        Request::new(Command::Unmute).into_message(),
        |core, payload| {
            if let Ok(volume) = reply::parse_float(payload) {
                core.mirror.set_volume(volume);
            }
        },
    )
}

pub(crate) fn set_position(core: &Core, position: f64) -> bool {
    // Written optimistically so the UI tracks the seek before the
    // daemon confirms it
    core.mirror.set_position(position);
    core.submit(
        Request::new(Command::SetPosition).arg(position).into_message(),
        |core, payload| {
            if let Ok(position) = reply::parse_float(payload) {
                core.mirror.set_position(position);
            }
        },
    )
}

/// Jump straight to a song, bypassing the queue order
pub(crate) fn set_song(core: &Core, id: SongId) -> bool {
    core.submit(
        Request::new(Command::SetSong).arg(id).into_message(),
        |core, payload| {
            if let Ok(id) = reply::parse_int(payload) {
                core.mirror.set_current_song(id);
            }
        },
    )
}

pub(crate) fn set_queue_index(core: &Core, index: usize) -> bool {
    core.submit(
        Request::new(Command::SetQueueIdx).arg(index).into_message(),
        |core, payload| {
            if let Ok(index) = reply::parse_index(payload) {
                core.mirror.set_queue_index(index);
            }
        },
    )
}

/// Replace the daemon's queue, honoring the configured submission cap
///
/// An empty list or a cap of zero short-circuits: no message is sent.
pub(crate) fn set_queue(core: &Core, songs: &[SongId]) -> bool {
    if songs.is_empty() {
        return false;
    }
    let capped = match core.queue_limit() {
        Some(0) => return false,
        Some(limit) => &songs[..songs.len().min(limit)],
        None => songs,
    };

    let sent = capped.len();
    core.submit(
        Request::new(Command::SetQueue)
            .args(capped.iter().copied())
            .into_message(),
        move |_, payload| {
            if reply::parse_index(payload) != Ok(sent) {
                tracing::warn!(payload, "daemon accepted a different queue length");
            }
        },
    )
}

pub(crate) fn remove_from_queue(core: &Core, position: usize) -> bool {
    core.submit(
        Request::new(Command::RemoveFromQueue)
            .arg(position)
            .into_message(),
        move |_, payload| {
            if reply::parse_index(payload) != Ok(position) {
                tracing::warn!(payload, "daemon removed a different queue position");
            }
        },
    )
}

pub(crate) fn add_to_up_next(core: &Core, id: SongId) -> bool {
    core.submit(
        Request::new(Command::AddToUpNext).arg(id).into_message(),
        move |_, payload| {
            if reply::parse_int(payload) != Ok(id) {
                tracing::warn!(payload, "daemon queued a different song");
            }
        },
    )
}

pub(crate) fn remove_from_up_next(core: &Core, position: usize) -> bool {
    core.submit(
        Request::new(Command::RemoveFromUpNext)
            .arg(position)
            .into_message(),
        move |_, payload| {
            if reply::parse_index(payload) != Ok(position) {
                tracing::warn!(payload, "daemon removed a different up-next position");
            }
        },
    )
}

pub(crate) fn skip_up_next(core: &Core, count: usize) -> bool {
    core.submit(
        Request::new(Command::SkipUpNext).arg(count).into_message(),
        move |_, payload| {
            if reply::parse_index(payload) != Ok(count) {
                tracing::warn!(payload, "daemon skipped a different number of songs");
            }
        },
    )
}

pub(crate) fn set_repeat(core: &Core, mode: Repeat) -> bool {
    core.submit(
        Request::new(Command::SetRepeat).arg(mode.code()).into_message(),
        move |core, payload| {
            match reply::parse_int(payload).map(Repeat::from_code) {
                Ok(Some(applied)) => {
                    if applied != mode {
                        tracing::warn!(?applied, requested = ?mode, "repeat mode not applied");
                    }
                    core.mirror.set_repeat(applied);
                }
                _ => tracing::warn!(payload, "bad repeat reply"),
            }
        },
    )
}

pub(crate) fn set_shuffle(core: &Core, mode: Shuffle) -> bool {
    core.submit(
        Request::new(Command::SetShuffle).arg(mode.code()).into_message(),
        move |core, payload| {
            match reply::parse_int(payload).map(Shuffle::from_code) {
                Ok(Some(applied)) => {
                    if applied != mode {
                        tracing::warn!(?applied, requested = ?mode, "shuffle mode not applied");
                    }
                    // Toggling shuffle reorders the queue either way
                    sync::fetch_queue(core);
                    core.mirror.set_shuffle(applied);
                }
                _ => tracing::warn!(payload, "bad shuffle reply"),
            }
        },
    )
}

pub(crate) fn set_playing_from(core: &Core, label: &str) -> bool {
    core.submit(
        Request::new(Command::SetPlayingFrom)
            .arg(reply::label_to_wire(label))
            .into_message(),
        |core, payload| {
            core.mirror.set_playing_from(payload.to_string());
        },
    )
}

pub(crate) fn release_db_lock(core: &Core) -> bool {
    core.submit(
        Request::new(Command::ReleaseDbLock).into_message(),
        |_, payload| ack(Command::ReleaseDbLock, payload),
    )
}

pub(crate) fn reload_config(core: &Core) -> bool {
    core.submit(
        Request::new(Command::ReloadConfig).into_message(),
        |_, payload| ack(Command::ReloadConfig, payload),
    )
}

/// Log when a zero-means-ok command reports failure
fn ack(command: Command, payload: &str) {
    if reply::parse_int(payload) != Ok(0) {
        tracing::warn!(?command, payload, "daemon reported failure");
    }
}

/// Status reply check used by callers outside this module
pub(crate) fn expect_ok(payload: &str) -> crate::error::Result<()> {
    match reply::parse_int(payload)? {
        0 => Ok(()),
        code => Err(crate::error::BridgeError::Refused(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{connected_core, Step};
    use crate::worker::drain_once;

    #[test]
    fn test_set_volume_round_trip() {
        let (core, written) = connected_core(vec![Step::reply("42.5")]);

        assert!(set_volume(&core, 42.5));
        drain_once(&core);

        assert_eq!(core.mirror.volume(), 42.5);
        assert_eq!(
            written.lock().last().unwrap(),
            &format!("{}\u{1f}42.5", Command::SetVolume.code())
        );
    }

    #[test]
    fn test_set_queue_limit_zero_sends_nothing() {
        let (core, written) = connected_core(vec![]);
        core.set_queue_limit(Some(0));

        assert!(!set_queue(&core, &[1, 2, 3]));
        drain_once(&core);

        // Only the handshake ever went out
        assert_eq!(written.lock().len(), 1);
    }

    #[test]
    fn test_set_queue_truncates_to_limit() {
        let (core, written) = connected_core(vec![Step::reply("2")]);
        core.set_queue_limit(Some(2));

        assert!(set_queue(&core, &[5, 6, 7]));
        drain_once(&core);

        assert_eq!(
            written.lock().last().unwrap(),
            &Request::new(Command::SetQueue).args([5i64, 6]).into_message()
        );
    }

    #[test]
    fn test_set_queue_rejects_empty_list() {
        let (core, _) = connected_core(vec![]);
        assert!(!set_queue(&core, &[]));
    }

    #[test]
    fn test_resume_updates_current_song() {
        let (core, _) = connected_core(vec![Step::reply("23")]);

        assert!(resume(&core));
        drain_once(&core);

        assert_eq!(core.mirror.current_song(), Some(23));
    }

    #[test]
    fn test_set_shuffle_refetches_queue() {
        let (core, _) = connected_core(vec![
            Step::reply("1"),
            Step::reply("3\u{1f}1\u{1f}2"),
        ]);

        assert!(set_shuffle(&core, Shuffle::On));
        drain_once(&core);

        assert_eq!(core.mirror.shuffle(), Shuffle::On);
        assert_eq!(core.mirror.queue(), vec![3, 1, 2]);
        assert!(core.mirror.take_queue_dirty());
    }

    #[test]
    fn test_set_position_is_optimistic() {
        let (core, _) = connected_core(vec![]);

        set_position(&core, 93.5);
        // Cached before any reply arrives
        assert_eq!(core.mirror.position(), 93.5);
    }

    #[test]
    fn test_submission_rejected_while_unhealthy() {
        let (core, _) = connected_core(vec![Step::FailWrite]);

        resume(&core);
        drain_once(&core);
        assert!(!core.error().is_healthy());

        assert!(!set_volume(&core, 10.0));
        assert!(core.queue.lock().is_empty());
    }

    #[test]
    fn test_empty_label_maps_to_wire_sentinel() {
        let (core, written) = connected_core(vec![Step::reply(" ")]);

        assert!(set_playing_from(&core, ""));
        drain_once(&core);

        assert_eq!(
            written.lock().last().unwrap(),
            &format!("{}\u{1f} ", Command::SetPlayingFrom.code())
        );
        assert_eq!(core.mirror.playing_from(), "");
    }
}
