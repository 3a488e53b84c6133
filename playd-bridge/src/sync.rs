//! Periodic refresh of the state mirror
//!
//! Once per refresh interval the worker enqueues a fixed battery of
//! queries. Most replies just overwrite their mirror field; queue size
//! and queue index are triggering fields whose change enqueues a
//! bounded re-fetch of the ordered queue contents, and a shuffle change
//! re-fetches the main queue because reshuffling invalidates its order.

use playd_protocol::{reply, Command, PlaybackStatus, Repeat, Request, Shuffle};

use crate::dispatch::Core;

/// Enqueue the full battery of state-refresh queries
pub(crate) fn refresh_battery(core: &Core) {
    get_playing_from(core);
    get_position(core);
    get_queue_size(core);
    get_repeat(core);
    get_shuffle(core);
    get_song(core);
    get_queue_index(core);
    get_up_next_size(core);
    get_status(core);
    get_volume(core);
}

pub(crate) fn get_playing_from(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetPlayingFrom).into_message(),
        |core, payload| {
            core.mirror.set_playing_from(payload.to_string());
        },
    )
}

pub(crate) fn get_position(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetPosition).into_message(),
        |core, payload| match reply::parse_float(payload) {
            Ok(position) => core.mirror.set_position(position),
            Err(err) => tracing::warn!("bad position reply: {err}"),
        },
    )
}

pub(crate) fn get_queue_size(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetQueueSize).into_message(),
        |core, payload| match reply::parse_index(payload) {
            Ok(size) => {
                // A size change means the ordered contents are stale
                if core.mirror.queue_size() != size {
                    fetch_queue(core);
                }
                core.mirror.set_queue_size(size);
            }
            Err(err) => tracing::warn!("bad queue size reply: {err}"),
        },
    )
}

pub(crate) fn get_queue_index(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetQueueIdx).into_message(),
        |core, payload| match reply::parse_index(payload) {
            Ok(index) => {
                if core.mirror.queue_index() != index {
                    fetch_queue(core);
                }
                core.mirror.set_queue_index(index);
            }
            Err(err) => tracing::warn!("bad queue index reply: {err}"),
        },
    )
}

pub(crate) fn get_up_next_size(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetUpNextSize).into_message(),
        |core, payload| match reply::parse_index(payload) {
            Ok(size) => {
                if core.mirror.up_next_size() != size {
                    fetch_up_next(core);
                }
                core.mirror.set_up_next_size(size);
            }
            Err(err) => tracing::warn!("bad up-next size reply: {err}"),
        },
    )
}

pub(crate) fn get_repeat(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetRepeat).into_message(),
        |core, payload| {
            match reply::parse_int(payload).map(Repeat::from_code) {
                Ok(Some(mode)) => core.mirror.set_repeat(mode),
                _ => tracing::warn!(payload, "bad repeat reply"),
            }
        },
    )
}

pub(crate) fn get_shuffle(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetShuffle).into_message(),
        |core, payload| {
            match reply::parse_int(payload).map(Shuffle::from_code) {
                Ok(Some(mode)) => {
                    // A reshuffle reorders the queue under us
                    if core.mirror.shuffle() != mode {
                        fetch_queue(core);
                    }
                    core.mirror.set_shuffle(mode);
                }
                _ => tracing::warn!(payload, "bad shuffle reply"),
            }
        },
    )
}

pub(crate) fn get_song(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetSong).into_message(),
        |core, payload| match reply::parse_int(payload) {
            Ok(id) => core.mirror.set_current_song(id),
            Err(err) => tracing::warn!("bad song reply: {err}"),
        },
    )
}

pub(crate) fn get_status(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetStatus).into_message(),
        |core, payload| {
            match reply::parse_int(payload).map(PlaybackStatus::from_code) {
                Ok(Some(status)) => core.mirror.set_status(status),
                _ => tracing::warn!(payload, "bad status reply"),
            }
        },
    )
}

pub(crate) fn get_volume(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetVolume).into_message(),
        |core, payload| match reply::parse_float(payload) {
            Ok(volume) => core.mirror.set_volume(volume),
            Err(err) => tracing::warn!("bad volume reply: {err}"),
        },
    )
}

/// Re-fetch the bounded head of the main queue
pub(crate) fn fetch_queue(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetQueue)
            .arg(0)
            .arg(core.config.queue_fetch_max)
            .into_message(),
        |core, payload| {
            core.mirror.replace_queue(reply::parse_id_list(payload));
        },
    )
}

/// Re-fetch the bounded head of the up-next queue
pub(crate) fn fetch_up_next(core: &Core) -> bool {
    core.submit(
        Request::new(Command::GetUpNext)
            .arg(0)
            .arg(core.config.up_next_fetch_max)
            .into_message(),
        |core, payload| {
            core.mirror.replace_up_next(reply::parse_id_list(payload));
        },
    )
}
