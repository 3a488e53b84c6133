//! Locally cached mirror of the daemon's playback state
//!
//! Written only by dispatcher-invoked completions, read by any thread.
//! Scalar fields live in lock-free cells; the two queues and the
//! "playing from" label each sit behind their own mutex, distinct from
//! the command queue lock, so cache reads never contend with command
//! submission. Fields update independently - readers may observe a
//! partially stale snapshot, which is intentional: each field is a
//! cheap, independently pollable fact.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use crossbeam::atomic::AtomicCell;
use parking_lot::Mutex;
use serde::Serialize;

use playd_protocol::{reply, PlaybackStatus, Repeat, Shuffle, SongId, NO_SONG};

pub(crate) struct StateMirror {
    current_song: AtomicI64,
    position: AtomicCell<f64>,
    volume: AtomicCell<f64>,
    repeat: AtomicCell<Repeat>,
    shuffle: AtomicCell<Shuffle>,
    status: AtomicCell<PlaybackStatus>,
    queue_index: AtomicUsize,
    queue_size: AtomicUsize,
    up_next_size: AtomicUsize,
    queue_dirty: AtomicBool,
    up_next_dirty: AtomicBool,
    queue: Mutex<Vec<SongId>>,
    up_next: Mutex<Vec<SongId>>,
    playing_from: Mutex<String>,
}

impl StateMirror {
    pub(crate) fn new() -> Self {
        Self {
            current_song: AtomicI64::new(NO_SONG),
            position: AtomicCell::new(0.0),
            volume: AtomicCell::new(100.0),
            repeat: AtomicCell::new(Repeat::Off),
            shuffle: AtomicCell::new(Shuffle::Off),
            status: AtomicCell::new(PlaybackStatus::Stopped),
            queue_index: AtomicUsize::new(0),
            queue_size: AtomicUsize::new(0),
            up_next_size: AtomicUsize::new(0),
            queue_dirty: AtomicBool::new(false),
            up_next_dirty: AtomicBool::new(false),
            queue: Mutex::new(Vec::new()),
            up_next: Mutex::new(Vec::new()),
            playing_from: Mutex::new(String::new()),
        }
    }

    // ------------------------------------------------------------------
    // Readers
    // ------------------------------------------------------------------

    /// Currently loaded song, if any
    pub(crate) fn current_song(&self) -> Option<SongId> {
        let id = self.current_song.load(Ordering::Relaxed);
        (id != NO_SONG).then_some(id)
    }

    pub(crate) fn position(&self) -> f64 {
        self.position.load()
    }

    pub(crate) fn volume(&self) -> f64 {
        self.volume.load()
    }

    pub(crate) fn repeat(&self) -> Repeat {
        self.repeat.load()
    }

    pub(crate) fn shuffle(&self) -> Shuffle {
        self.shuffle.load()
    }

    pub(crate) fn status(&self) -> PlaybackStatus {
        self.status.load()
    }

    pub(crate) fn queue_index(&self) -> usize {
        self.queue_index.load(Ordering::Relaxed)
    }

    pub(crate) fn queue_size(&self) -> usize {
        self.queue_size.load(Ordering::Relaxed)
    }

    pub(crate) fn up_next_size(&self) -> usize {
        self.up_next_size.load(Ordering::Relaxed)
    }

    pub(crate) fn queue(&self) -> Vec<SongId> {
        self.queue.lock().clone()
    }

    pub(crate) fn up_next(&self) -> Vec<SongId> {
        self.up_next.lock().clone()
    }

    /// The "playing from" label, with the wire sentinel unmapped
    pub(crate) fn playing_from(&self) -> String {
        reply::label_from_wire(&self.playing_from.lock()).to_string()
    }

    /// Consume the main queue's dirty flag
    pub(crate) fn take_queue_dirty(&self) -> bool {
        self.queue_dirty.swap(false, Ordering::Relaxed)
    }

    /// Consume the up-next queue's dirty flag
    pub(crate) fn take_up_next_dirty(&self) -> bool {
        self.up_next_dirty.swap(false, Ordering::Relaxed)
    }

    // ------------------------------------------------------------------
    // Writers (dispatcher completions only)
    // ------------------------------------------------------------------

    pub(crate) fn set_current_song(&self, id: SongId) {
        self.current_song.store(id, Ordering::Relaxed);
    }

    pub(crate) fn set_position(&self, position: f64) {
        self.position.store(position);
    }

    pub(crate) fn set_volume(&self, volume: f64) {
        self.volume.store(volume);
    }

    pub(crate) fn set_repeat(&self, repeat: Repeat) {
        self.repeat.store(repeat);
    }

    pub(crate) fn set_shuffle(&self, shuffle: Shuffle) {
        self.shuffle.store(shuffle);
    }

    pub(crate) fn set_status(&self, status: PlaybackStatus) {
        self.status.store(status);
    }

    pub(crate) fn set_queue_index(&self, index: usize) {
        self.queue_index.store(index, Ordering::Relaxed);
    }

    pub(crate) fn set_queue_size(&self, size: usize) {
        self.queue_size.store(size, Ordering::Relaxed);
    }

    pub(crate) fn set_up_next_size(&self, size: usize) {
        self.up_next_size.store(size, Ordering::Relaxed);
    }

    /// Replace the main queue contents and mark them changed
    pub(crate) fn replace_queue(&self, songs: Vec<SongId>) {
        *self.queue.lock() = songs;
        self.queue_dirty.store(true, Ordering::Relaxed);
    }

    /// Replace the up-next contents and mark them changed
    pub(crate) fn replace_up_next(&self, songs: Vec<SongId>) {
        *self.up_next.lock() = songs;
        self.up_next_dirty.store(true, Ordering::Relaxed);
    }

    /// Store the label exactly as received; unmapping happens on read
    pub(crate) fn set_playing_from(&self, label: String) {
        *self.playing_from.lock() = label;
    }

    /// Copy-on-read aggregate of every cached field
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_song: self.current_song(),
            position: self.position(),
            volume: self.volume(),
            repeat: self.repeat(),
            shuffle: self.shuffle(),
            status: self.status(),
            queue_index: self.queue_index(),
            queue_size: self.queue_size(),
            up_next_size: self.up_next_size(),
            playing_from: self.playing_from(),
            queue: self.queue(),
            up_next: self.up_next(),
        }
    }
}

/// One point-in-time copy of the mirrored playback state
///
/// Fields are sampled individually, not transactionally; two fields may
/// come from different refresh cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub current_song: Option<SongId>,
    pub position: f64,
    pub volume: f64,
    pub repeat: Repeat,
    pub shuffle: Shuffle,
    pub status: PlaybackStatus,
    pub queue_index: usize,
    pub queue_size: usize,
    pub up_next_size: usize,
    pub playing_from: String,
    pub queue: Vec<SongId>,
    pub up_next: Vec<SongId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_song_maps_to_none() {
        let mirror = StateMirror::new();
        assert_eq!(mirror.current_song(), None);

        mirror.set_current_song(17);
        assert_eq!(mirror.current_song(), Some(17));

        mirror.set_current_song(NO_SONG);
        assert_eq!(mirror.current_song(), None);
    }

    #[test]
    fn test_playing_from_unmaps_sentinel() {
        let mirror = StateMirror::new();

        mirror.set_playing_from(" ".to_string());
        assert_eq!(mirror.playing_from(), "");

        mirror.set_playing_from("Road Trip".to_string());
        assert_eq!(mirror.playing_from(), "Road Trip");

        // Two spaces is a real label, not the sentinel
        mirror.set_playing_from("  ".to_string());
        assert_eq!(mirror.playing_from(), "  ");
    }

    #[test]
    fn test_dirty_flags_are_consumed() {
        let mirror = StateMirror::new();
        assert!(!mirror.take_queue_dirty());

        mirror.replace_queue(vec![1, 2, 3]);
        assert!(mirror.take_queue_dirty());
        assert!(!mirror.take_queue_dirty());
        assert_eq!(mirror.queue(), vec![1, 2, 3]);

        mirror.replace_up_next(vec![9]);
        assert!(mirror.take_up_next_dirty());
        assert!(!mirror.take_up_next_dirty());
    }

    #[test]
    fn test_snapshot_copies_fields() {
        let mirror = StateMirror::new();
        mirror.set_volume(55.5);
        mirror.set_status(PlaybackStatus::Playing);
        mirror.replace_queue(vec![4, 5]);

        let snapshot = mirror.snapshot();
        assert_eq!(snapshot.volume, 55.5);
        assert_eq!(snapshot.status, PlaybackStatus::Playing);
        assert_eq!(snapshot.queue, vec![4, 5]);

        // Later writes do not retroactively change the copy
        mirror.set_volume(10.0);
        assert_eq!(snapshot.volume, 55.5);
    }
}
