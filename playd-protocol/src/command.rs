//! Command codes understood by the daemon

/// Every operation the daemon accepts, with its wire code
///
/// Codes are stable; appending is the only permitted evolution, and any
/// change that alters existing codes must bump [`crate::VERSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    Version = 0,
    Resume = 1,
    Pause = 2,
    Previous = 3,
    Next = 4,
    GetVolume = 5,
    SetVolume = 6,
    Mute = 7,
    Unmute = 8,
    GetSong = 9,
    GetStatus = 10,
    GetPosition = 11,
    SetPosition = 12,
    GetRepeat = 13,
    SetRepeat = 14,
    GetShuffle = 15,
    SetShuffle = 16,
    GetQueue = 17,
    SetQueue = 18,
    GetQueueIdx = 19,
    SetQueueIdx = 20,
    GetQueueSize = 21,
    RemoveFromQueue = 22,
    GetUpNext = 23,
    AddToUpNext = 24,
    RemoveFromUpNext = 25,
    SkipUpNext = 26,
    GetUpNextSize = 27,
    GetPlayingFrom = 28,
    SetPlayingFrom = 29,
    RequestDbLock = 30,
    ReleaseDbLock = 31,
    ReloadConfig = 32,
    Reset = 33,
    SetSong = 34,
}

impl Command {
    /// The decimal code written on the wire
    pub fn code(self) -> u8 {
        self as u8
    }
}
