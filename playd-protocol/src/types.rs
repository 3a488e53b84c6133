//! Shared playback types carried on the wire

use serde::{Deserialize, Serialize};

/// Identifier of a song in the shared library
pub type SongId = i64;

/// Wire value meaning "no song"
pub const NO_SONG: SongId = -1;

/// Repeat behavior of the main queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repeat {
    #[default]
    Off,
    One,
    All,
}

impl Repeat {
    pub fn code(self) -> u8 {
        match self {
            Repeat::Off => 0,
            Repeat::One => 1,
            Repeat::All => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Repeat::Off),
            1 => Some(Repeat::One),
            2 => Some(Repeat::All),
            _ => None,
        }
    }
}

/// Shuffle behavior of the main queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shuffle {
    #[default]
    Off,
    On,
}

impl Shuffle {
    pub fn code(self) -> u8 {
        match self {
            Shuffle::Off => 0,
            Shuffle::On => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Shuffle::Off),
            1 => Some(Shuffle::On),
            _ => None,
        }
    }
}

/// What the daemon is currently doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    Error,
    Playing,
    Paused,
    #[default]
    Stopped,
}

impl PlaybackStatus {
    pub fn code(self) -> u8 {
        match self {
            PlaybackStatus::Error => 0,
            PlaybackStatus::Playing => 1,
            PlaybackStatus::Paused => 2,
            PlaybackStatus::Stopped => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PlaybackStatus::Error),
            1 => Some(PlaybackStatus::Playing),
            2 => Some(PlaybackStatus::Paused),
            3 => Some(PlaybackStatus::Stopped),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Some(Repeat::Off))]
    #[case(1, Some(Repeat::One))]
    #[case(2, Some(Repeat::All))]
    #[case(3, None)]
    #[case(-1, None)]
    fn test_repeat_from_code(#[case] code: i64, #[case] expected: Option<Repeat>) {
        assert_eq!(Repeat::from_code(code), expected);
    }

    #[rstest]
    #[case(Repeat::Off)]
    #[case(Repeat::One)]
    #[case(Repeat::All)]
    fn test_repeat_code_round_trip(#[case] mode: Repeat) {
        assert_eq!(Repeat::from_code(i64::from(mode.code())), Some(mode));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PlaybackStatus::from_code(1), Some(PlaybackStatus::Playing));
        assert_eq!(PlaybackStatus::from_code(9), None);
        assert_eq!(PlaybackStatus::Stopped.code(), 3);
    }

    #[test]
    fn test_shuffle_codes() {
        assert_eq!(Shuffle::from_code(0), Some(Shuffle::Off));
        assert_eq!(Shuffle::from_code(1), Some(Shuffle::On));
        assert_eq!(Shuffle::from_code(2), None);
    }
}
