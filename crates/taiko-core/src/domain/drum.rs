//! The four keys of the emulated drum and the values that describe them.
//!
//! A taiko drum is struck either on the head (*Don*) or on the rim (*Ka*), on
//! the left or right side, giving four keys:
//!
//! | Key         | Index | Driven by    |
//! |-------------|-------|--------------|
//! | `LeftKa`    | 0     | button board |
//! | `LeftDon`   | 1     | touch panel  |
//! | `RightDon`  | 2     | touch panel  |
//! | `RightKa`   | 3     | button board |

use std::fmt;

/// Number of drum keys.
pub const DRUM_KEY_COUNT: usize = 4;

/// One of the four drum keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DrumKey {
    LeftKa = 0,
    LeftDon = 1,
    RightDon = 2,
    RightKa = 3,
}

impl DrumKey {
    /// All keys in index order.
    pub const ALL: [DrumKey; DRUM_KEY_COUNT] = [
        DrumKey::LeftKa,
        DrumKey::LeftDon,
        DrumKey::RightDon,
        DrumKey::RightKa,
    ];

    /// Position of this key in a [`KeySnapshot`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// `true` for the two head keys.
    pub const fn is_don(self) -> bool {
        matches!(self, DrumKey::LeftDon | DrumKey::RightDon)
    }
}

impl fmt::Display for DrumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DrumKey::LeftKa => "left-ka",
            DrumKey::LeftDon => "left-don",
            DrumKey::RightDon => "right-don",
            DrumKey::RightKa => "right-ka",
        })
    }
}

/// Direction of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEdge {
    Pressed,
    Released,
}

impl KeyEdge {
    /// The edge that moves a key into the `pressed` state.
    pub const fn to(pressed: bool) -> Self {
        if pressed {
            KeyEdge::Pressed
        } else {
            KeyEdge::Released
        }
    }
}

/// A single edge-triggered action: `key` just went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChange {
    pub key: DrumKey,
    pub edge: KeyEdge,
}

impl KeyChange {
    pub const fn pressed(key: DrumKey) -> Self {
        Self {
            key,
            edge: KeyEdge::Pressed,
        }
    }

    pub const fn released(key: DrumKey) -> Self {
        Self {
            key,
            edge: KeyEdge::Released,
        }
    }
}

impl fmt::Display for KeyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.edge {
            KeyEdge::Pressed => '+',
            KeyEdge::Released => '-',
        };
        write!(f, "{sign}{}", self.key)
    }
}

/// Held/not-held value of every key, indexed by [`DrumKey::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeySnapshot([bool; DRUM_KEY_COUNT]);

impl KeySnapshot {
    pub const fn from_array(keys: [bool; DRUM_KEY_COUNT]) -> Self {
        Self(keys)
    }

    pub fn is_pressed(&self, key: DrumKey) -> bool {
        self.0[key.index()]
    }

    pub fn set(&mut self, key: DrumKey, pressed: bool) {
        self.0[key.index()] = pressed;
    }

    pub fn as_array(&self) -> [bool; DRUM_KEY_COUNT] {
        self.0
    }
}

impl fmt::Display for KeySnapshot {
    /// Renders as `[K D . .]`: the key's initial when held, `.` when not.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marks: Vec<&str> = DrumKey::ALL
            .iter()
            .map(|&k| match (self.is_pressed(k), k.is_don()) {
                (false, _) => ".",
                (true, true) => "D",
                (true, false) => "K",
            })
            .collect();
        write!(f, "[{}]", marks.join(" "))
    }
}
