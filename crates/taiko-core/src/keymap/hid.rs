//! USB HID Usage IDs (page 0x07, Keyboard/Keypad page) for bindable keys.
//!
//! This is the canonical, platform-independent name for the keyboard key each
//! drum key is bound to.  Platform codes are derived from it at the injection
//! boundary (see [`super::windows_vk`] and [`super::linux_x11`]).
//!
//! Reference: USB HID Usage Tables 1.3, Section 10 (Keyboard/Keypad page 0x07).
//!
//! # Why HID codes for bindings?
//!
//! HID codes name **physical key positions**, not characters, so a binding of
//! `KeyD` means "the key where D sits on a US layout" on every platform and
//! keyboard layout.  Rhythm games read key positions too, which makes this the
//! natural unit for a drum binding.
//!
//! Only keys that make sense as a drum binding are listed: letters, digits,
//! main-block punctuation, space/enter/escape/tab, arrows, function keys and
//! the numpad digits.  In a config file each key is written by its variant
//! name, e.g. `left_don = "KeyF"`.

use serde::{Deserialize, Serialize};

/// USB HID Usage ID for a bindable keyboard key (page 0x07).
///
/// The numeric value of each variant is its HID Usage ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum HidKeyCode {
    // Letters (HID 0x04–0x1D)
    KeyA = 0x04,
    KeyB = 0x05,
    KeyC = 0x06,
    KeyD = 0x07,
    KeyE = 0x08,
    KeyF = 0x09,
    KeyG = 0x0A,
    KeyH = 0x0B,
    KeyI = 0x0C,
    KeyJ = 0x0D,
    KeyK = 0x0E,
    KeyL = 0x0F,
    KeyM = 0x10,
    KeyN = 0x11,
    KeyO = 0x12,
    KeyP = 0x13,
    KeyQ = 0x14,
    KeyR = 0x15,
    KeyS = 0x16,
    KeyT = 0x17,
    KeyU = 0x18,
    KeyV = 0x19,
    KeyW = 0x1A,
    KeyX = 0x1B,
    KeyY = 0x1C,
    KeyZ = 0x1D,

    // Digits (HID 0x1E–0x27)
    Digit1 = 0x1E,
    Digit2 = 0x1F,
    Digit3 = 0x20,
    Digit4 = 0x21,
    Digit5 = 0x22,
    Digit6 = 0x23,
    Digit7 = 0x24,
    Digit8 = 0x25,
    Digit9 = 0x26,
    Digit0 = 0x27,

    // Control and punctuation keys (HID 0x28–0x38)
    Enter = 0x28,
    Escape = 0x29,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Semicolon = 0x33,
    Quote = 0x34,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,

    // Function keys (HID 0x3A–0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Arrows (HID 0x4F–0x52)
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,

    // Numpad digits (HID 0x59–0x62)
    Numpad1 = 0x59,
    Numpad2 = 0x5A,
    Numpad3 = 0x5B,
    Numpad4 = 0x5C,
    Numpad5 = 0x5D,
    Numpad6 = 0x5E,
    Numpad7 = 0x5F,
    Numpad8 = 0x60,
    Numpad9 = 0x61,
    Numpad0 = 0x62,
}

impl HidKeyCode {
    /// Returns the raw HID Usage ID.
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_drum_bindings_have_expected_usage_ids() {
        assert_eq!(HidKeyCode::KeyD.as_u16(), 0x07);
        assert_eq!(HidKeyCode::KeyF.as_u16(), 0x09);
        assert_eq!(HidKeyCode::KeyJ.as_u16(), 0x0D);
        assert_eq!(HidKeyCode::KeyK.as_u16(), 0x0E);
    }

    #[test]
    fn test_keys_deserialize_from_variant_name() {
        use serde::de::{value::StrDeserializer, IntoDeserializer};

        let de: StrDeserializer<'_, serde::de::value::Error> = "KeyJ".into_deserializer();
        assert_eq!(HidKeyCode::deserialize(de).unwrap(), HidKeyCode::KeyJ);
    }
}
