//! HID Usage ID to Windows Virtual Key (VK) code translation.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//!
//! Windows assigns each logical key a "Virtual Key code" (`VK_*`).  `SendInput`
//! accepts a VK together with a hardware scan code; the scan code is derived
//! from the VK at injection time with `MapVirtualKeyW`, so this table only
//! needs the VK.  Games that read raw scan codes (DirectInput) see the same
//! key as one pressed on a physical keyboard.

use super::hid::HidKeyCode;

/// Translates a [`HidKeyCode`] to its Windows Virtual Key code.
///
/// Every bindable key has a VK, so this never fails.
pub fn hid_to_vk(hid: HidKeyCode) -> u8 {
    use HidKeyCode::*;
    match hid {
        // Letters: VK_A = 0x41 … VK_Z = 0x5A
        KeyA => 0x41,
        KeyB => 0x42,
        KeyC => 0x43,
        KeyD => 0x44,
        KeyE => 0x45,
        KeyF => 0x46,
        KeyG => 0x47,
        KeyH => 0x48,
        KeyI => 0x49,
        KeyJ => 0x4A,
        KeyK => 0x4B,
        KeyL => 0x4C,
        KeyM => 0x4D,
        KeyN => 0x4E,
        KeyO => 0x4F,
        KeyP => 0x50,
        KeyQ => 0x51,
        KeyR => 0x52,
        KeyS => 0x53,
        KeyT => 0x54,
        KeyU => 0x55,
        KeyV => 0x56,
        KeyW => 0x57,
        KeyX => 0x58,
        KeyY => 0x59,
        KeyZ => 0x5A,

        // Digit row: VK_0 = 0x30 … VK_9 = 0x39
        Digit0 => 0x30,
        Digit1 => 0x31,
        Digit2 => 0x32,
        Digit3 => 0x33,
        Digit4 => 0x34,
        Digit5 => 0x35,
        Digit6 => 0x36,
        Digit7 => 0x37,
        Digit8 => 0x38,
        Digit9 => 0x39,

        Enter => 0x0D,  // VK_RETURN
        Escape => 0x1B, // VK_ESCAPE
        Tab => 0x09,    // VK_TAB
        Space => 0x20,  // VK_SPACE

        // OEM punctuation (US layout positions)
        Minus => 0xBD,        // VK_OEM_MINUS
        Equal => 0xBB,        // VK_OEM_PLUS
        BracketLeft => 0xDB,  // VK_OEM_4
        BracketRight => 0xDD, // VK_OEM_6
        Semicolon => 0xBA,    // VK_OEM_1
        Quote => 0xDE,        // VK_OEM_7
        Comma => 0xBC,        // VK_OEM_COMMA
        Period => 0xBE,       // VK_OEM_PERIOD
        Slash => 0xBF,        // VK_OEM_2

        // Function keys: VK_F1 = 0x70 … VK_F12 = 0x7B
        F1 => 0x70,
        F2 => 0x71,
        F3 => 0x72,
        F4 => 0x73,
        F5 => 0x74,
        F6 => 0x75,
        F7 => 0x76,
        F8 => 0x77,
        F9 => 0x78,
        F10 => 0x79,
        F11 => 0x7A,
        F12 => 0x7B,

        ArrowLeft => 0x25,
        ArrowUp => 0x26,
        ArrowRight => 0x27,
        ArrowDown => 0x28,

        // Numpad: VK_NUMPAD0 = 0x60 … VK_NUMPAD9 = 0x69
        Numpad0 => 0x60,
        Numpad1 => 0x61,
        Numpad2 => 0x62,
        Numpad3 => 0x63,
        Numpad4 => 0x64,
        Numpad5 => 0x65,
        Numpad6 => 0x66,
        Numpad7 => 0x67,
        Numpad8 => 0x68,
        Numpad9 => 0x69,
    }
}

/// Returns `true` if the VK must be injected with `KEYEVENTF_EXTENDEDKEY`.
///
/// Of the bindable keys only the arrow cluster is extended.
pub fn is_extended_vk(vk: u8) -> bool {
    matches!(vk, 0x25..=0x28)
}
