//! HID Usage ID to X11 KeySym translation for Linux.
//!
//! X11 KeySym values are defined in X11/keysymdef.h.
//!
//! XTest injects *keycodes*, not KeySyms; the injector resolves each KeySym to
//! the server's keycode with `XKeysymToKeycode`.  Letters map to their
//! lowercase KeySym because that is the unshifted symbol on the key.

use super::hid::HidKeyCode;

/// Translates a [`HidKeyCode`] to an X11 KeySym value.
pub fn hid_to_keysym(hid: HidKeyCode) -> u32 {
    use HidKeyCode::*;
    match hid {
        // Letters (X11 lowercase keysyms 0x61-0x7A)
        KeyA => 0x0061,
        KeyB => 0x0062,
        KeyC => 0x0063,
        KeyD => 0x0064,
        KeyE => 0x0065,
        KeyF => 0x0066,
        KeyG => 0x0067,
        KeyH => 0x0068,
        KeyI => 0x0069,
        KeyJ => 0x006A,
        KeyK => 0x006B,
        KeyL => 0x006C,
        KeyM => 0x006D,
        KeyN => 0x006E,
        KeyO => 0x006F,
        KeyP => 0x0070,
        KeyQ => 0x0071,
        KeyR => 0x0072,
        KeyS => 0x0073,
        KeyT => 0x0074,
        KeyU => 0x0075,
        KeyV => 0x0076,
        KeyW => 0x0077,
        KeyX => 0x0078,
        KeyY => 0x0079,
        KeyZ => 0x007A,

        // Digits (X11 0x30-0x39)
        Digit0 => 0x0030,
        Digit1 => 0x0031,
        Digit2 => 0x0032,
        Digit3 => 0x0033,
        Digit4 => 0x0034,
        Digit5 => 0x0035,
        Digit6 => 0x0036,
        Digit7 => 0x0037,
        Digit8 => 0x0038,
        Digit9 => 0x0039,

        Enter => 0xFF0D,  // XK_Return
        Escape => 0xFF1B, // XK_Escape
        Tab => 0xFF09,    // XK_Tab
        Space => 0x0020,  // XK_space

        Minus => 0x002D,        // XK_minus
        Equal => 0x003D,        // XK_equal
        BracketLeft => 0x005B,  // XK_bracketleft
        BracketRight => 0x005D, // XK_bracketright
        Semicolon => 0x003B,    // XK_semicolon
        Quote => 0x0027,        // XK_apostrophe
        Comma => 0x002C,        // XK_comma
        Period => 0x002E,       // XK_period
        Slash => 0x002F,        // XK_slash

        F1 => 0xFFBE,
        F2 => 0xFFBF,
        F3 => 0xFFC0,
        F4 => 0xFFC1,
        F5 => 0xFFC2,
        F6 => 0xFFC3,
        F7 => 0xFFC4,
        F8 => 0xFFC5,
        F9 => 0xFFC6,
        F10 => 0xFFC7,
        F11 => 0xFFC8,
        F12 => 0xFFC9,

        ArrowLeft => 0xFF51,
        ArrowUp => 0xFF52,
        ArrowRight => 0xFF53,
        ArrowDown => 0xFF54,

        Numpad0 => 0xFFB0, // XK_KP_0
        Numpad1 => 0xFFB1,
        Numpad2 => 0xFFB2,
        Numpad3 => 0xFFB3,
        Numpad4 => 0xFFB4,
        Numpad5 => 0xFFB5,
        Numpad6 => 0xFFB6,
        Numpad7 => 0xFFB7,
        Numpad8 => 0xFFB8,
        Numpad9 => 0xFFB9,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_map_to_lowercase_ascii() {
        assert_eq!(hid_to_keysym(HidKeyCode::KeyD), u32::from(b'd'));
        assert_eq!(hid_to_keysym(HidKeyCode::KeyK), u32::from(b'k'));
    }

    #[test]
    fn test_function_keys_are_contiguous() {
        assert_eq!(hid_to_keysym(HidKeyCode::F12) - hid_to_keysym(HidKeyCode::F1), 11);
    }
}
