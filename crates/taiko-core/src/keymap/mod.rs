//! Key code translation tables for drum key bindings.
//!
//! The canonical representation is USB HID Usage IDs (page 0x07,
//! Keyboard/Keypad).  Platform-specific codes are produced at the injection
//! boundary.

pub mod hid;
pub mod linux_x11;
pub mod windows_vk;

pub use hid::HidKeyCode;

/// Unified key mapper providing all translation directions.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates a [`HidKeyCode`] to a Windows Virtual Key code.
    pub fn hid_to_windows_vk(hid: HidKeyCode) -> u8 {
        windows_vk::hid_to_vk(hid)
    }

    /// Translates a [`HidKeyCode`] to an X11 KeySym value for Linux.
    pub fn hid_to_x11_keysym(hid: HidKeyCode) -> u32 {
        linux_x11::hid_to_keysym(hid)
    }
}
