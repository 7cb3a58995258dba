//! Windows key injection via the SendInput API.
//!
//! Translates HID Usage IDs to Windows Virtual Key codes, looks up the
//! matching hardware scan code, and injects both with `SendInput`.  Filling in
//! the scan code matters for rhythm games: many read keys through DirectInput
//! or raw input, which only sees the scan code.

#![cfg(target_os = "windows")]

use taiko_core::keymap::{hid::HidKeyCode, windows_vk::is_extended_vk, KeyMapper};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    MapVirtualKeyW, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, MAPVK_VK_TO_VSC, VIRTUAL_KEY,
};

use crate::application::inject_keys::{InjectError, KeyInjector};

/// Windows implementation of [`KeyInjector`] using SendInput.
pub struct WindowsKeyInjector;

impl WindowsKeyInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsKeyInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyInjector for WindowsKeyInjector {
    fn emit_key_down(&self, key: HidKeyCode) -> Result<(), InjectError> {
        send_key(KeyMapper::hid_to_windows_vk(key), false)
    }

    fn emit_key_up(&self, key: HidKeyCode) -> Result<(), InjectError> {
        send_key(KeyMapper::hid_to_windows_vk(key), true)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn send_key(vk: u8, key_up: bool) -> Result<(), InjectError> {
    let mut flags = KEYBD_EVENT_FLAGS(0);
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }
    if is_extended_vk(vk) {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }

    // SAFETY: MapVirtualKeyW has no preconditions
    let scan = unsafe { MapVirtualKeyW(u32::from(vk), MAPVK_VK_TO_VSC) };

    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(u16::from(vk)),
                wScan: scan as u16,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };
    // SAFETY: input is a valid KEYBDINPUT structure on the stack
    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent == 0 {
        // Blocked by UIPI or another input-injection filter.
        return Err(InjectError::Platform(format!(
            "SendInput rejected vk 0x{vk:02X}: {}",
            windows::core::Error::from_win32()
        )));
    }
    Ok(())
}
