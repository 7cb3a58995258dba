//! Linux X11 key injection via the XTest extension.
//!
//! # What is XTest? (for beginners)
//!
//! XTest is an X11 protocol extension that lets a process synthesize keyboard
//! events as if the user had pressed a physical key.  The events reach the
//! focused window exactly like real input, so the game cannot tell them apart.
//!
//! `XTestFakeKeyEvent` takes an X11 *keycode* (a server-specific number), not
//! a KeySym, so every injection goes through:
//! ```text
//! HID Usage ID → X11 KeySym → XKeysymToKeycode(display, keysym) → X11 keycode
//! ```
//!
//! # Threads
//!
//! Xlib connections are not thread-safe, and both device pipelines inject
//! keys, so the display pointer lives behind a `Mutex` and every call is made
//! with the lock held.
//!
//! # Permissions
//!
//! The process needs access to the X display named by `DISPLAY`.  If it is
//! unset or the server is unreachable, [`LinuxXTestInjector::new`] fails.

use std::ptr;
use std::sync::Mutex;

use taiko_core::keymap::{hid::HidKeyCode, KeyMapper};
use x11::{xlib, xtest};

use crate::application::inject_keys::{InjectError, KeyInjector};

/// Passing `CurrentTime` (0) as the delay means "deliver now".
const CURRENT_TIME: std::os::raw::c_ulong = 0;

/// Owned Xlib display connection.
struct DisplayHandle(*mut xlib::Display);

// SAFETY: the pointer is only dereferenced by Xlib while the owning Mutex is
// held, so it is never used from two threads at once.
unsafe impl Send for DisplayHandle {}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        // SAFETY: the pointer came from a successful XOpenDisplay and is
        // closed exactly once.
        unsafe {
            xlib::XCloseDisplay(self.0);
        }
    }
}

/// Linux X11/XTest key injector.
pub struct LinuxXTestInjector {
    display: Mutex<DisplayHandle>,
}

impl LinuxXTestInjector {
    /// Connects to the X display named by `DISPLAY`.
    ///
    /// # Errors
    ///
    /// Returns `InjectError::Platform` if the X display cannot be opened.
    pub fn new() -> Result<Self, InjectError> {
        // SAFETY: a null name selects the display from the environment.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            return Err(InjectError::Platform(
                "cannot open X display (is DISPLAY set?)".to_string(),
            ));
        }
        Ok(Self {
            display: Mutex::new(DisplayHandle(display)),
        })
    }

    fn send_key(&self, key: HidKeyCode, pressed: bool) -> Result<(), InjectError> {
        let keysym = KeyMapper::hid_to_x11_keysym(key);
        let display = self
            .display
            .lock()
            .map_err(|_| InjectError::Platform("X display lock poisoned".to_string()))?;

        // SAFETY: display.0 is a live connection and the lock is held.
        unsafe {
            let keycode = xlib::XKeysymToKeycode(display.0, xlib::KeySym::from(keysym));
            if keycode == 0 {
                return Err(InjectError::Unmapped(key));
            }
            xtest::XTestFakeKeyEvent(
                display.0,
                u32::from(keycode),
                i32::from(pressed),
                CURRENT_TIME,
            );
            xlib::XFlush(display.0);
        }
        Ok(())
    }
}

impl KeyInjector for LinuxXTestInjector {
    fn emit_key_down(&self, key: HidKeyCode) -> Result<(), InjectError> {
        self.send_key(key, true)
    }

    fn emit_key_up(&self, key: HidKeyCode) -> Result<(), InjectError> {
        self.send_key(key, false)
    }
}
