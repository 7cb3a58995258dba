//! taiko-bridge library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does taiko-bridge do? (for beginners)
//!
//! A maimai-style cabinet has two serial devices: a capacitive touch panel
//! that streams the state of its 34 zones, and an IO board that streams the
//! state of its buttons.  The bridge turns both into the four keys of a taiko
//! drum so a PC rhythm game can be played on the cabinet:
//!
//! 1. Opens both serial ports (by default `COM3` for touch and `COM25` for
//!    buttons, 9600 baud).
//! 2. Runs one blocking reader per device.  Each reader cuts its byte stream
//!    into frames and decodes them with `taiko-core`.
//! 3. Feeds every decoded frame into one shared `KeyStateMachine`, which
//!    reports a key change only when a drum key actually goes down or up.
//! 4. Injects each change as a key press or release through the platform API
//!    (`SendInput` on Windows, XTest on Linux), or only logs it in monitor
//!    mode.

/// Application layer: key injection and the per-device pipelines.
pub mod application;

/// Infrastructure layer: OS key injection, serial ports, and config storage.
pub mod infrastructure;
