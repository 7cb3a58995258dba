//! Application layer use cases for the bridge.
//!
//! - **`inject_keys`** – Turns drum key changes into keyboard key presses
//!   through a [`inject_keys::KeyInjector`] implementation that is injected at
//!   construction time.
//!
//! - **`dispatch`** – Runs one frame pipeline per serial device against the
//!   shared key-state machine and reports how each pipeline ended.

pub mod dispatch;
pub mod inject_keys;
