//! # taiko-core
//!
//! Shared library for MaiTouch-Taiko containing the serial frame protocols,
//! the drum key-state machine, and key code translation tables.
//!
//! It has zero dependencies on OS APIs, serial port drivers, or an async
//! runtime; byte sources are plain [`std::io::Read`] / [`std::io::BufRead`]
//! implementations injected by the caller.
//!
//! # Architecture overview (for beginners)
//!
//! MaiTouch-Taiko turns a rhythm-game touch panel (34 capacitive zones in
//! groups A..E) and a separate IO button board into the four keys of a taiko
//! drum: left rim (Ka), left head (Don), right head (Don), right rim (Ka).
//!
//! - **`protocol`** – How bytes arrive from the two devices.  The touch panel
//!   streams fixed 9-byte frames like `(A@@@@@@)` where each letter packs five
//!   zone bits; the button board streams text frames like `BTN 000000000000;`.
//!   The synchronizers in [`protocol::framing`] cut the raw streams into
//!   frames and the decoders turn frames into activation sets.
//!
//! - **`domain`** – The shared [`KeyStateMachine`]: it maps activation sets to
//!   the four drum keys and reports a [`KeyChange`] only when a key actually
//!   goes down or up.
//!
//! - **`keymap`** – Translation tables from the canonical [`HidKeyCode`] used
//!   for key bindings to Windows Virtual Key codes and X11 KeySyms.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::drum::{DrumKey, KeyChange, KeyEdge, KeySnapshot};
pub use domain::key_state::{InputSource, KeyStateMachine, SourceUpdate};
pub use keymap::hid::HidKeyCode;
pub use protocol::button::{decode_button_payload, ButtonFrame, MAX_BUTTON_PAYLOAD_LEN};
pub use protocol::framing::{ButtonFrameReader, FramingError, TouchFrameReader};
pub use protocol::touch::{decode_touch_payload, TouchGroup, TouchZone};
pub use protocol::ProtocolError;
