//! Protocol module containing the two device frame grammars and their decoders.

pub mod button;
pub mod framing;
pub mod touch;

use thiserror::Error;

pub use button::{decode_button_payload, ButtonFrame, MAX_BUTTON_PAYLOAD_LEN};
pub use framing::{ButtonFrameReader, FramingError, TouchFrameReader};
pub use touch::{decode_touch_payload, TouchGroup, TouchZone, TOUCH_PAYLOAD_LEN, TOUCH_ZONES};

/// Errors produced while decoding the payload of an already-delimited frame.
///
/// None of these are fatal to a pipeline: the offending frame is skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A button frame carried no flags at all (`BTN ;`).
    #[error("button frame is empty")]
    EmptyButtonFrame,

    /// A button frame ran past the payload length limit without a `;`.
    #[error("button frame is {len} bytes long")]
    OversizedButtonFrame { len: usize },

    /// A button frame contained a byte that is not an ASCII digit.
    #[error("button frame contains non-digit byte 0x{byte:02X} at offset {offset}")]
    NonDigitButtonFlag { byte: u8, offset: usize },
}
