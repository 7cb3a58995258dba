//! Button-board frame payload decoding.
//!
//! The IO board reports its buttons as a run of digits, one per button, inside
//! a `BTN ...;` frame.  Indices 0–3 are the right-hand group and 4–7 the
//! left-hand group; anything past index 7 is carried but unused.

use super::ProtocolError;

/// Flag indices belonging to the right-hand button group.
pub const RIGHT_GROUP: std::ops::Range<usize> = 0..4;

/// Flag indices belonging to the left-hand button group.
pub const LEFT_GROUP: std::ops::Range<usize> = 4..8;

/// Longest payload accepted between `BTN ` and `;`.
pub const MAX_BUTTON_PAYLOAD_LEN: usize = 64;

/// Decoded button flags of one frame, in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonFrame {
    flags: Vec<bool>,
}

impl ButtonFrame {
    /// Returns all flags in wire order.
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Returns `true` if the flag at `index` is set.  Missing indices read as unset.
    pub fn is_set(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Returns `true` if any flag in `range` is set.
    pub fn any_in(&self, range: std::ops::Range<usize>) -> bool {
        range.into_iter().any(|i| self.is_set(i))
    }
}

impl std::fmt::Display for ButtonFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &flag in &self.flags {
            f.write_str(if flag { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Decodes the digits between `BTN ` and `;` into a [`ButtonFrame`].
///
/// A flag is set when its digit is non-zero.
///
/// # Errors
///
/// Returns [`ProtocolError::EmptyButtonFrame`] for an empty payload,
/// [`ProtocolError::OversizedButtonFrame`] for one longer than
/// [`MAX_BUTTON_PAYLOAD_LEN`] and [`ProtocolError::NonDigitButtonFlag`] when
/// any byte is not an ASCII digit.
pub fn decode_button_payload(payload: &[u8]) -> Result<ButtonFrame, ProtocolError> {
    if payload.is_empty() {
        return Err(ProtocolError::EmptyButtonFrame);
    }
    if payload.len() > MAX_BUTTON_PAYLOAD_LEN {
        return Err(ProtocolError::OversizedButtonFrame { len: payload.len() });
    }

    let flags = payload
        .iter()
        .enumerate()
        .map(|(offset, &byte)| {
            if byte.is_ascii_digit() {
                Ok(byte != b'0')
            } else {
                Err(ProtocolError::NonDigitButtonFlag { byte, offset })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ButtonFrame { flags })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
