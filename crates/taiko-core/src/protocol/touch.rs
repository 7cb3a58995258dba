//! Touch-grid frame payload decoding.
//!
//! The touch panel reports its state as 7 printable characters per frame.
//! Each character packs five zone bits as an offset from `'@'`:
//!
//! ```text
//! '@' = 0b00000  nothing touched
//! 'A' = 0b00001  bit 0
//! 'B' = 0b00010  bit 1
//! 'D' = 0b00100  bit 2
//! 'H' = 0b01000  bit 3
//! 'P' = 0b10000  bit 4
//! ```
//!
//! Several bits combine by addition, so `'C'` (`A + B`) means bits 0 and 1 and
//! `'G'` (`A + B + D`) means bits 0, 1 and 2.  Bit `b` of character `ci`
//! addresses slot `ci * 5 + b` of [`TOUCH_ZONES`].

use std::fmt;

/// Number of payload characters between `(` and `)` in one touch frame.
pub const TOUCH_PAYLOAD_LEN: usize = 7;

/// Zone bits packed into each payload character.
pub const BITS_PER_CHAR: usize = 5;

/// Number of physical zones on the panel (A1–A8, B1–B8, C1–C2, D1–D8, E1–E8).
pub const TOUCH_ZONE_COUNT: usize = 34;

/// The character that encodes "no zone in this slot group is touched".
const ZERO_BASE: u8 = b'@';

/// Mask selecting the five zone bits of a payload character.
const CHAR_BITS_MASK: u8 = 0b1_1111;

/// Zone group letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TouchGroup {
    A,
    B,
    C,
    D,
    E,
}

impl TouchGroup {
    /// Returns the group letter as printed on the panel.
    pub const fn letter(self) -> char {
        match self {
            TouchGroup::A => 'A',
            TouchGroup::B => 'B',
            TouchGroup::C => 'C',
            TouchGroup::D => 'D',
            TouchGroup::E => 'E',
        }
    }
}

/// One addressable capacitive cell, identified by group letter and 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TouchZone {
    pub group: TouchGroup,
    pub index: u8,
}

impl TouchZone {
    pub const fn new(group: TouchGroup, index: u8) -> Self {
        Self { group, index }
    }
}

impl fmt::Display for TouchZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.group.letter(), self.index)
    }
}

/// Flattened slot → zone table, in wire order.
pub const TOUCH_ZONES: [TouchZone; TOUCH_ZONE_COUNT] = {
    const LAYOUT: [(TouchGroup, u8); 5] = [
        (TouchGroup::A, 8),
        (TouchGroup::B, 8),
        (TouchGroup::C, 2),
        (TouchGroup::D, 8),
        (TouchGroup::E, 8),
    ];

    let mut table = [TouchZone::new(TouchGroup::A, 1); TOUCH_ZONE_COUNT];
    let mut slot = 0;
    let mut g = 0;
    while g < LAYOUT.len() {
        let (group, count) = LAYOUT[g];
        let mut index = 1;
        while index <= count {
            table[slot] = TouchZone::new(group, index);
            slot += 1;
            index += 1;
        }
        g += 1;
    }
    table
};

/// Decodes one touch payload into the zones it reports as touched.
///
/// Zones are returned in slot order.  Bits that address a slot past the end of
/// [`TOUCH_ZONES`] are dropped, and only the low five bits of each character
/// are read.
///
/// # Examples
///
/// ```rust
/// use taiko_core::protocol::touch::{decode_touch_payload, TouchGroup, TouchZone};
///
/// let zones = decode_touch_payload(b"C@@@@@@");
/// assert_eq!(
///     zones,
///     vec![TouchZone::new(TouchGroup::A, 1), TouchZone::new(TouchGroup::A, 2)]
/// );
/// ```
pub fn decode_touch_payload(payload: &[u8; TOUCH_PAYLOAD_LEN]) -> Vec<TouchZone> {
    let mut zones = Vec::new();
    for (ci, &c) in payload.iter().enumerate() {
        let bits = c.wrapping_sub(ZERO_BASE) & CHAR_BITS_MASK;
        if bits == 0 {
            continue;
        }
        for b in 0..BITS_PER_CHAR {
            if bits & (1 << b) == 0 {
                continue;
            }
            if let Some(zone) = TOUCH_ZONES.get(ci * BITS_PER_CHAR + b) {
                zones.push(*zone);
            }
        }
    }
    zones
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(group: TouchGroup, index: u8) -> TouchZone {
        TouchZone::new(group, index)
    }

    // ── Zone table ────────────────────────────────────────────────────────────

    #[test]
    fn test_zone_table_is_in_wire_order() {
        assert_eq!(TOUCH_ZONES[0], zone(TouchGroup::A, 1));
        assert_eq!(TOUCH_ZONES[7], zone(TouchGroup::A, 8));
        assert_eq!(TOUCH_ZONES[8], zone(TouchGroup::B, 1));
        assert_eq!(TOUCH_ZONES[16], zone(TouchGroup::C, 1));
        assert_eq!(TOUCH_ZONES[17], zone(TouchGroup::C, 2));
        assert_eq!(TOUCH_ZONES[18], zone(TouchGroup::D, 1));
        assert_eq!(TOUCH_ZONES[33], zone(TouchGroup::E, 8));
    }

    #[test]
    fn test_zone_display_is_letter_then_index() {
        assert_eq!(zone(TouchGroup::C, 2).to_string(), "C2");
        assert_eq!(zone(TouchGroup::E, 8).to_string(), "E8");
    }

    // ── Decoding ──────────────────────────────────────────────────────────────

    #[test]
    fn test_idle_payload_decodes_to_no_zones() {
        assert!(decode_touch_payload(b"@@@@@@@").is_empty());
    }

    #[test]
    fn test_single_letters_select_single_zones() {
        assert_eq!(decode_touch_payload(b"A@@@@@@"), vec![zone(TouchGroup::A, 1)]);
        assert_eq!(decode_touch_payload(b"B@@@@@@"), vec![zone(TouchGroup::A, 2)]);
        assert_eq!(decode_touch_payload(b"D@@@@@@"), vec![zone(TouchGroup::A, 3)]);
        assert_eq!(decode_touch_payload(b"H@@@@@@"), vec![zone(TouchGroup::A, 4)]);
        assert_eq!(decode_touch_payload(b"P@@@@@@"), vec![zone(TouchGroup::A, 5)]);
    }

    #[test]
    fn test_composite_letters_or_their_bits() {
        // C = A | B
        assert_eq!(
            decode_touch_payload(b"C@@@@@@"),
            vec![zone(TouchGroup::A, 1), zone(TouchGroup::A, 2)]
        );
        // E = A | D
        assert_eq!(
            decode_touch_payload(b"E@@@@@@"),
            vec![zone(TouchGroup::A, 1), zone(TouchGroup::A, 3)]
        );
        // G = A | B | D
        assert_eq!(
            decode_touch_payload(b"G@@@@@@"),
            vec![zone(TouchGroup::A, 1), zone(TouchGroup::A, 2), zone(TouchGroup::A, 3)]
        );
    }

    #[test]
    fn test_second_character_continues_the_flat_table() {
        // Slots 5..10: A6 A7 A8 B1 B2
        assert_eq!(
            decode_touch_payload(b"@_@@@@@"),
            vec![
                zone(TouchGroup::A, 6),
                zone(TouchGroup::A, 7),
                zone(TouchGroup::A, 8),
                zone(TouchGroup::B, 1),
                zone(TouchGroup::B, 2),
            ]
        );
    }

    #[test]
    fn test_c_group_straddles_characters_three_and_four() {
        // Slot 15 = B8 (char 3, bit 0); slots 16, 17 = C1, C2 (char 3, bits 1, 2);
        // slot 18 = D1 (char 3, bit 3).
        assert_eq!(
            decode_touch_payload(b"@@@O@@@"),
            vec![
                zone(TouchGroup::B, 8),
                zone(TouchGroup::C, 1),
                zone(TouchGroup::C, 2),
                zone(TouchGroup::D, 1),
            ]
        );
    }

    #[test]
    fn test_slot_past_the_table_is_dropped() {
        // Last character: bits 0..3 = E5..E8, bit 4 addresses slot 34 which has no zone.
        assert_eq!(
            decode_touch_payload(b"@@@@@@_"),
            vec![
                zone(TouchGroup::E, 5),
                zone(TouchGroup::E, 6),
                zone(TouchGroup::E, 7),
                zone(TouchGroup::E, 8),
            ]
        );
        assert!(decode_touch_payload(b"@@@@@@P").is_empty());
    }

    #[test]
    fn test_every_zone_is_reachable() {
        let all = decode_touch_payload(b"_______");
        assert_eq!(all.len(), TOUCH_ZONE_COUNT);
        assert_eq!(all, TOUCH_ZONES.to_vec());
    }

    #[test]
    fn test_high_bits_outside_five_bit_window_are_ignored() {
        // 'a' = '@' + 0x21 -> only bit 0 survives the mask.
        assert_eq!(decode_touch_payload(b"a@@@@@@"), vec![zone(TouchGroup::A, 1)]);
    }
}
