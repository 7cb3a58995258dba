//! The shared drum key-state machine.
//!
//! # Ownership partition
//!
//! Two independent pipelines feed this machine: the touch panel and the button
//! board.  Each source owns a disjoint pair of keys:
//!
//! | Source          | Owns                     |
//! |-----------------|--------------------------|
//! | [`InputSource::Touch`]  | `LeftDon`, `RightDon` |
//! | [`InputSource::Button`] | `LeftKa`, `RightKa`   |
//!
//! An update only ever writes the keys its source owns, so calls from the two
//! pipelines commute: whatever order they interleave in, each key sees the
//! updates of exactly one writer, in that writer's order.
//!
//! # Storage
//!
//! Each key is an [`AtomicBool`].  The swap that stores a new value also
//! returns the previous one, so edge detection and the write are a single
//! indivisible step and a reader on any thread can never observe a key in a
//! half-written state.  A [`KeySnapshot`] taken while updates are in flight
//! may mix keys from before and after an update; that is acceptable for the
//! display-style readers it serves.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::drum::{DrumKey, KeyChange, KeyEdge, KeySnapshot, DRUM_KEY_COUNT};
use crate::protocol::button::{ButtonFrame, LEFT_GROUP, RIGHT_GROUP};
use crate::protocol::touch::{TouchGroup, TouchZone};

/// Zones in the centre of the panel that never trigger a Don.
pub const CENTER_ZONES: [TouchZone; 4] = [
    TouchZone::new(TouchGroup::D, 1),
    TouchZone::new(TouchGroup::D, 5),
    TouchZone::new(TouchGroup::E, 1),
    TouchZone::new(TouchGroup::E, 5),
];

/// The device an update came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Touch,
    Button,
}

impl InputSource {
    /// The keys this source is allowed to write.
    pub const fn owned_keys(self) -> [DrumKey; 2] {
        match self {
            InputSource::Touch => [DrumKey::LeftDon, DrumKey::RightDon],
            InputSource::Button => [DrumKey::LeftKa, DrumKey::RightKa],
        }
    }

    pub const fn owns(self, key: DrumKey) -> bool {
        let [a, b] = self.owned_keys();
        a as u8 == key as u8 || b as u8 == key as u8
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            InputSource::Touch => "touch",
            InputSource::Button => "button",
        })
    }
}

/// One decoded frame, tagged by the source it came from.
#[derive(Debug, Clone, Copy)]
pub enum SourceUpdate<'a> {
    /// Zones touched in one touch-panel frame.
    Touch(&'a [TouchZone]),
    /// Flags of one button-board frame.
    Buttons(&'a ButtonFrame),
}

impl SourceUpdate<'_> {
    pub fn source(&self) -> InputSource {
        match self {
            SourceUpdate::Touch(_) => InputSource::Touch,
            SourceUpdate::Buttons(_) => InputSource::Button,
        }
    }

    /// The absolute key values this frame asks for.
    ///
    /// Only the keys owned by [`Self::source`] are meaningful; the others are
    /// always `false`.
    pub fn candidate(&self) -> KeySnapshot {
        match self {
            SourceUpdate::Touch(zones) => touch_candidate(zones),
            SourceUpdate::Buttons(frame) => button_candidate(frame),
        }
    }
}

/// Derives the Don keys from the zones touched in one frame.
///
/// Centre zones D1, D5, E1 and E5 are ignored.  A1–A4, B1–B4, D2–D4, E2–E4
/// and C1 are the right Don; every other zone is the left Don.
pub fn touch_candidate(zones: &[TouchZone]) -> KeySnapshot {
    let mut candidate = KeySnapshot::default();
    for zone in zones {
        if CENTER_ZONES.contains(zone) {
            continue;
        }
        if is_right_don_zone(zone) {
            candidate.set(DrumKey::RightDon, true);
        } else {
            candidate.set(DrumKey::LeftDon, true);
        }
    }
    candidate
}

// C1 is right and C2 is left; this follows the panel's physical layout.
fn is_right_don_zone(zone: &TouchZone) -> bool {
    match zone.group {
        TouchGroup::A | TouchGroup::B | TouchGroup::D | TouchGroup::E => {
            (1..=4).contains(&zone.index)
        }
        TouchGroup::C => zone.index == 1,
    }
}

/// Derives the Ka keys from one button frame.
///
/// Any of flags 0–3 holds the right Ka; any of flags 4–7 holds the left Ka.
pub fn button_candidate(frame: &ButtonFrame) -> KeySnapshot {
    let mut candidate = KeySnapshot::default();
    candidate.set(DrumKey::RightKa, frame.any_in(RIGHT_GROUP));
    candidate.set(DrumKey::LeftKa, frame.any_in(LEFT_GROUP));
    candidate
}

/// Shared, thread-safe state of the four drum keys.
///
/// Wrap it in an `Arc` and hand one clone to each pipeline and to any reader.
#[derive(Debug, Default)]
pub struct KeyStateMachine {
    keys: [AtomicBool; DRUM_KEY_COUNT],
}

impl KeyStateMachine {
    /// Creates a machine with every key released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one decoded frame and returns the key transitions it caused.
    ///
    /// Only the keys owned by the update's source are compared and written.
    /// Applying the same update twice returns no changes the second time.
    pub fn apply(&self, update: SourceUpdate<'_>) -> Vec<KeyChange> {
        self.drive(update.source(), update.candidate())
    }

    /// Releases every key owned by `source`, returning the releases emitted.
    ///
    /// Used when a source's pipeline ends so none of its keys stay held.
    pub fn release_source(&self, source: InputSource) -> Vec<KeyChange> {
        self.drive(source, KeySnapshot::default())
    }

    /// Returns the current value of every key.
    pub fn snapshot(&self) -> KeySnapshot {
        let mut snap = KeySnapshot::default();
        for key in DrumKey::ALL {
            snap.set(key, self.is_pressed(key));
        }
        snap
    }

    pub fn is_pressed(&self, key: DrumKey) -> bool {
        self.keys[key.index()].load(Ordering::Acquire)
    }

    fn drive(&self, source: InputSource, candidate: KeySnapshot) -> Vec<KeyChange> {
        let mut changes = Vec::new();
        for key in source.owned_keys() {
            let next = candidate.is_pressed(key);
            let previous = self.keys[key.index()].swap(next, Ordering::AcqRel);
            if previous != next {
                changes.push(KeyChange {
                    key,
                    edge: KeyEdge::to(next),
                });
            }
        }
        changes
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::button::decode_button_payload;
    use crate::protocol::touch::decode_touch_payload;
    use std::sync::Arc;

    fn zone(group: TouchGroup, index: u8) -> TouchZone {
        TouchZone::new(group, index)
    }

    fn buttons(digits: &str) -> ButtonFrame {
        decode_button_payload(digits.as_bytes()).unwrap()
    }

    // ── Touch mapping ─────────────────────────────────────────────────────────

    #[test]
    fn test_low_indices_of_abde_map_to_right_don() {
        for group in [TouchGroup::A, TouchGroup::B, TouchGroup::D, TouchGroup::E] {
            for index in 2..=4 {
                let c = touch_candidate(&[zone(group, index)]);
                assert!(c.is_pressed(DrumKey::RightDon), "{group:?}{index} must be right");
                assert!(!c.is_pressed(DrumKey::LeftDon));
            }
        }
        assert!(touch_candidate(&[zone(TouchGroup::A, 1)]).is_pressed(DrumKey::RightDon));
        assert!(touch_candidate(&[zone(TouchGroup::B, 1)]).is_pressed(DrumKey::RightDon));
    }

    #[test]
    fn test_high_indices_map_to_left_don() {
        for group in [TouchGroup::A, TouchGroup::B, TouchGroup::D, TouchGroup::E] {
            for index in 6..=8 {
                let c = touch_candidate(&[zone(group, index)]);
                assert!(c.is_pressed(DrumKey::LeftDon), "{group:?}{index} must be left");
                assert!(!c.is_pressed(DrumKey::RightDon));
            }
        }
        assert!(touch_candidate(&[zone(TouchGroup::A, 5)]).is_pressed(DrumKey::LeftDon));
    }

    #[test]
    fn test_c1_is_right_and_c2_is_left() {
        assert_eq!(
            touch_candidate(&[zone(TouchGroup::C, 1)]).as_array(),
            [false, false, true, false]
        );
        assert_eq!(
            touch_candidate(&[zone(TouchGroup::C, 2)]).as_array(),
            [false, true, false, false]
        );
    }

    #[test]
    fn test_center_zones_never_trigger_don() {
        let center = [
            zone(TouchGroup::D, 1),
            zone(TouchGroup::D, 5),
            zone(TouchGroup::E, 1),
            zone(TouchGroup::E, 5),
        ];
        // Every non-empty subset of the four centre zones.
        for mask in 1u8..16 {
            let subset: Vec<TouchZone> = (0..4)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| center[i])
                .collect();
            assert_eq!(touch_candidate(&subset), KeySnapshot::default());

            let machine = KeyStateMachine::new();
            assert!(machine.apply(SourceUpdate::Touch(&subset)).is_empty());
        }
    }

    #[test]
    fn test_both_sides_can_be_held_in_one_frame() {
        let c = touch_candidate(&[zone(TouchGroup::A, 1), zone(TouchGroup::A, 8)]);
        assert!(c.is_pressed(DrumKey::LeftDon));
        assert!(c.is_pressed(DrumKey::RightDon));
    }

    // ── Button mapping ────────────────────────────────────────────────────────

    #[test]
    fn test_button_groups_map_to_ka() {
        assert_eq!(
            button_candidate(&buttons("100000000000")).as_array(),
            [false, false, false, true]
        );
        assert_eq!(
            button_candidate(&buttons("000100000000")).as_array(),
            [false, false, false, true]
        );
        assert_eq!(
            button_candidate(&buttons("000010000000")).as_array(),
            [true, false, false, false]
        );
        assert_eq!(
            button_candidate(&buttons("000000010000")).as_array(),
            [true, false, false, false]
        );
    }

    #[test]
    fn test_reserved_button_flags_are_ignored() {
        assert_eq!(button_candidate(&buttons("000000001111")), KeySnapshot::default());
    }

    // ── Edge detection ────────────────────────────────────────────────────────

    #[test]
    fn test_apply_emits_press_then_nothing_on_repeat() {
        // Arrange
        let machine = KeyStateMachine::new();
        let zones = decode_touch_payload(b"A@@@@@@");

        // Act
        let first = machine.apply(SourceUpdate::Touch(&zones));
        let second = machine.apply(SourceUpdate::Touch(&zones));

        // Assert
        assert_eq!(first, vec![KeyChange::pressed(DrumKey::RightDon)]);
        assert!(second.is_empty());
        assert!(machine.is_pressed(DrumKey::RightDon));
    }

    #[test]
    fn test_empty_frame_releases_held_don() {
        let machine = KeyStateMachine::new();
        machine.apply(SourceUpdate::Touch(&[zone(TouchGroup::A, 8)]));

        let changes = machine.apply(SourceUpdate::Touch(&[]));

        assert_eq!(changes, vec![KeyChange::released(DrumKey::LeftDon)]);
        assert_eq!(machine.snapshot(), KeySnapshot::default());
    }

    #[test]
    fn test_changes_follow_key_index_order() {
        let machine = KeyStateMachine::new();
        let changes = machine.apply(SourceUpdate::Buttons(&buttons("100010000000")));
        assert_eq!(
            changes,
            vec![KeyChange::pressed(DrumKey::LeftKa), KeyChange::pressed(DrumKey::RightKa)]
        );
    }

    // ── Ownership isolation ───────────────────────────────────────────────────

    #[test]
    fn test_button_updates_never_touch_don_keys() {
        // Arrange: both Dons held by the touch source
        let machine = KeyStateMachine::new();
        machine.apply(SourceUpdate::Touch(&[zone(TouchGroup::A, 1), zone(TouchGroup::A, 8)]));

        // Act: button frames that press and release everything they can
        machine.apply(SourceUpdate::Buttons(&buttons("111111111111")));
        machine.apply(SourceUpdate::Buttons(&buttons("000000000000")));

        // Assert
        assert!(machine.is_pressed(DrumKey::LeftDon));
        assert!(machine.is_pressed(DrumKey::RightDon));
    }

    #[test]
    fn test_touch_updates_never_touch_ka_keys() {
        let machine = KeyStateMachine::new();
        machine.apply(SourceUpdate::Buttons(&buttons("100010000000")));

        machine.apply(SourceUpdate::Touch(&[zone(TouchGroup::A, 1)]));
        let changes = machine.apply(SourceUpdate::Touch(&[]));

        assert!(changes.iter().all(|c| c.key.is_don()));
        assert!(machine.is_pressed(DrumKey::LeftKa));
        assert!(machine.is_pressed(DrumKey::RightKa));
    }

    #[test]
    fn test_owns_matches_owned_keys() {
        for source in [InputSource::Touch, InputSource::Button] {
            for key in DrumKey::ALL {
                assert_eq!(source.owns(key), source.owned_keys().contains(&key));
            }
        }
        assert!(InputSource::Touch.owns(DrumKey::LeftDon));
        assert!(!InputSource::Touch.owns(DrumKey::RightKa));
    }

    // ── release_source ────────────────────────────────────────────────────────

    #[test]
    fn test_release_source_releases_only_that_sources_keys() {
        let machine = KeyStateMachine::new();
        machine.apply(SourceUpdate::Touch(&[zone(TouchGroup::A, 1)]));
        machine.apply(SourceUpdate::Buttons(&buttons("000010000000")));

        let released = machine.release_source(InputSource::Button);

        assert_eq!(released, vec![KeyChange::released(DrumKey::LeftKa)]);
        assert_eq!(machine.snapshot().as_array(), [false, false, true, false]);
        assert!(machine.release_source(InputSource::Button).is_empty());
    }

    // ── Concurrency ───────────────────────────────────────────────────────────

    #[test]
    fn test_concurrent_sources_produce_alternating_edges_per_key() {
        // Arrange
        let machine = Arc::new(KeyStateMachine::new());
        let touch_frames: Vec<Vec<TouchZone>> = (0..2000)
            .map(|i| match i % 3 {
                0 => vec![zone(TouchGroup::A, 1)],
                1 => vec![zone(TouchGroup::A, 1), zone(TouchGroup::B, 7)],
                _ => vec![],
            })
            .collect();
        let button_frames: Vec<ButtonFrame> = (0..2000)
            .map(|i| match i % 4 {
                0 => buttons("100000000000"),
                1 => buttons("100010000000"),
                2 => buttons("000010000000"),
                _ => buttons("000000000000"),
            })
            .collect();

        // Act
        let (touch_changes, button_changes) = std::thread::scope(|s| {
            let m = Arc::clone(&machine);
            let touch = s.spawn(move || {
                touch_frames
                    .iter()
                    .flat_map(|z| m.apply(SourceUpdate::Touch(z)))
                    .collect::<Vec<_>>()
            });
            let m = Arc::clone(&machine);
            let button = s.spawn(move || {
                button_frames
                    .iter()
                    .flat_map(|b| m.apply(SourceUpdate::Buttons(b)))
                    .collect::<Vec<_>>()
            });
            let m = Arc::clone(&machine);
            s.spawn(move || {
                for _ in 0..2000 {
                    let _ = m.snapshot();
                }
            });
            (touch.join().unwrap(), button.join().unwrap())
        });

        // Assert: every key alternates Pressed/Released starting with Pressed,
        // and only the owning source ever reported it.
        for (source, changes) in [
            (InputSource::Touch, &touch_changes),
            (InputSource::Button, &button_changes),
        ] {
            assert!(changes.iter().all(|c| source.owns(c.key)));
            for key in source.owned_keys() {
                let edges: Vec<KeyEdge> =
                    changes.iter().filter(|c| c.key == key).map(|c| c.edge).collect();
                for (i, edge) in edges.iter().enumerate() {
                    let expected = if i % 2 == 0 { KeyEdge::Pressed } else { KeyEdge::Released };
                    assert_eq!(*edge, expected, "{key} edge #{i}");
                }
            }
        }
        // Last touch frame (i = 1999, 1999 % 3 == 1) holds both Dons;
        // last button frame (i = 1999, 1999 % 4 == 3) releases both Kas.
        assert_eq!(machine.snapshot().as_array(), [false, true, true, false]);
    }
}
