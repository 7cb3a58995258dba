//! InjectKeysUseCase: turns drum key changes into keyboard key events.
//!
//! This use case sits at the application layer and delegates to a
//! [`KeyInjector`] trait object for OS-level event injection.  The
//! platform-specific implementations are in the infrastructure layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use taiko_core::{DrumKey, HidKeyCode, KeyChange, KeyEdge};
use thiserror::Error;
use tracing::{error, trace};

/// Error type for key injection operations.
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("platform error: {0}")]
    Platform(String),
    #[error("key {0:?} has no platform key code")]
    Unmapped(HidKeyCode),
}

/// Platform-agnostic key injection trait.
///
/// Each supported OS provides an implementation in the infrastructure layer.
/// Both device pipelines call into the same injector, so implementations
/// must be callable from several threads.
#[cfg_attr(test, mockall::automock)]
pub trait KeyInjector: Send + Sync {
    /// Injects a key press (key-down event).
    fn emit_key_down(&self, key: HidKeyCode) -> Result<(), InjectError>;

    /// Injects a key release (key-up event).
    fn emit_key_up(&self, key: HidKeyCode) -> Result<(), InjectError>;
}

/// The keyboard key each drum key is bound to.
///
/// Stored as the `[keys]` table of the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyBindings {
    #[serde(default = "default_left_ka")]
    pub left_ka: HidKeyCode,
    #[serde(default = "default_left_don")]
    pub left_don: HidKeyCode,
    #[serde(default = "default_right_don")]
    pub right_don: HidKeyCode,
    #[serde(default = "default_right_ka")]
    pub right_ka: HidKeyCode,
}

fn default_left_ka() -> HidKeyCode {
    HidKeyCode::KeyD
}
fn default_left_don() -> HidKeyCode {
    HidKeyCode::KeyF
}
fn default_right_don() -> HidKeyCode {
    HidKeyCode::KeyJ
}
fn default_right_ka() -> HidKeyCode {
    HidKeyCode::KeyK
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left_ka: default_left_ka(),
            left_don: default_left_don(),
            right_don: default_right_don(),
            right_ka: default_right_ka(),
        }
    }
}

impl KeyBindings {
    /// Returns the keyboard key bound to `key`.
    pub fn key_for(&self, key: DrumKey) -> HidKeyCode {
        match key {
            DrumKey::LeftKa => self.left_ka,
            DrumKey::LeftDon => self.left_don,
            DrumKey::RightDon => self.right_don,
            DrumKey::RightKa => self.right_ka,
        }
    }
}

/// The Inject Keys use case.
///
/// Receives key changes from the key-state machine and dispatches them to the
/// platform injector.
pub struct InjectKeysUseCase {
    injector: Arc<dyn KeyInjector>,
    bindings: KeyBindings,
}

impl InjectKeysUseCase {
    /// Creates a new use case with the given injector and key bindings.
    pub fn new(injector: Arc<dyn KeyInjector>, bindings: KeyBindings) -> Self {
        Self { injector, bindings }
    }

    /// Injects one key change.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError`] if the OS event injection fails.
    pub fn handle_change(&self, change: &KeyChange) -> Result<(), InjectError> {
        let hid = self.bindings.key_for(change.key);
        trace!(%change, ?hid, "injecting key");
        match change.edge {
            KeyEdge::Pressed => self.injector.emit_key_down(hid),
            KeyEdge::Released => self.injector.emit_key_up(hid),
        }
    }

    /// Injects every change in order and returns how many failed.
    ///
    /// A failure is logged and does not stop the remaining changes; the key
    /// state that produced the change is not rolled back.
    pub fn handle_changes(&self, changes: &[KeyChange]) -> usize {
        let mut failures = 0;
        for change in changes {
            if let Err(e) = self.handle_change(change) {
                error!(%change, "key injection failed: {e}");
                failures += 1;
            }
        }
        failures
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn make_use_case(mock: MockKeyInjector) -> InjectKeysUseCase {
        InjectKeysUseCase::new(Arc::new(mock), KeyBindings::default())
    }

    // ── Bindings ──────────────────────────────────────────────────────────────

    #[test]
    fn test_default_bindings_are_dfjk() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.key_for(DrumKey::LeftKa), HidKeyCode::KeyD);
        assert_eq!(bindings.key_for(DrumKey::LeftDon), HidKeyCode::KeyF);
        assert_eq!(bindings.key_for(DrumKey::RightDon), HidKeyCode::KeyJ);
        assert_eq!(bindings.key_for(DrumKey::RightKa), HidKeyCode::KeyK);
    }

    #[test]
    fn test_partial_bindings_table_keeps_defaults_for_missing_keys() {
        // Arrange
        let toml_str = r#"right_don = "Space""#;

        // Act
        let bindings: KeyBindings = toml::from_str(toml_str).expect("deserialize");

        // Assert
        assert_eq!(bindings.right_don, HidKeyCode::Space);
        assert_eq!(bindings.left_don, HidKeyCode::KeyF);
    }

    // ── Single changes ────────────────────────────────────────────────────────

    #[test]
    fn test_pressed_change_emits_key_down_for_bound_key() {
        // Arrange
        let mut mock = MockKeyInjector::new();
        mock.expect_emit_key_down()
            .with(eq(HidKeyCode::KeyJ))
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_emit_key_up().never();
        let uc = make_use_case(mock);

        // Act
        let result = uc.handle_change(&KeyChange::pressed(DrumKey::RightDon));

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_released_change_emits_key_up_for_bound_key() {
        // Arrange
        let mut mock = MockKeyInjector::new();
        mock.expect_emit_key_up()
            .with(eq(HidKeyCode::KeyD))
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_emit_key_down().never();
        let uc = make_use_case(mock);

        // Act
        let result = uc.handle_change(&KeyChange::released(DrumKey::LeftKa));

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_custom_binding_is_used() {
        // Arrange
        let mut mock = MockKeyInjector::new();
        mock.expect_emit_key_down()
            .with(eq(HidKeyCode::ArrowLeft))
            .times(1)
            .returning(|_| Ok(()));
        let bindings = KeyBindings {
            left_don: HidKeyCode::ArrowLeft,
            ..KeyBindings::default()
        };
        let uc = InjectKeysUseCase::new(Arc::new(mock), bindings);

        // Act / Assert
        assert!(uc.handle_change(&KeyChange::pressed(DrumKey::LeftDon)).is_ok());
    }

    #[test]
    fn test_platform_failure_is_returned() {
        // Arrange
        let mut mock = MockKeyInjector::new();
        mock.expect_emit_key_down()
            .returning(|_| Err(InjectError::Platform("injected failure".to_string())));
        let uc = make_use_case(mock);

        // Act
        let result = uc.handle_change(&KeyChange::pressed(DrumKey::RightKa));

        // Assert
        assert!(matches!(result, Err(InjectError::Platform(_))));
    }

    // ── Batches ───────────────────────────────────────────────────────────────

    #[test]
    fn test_handle_changes_preserves_order() {
        // Arrange
        let mut seq = Sequence::new();
        let mut mock = MockKeyInjector::new();
        mock.expect_emit_key_up()
            .with(eq(HidKeyCode::KeyF))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_emit_key_down()
            .with(eq(HidKeyCode::KeyJ))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let uc = make_use_case(mock);

        // Act
        let failures = uc.handle_changes(&[
            KeyChange::released(DrumKey::LeftDon),
            KeyChange::pressed(DrumKey::RightDon),
        ]);

        // Assert
        assert_eq!(failures, 0);
    }

    #[test]
    fn test_handle_changes_continues_after_failure() {
        // Arrange: the first key-down fails, the key-up after it must still run.
        let mut mock = MockKeyInjector::new();
        mock.expect_emit_key_down()
            .times(1)
            .returning(|_| Err(InjectError::Platform("queue full".to_string())));
        mock.expect_emit_key_up().times(1).returning(|_| Ok(()));
        let uc = make_use_case(mock);

        // Act
        let failures = uc.handle_changes(&[
            KeyChange::pressed(DrumKey::LeftKa),
            KeyChange::released(DrumKey::RightKa),
        ]);

        // Assert
        assert_eq!(failures, 1);
    }

    #[test]
    fn test_handle_changes_with_no_changes_injects_nothing() {
        let mut mock = MockKeyInjector::new();
        mock.expect_emit_key_down().never();
        mock.expect_emit_key_up().never();
        let uc = make_use_case(mock);

        assert_eq!(uc.handle_changes(&[]), 0);
    }
}
