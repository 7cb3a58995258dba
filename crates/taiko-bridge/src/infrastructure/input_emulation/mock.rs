//! Recording key injector for tests.
//!
//! The real injectors press keys on the machine running the tests and need a
//! desktop session.  `RecordingInjector` instead pushes every call into a
//! `Mutex<Vec<...>>` so assertions can inspect exactly what was injected and
//! in what order, including across the two pipeline threads.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every call return
//! `InjectError::Platform`, which exercises the error-logging paths without a
//! broken OS.

use std::sync::Mutex;

use taiko_core::{HidKeyCode, KeyEdge};

use crate::application::inject_keys::{InjectError, KeyInjector};

/// A key injector that records all calls without performing OS API calls.
#[derive(Debug, Default)]
pub struct RecordingInjector {
    /// Every successful call, in call order.
    pub events: Mutex<Vec<(HidKeyCode, KeyEdge)>>,
    /// When `true`, every method returns an error and records nothing.
    pub should_fail: bool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an injector whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<(HidKeyCode, KeyEdge)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Returns the recorded events for one key only.
    pub fn events_for(&self, key: HidKeyCode) -> Vec<KeyEdge> {
        self.events()
            .into_iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, edge)| edge)
            .collect()
    }

    fn record(&self, key: HidKeyCode, edge: KeyEdge) -> Result<(), InjectError> {
        if self.should_fail {
            return Err(InjectError::Platform("injected failure".to_string()));
        }
        self.events
            .lock()
            .map_err(|_| InjectError::Platform("event log poisoned".to_string()))?
            .push((key, edge));
        Ok(())
    }
}

impl KeyInjector for RecordingInjector {
    fn emit_key_down(&self, key: HidKeyCode) -> Result<(), InjectError> {
        self.record(key, KeyEdge::Pressed)
    }

    fn emit_key_up(&self, key: HidKeyCode) -> Result<(), InjectError> {
        self.record(key, KeyEdge::Released)
    }
}
