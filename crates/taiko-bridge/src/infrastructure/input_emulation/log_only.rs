//! Monitor-mode injector: logs every key event instead of pressing keys.
//!
//! Used with `--monitor` to check wiring and zone mapping on a cabinet
//! without sending input to the focused window, and as the fallback on
//! platforms that have no native injector.

use taiko_core::HidKeyCode;
use tracing::info;

use crate::application::inject_keys::{InjectError, KeyInjector};

#[derive(Debug, Default)]
pub struct LogOnlyInjector;

impl LogOnlyInjector {
    pub fn new() -> Self {
        Self
    }
}

impl KeyInjector for LogOnlyInjector {
    fn emit_key_down(&self, key: HidKeyCode) -> Result<(), InjectError> {
        info!(?key, "key down");
        Ok(())
    }

    fn emit_key_up(&self, key: HidKeyCode) -> Result<(), InjectError> {
        info!(?key, "key up");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_only_injector_never_fails() {
        let injector = LogOnlyInjector::new();
        assert!(injector.emit_key_down(HidKeyCode::KeyJ).is_ok());
        assert!(injector.emit_key_up(HidKeyCode::KeyJ).is_ok());
    }
}
