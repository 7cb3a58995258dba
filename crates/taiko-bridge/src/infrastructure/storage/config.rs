//! TOML-based configuration for the bridge.
//!
//! Reads `BridgeConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\MaiTouchTaiko\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/maitouch-taiko/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/MaiTouchTaiko/config.toml`
//!
//! or from the file passed with `--config`.
//!
//! ```toml
//! [serial]
//! touch_port = "COM3"
//! button_port = "COM25"
//! baud_rate = 9600
//!
//! [keys]
//! left_ka = "KeyD"
//! left_don = "KeyF"
//! right_don = "KeyJ"
//! right_ka = "KeyK"
//!
//! [bridge]
//! log_level = "info"
//! ```
//!
//! # Serde default values
//!
//! Every field has a `#[serde(default = ...)]`, and every table may be left
//! out, so a missing file, an empty file and a file that only sets one value
//! all work.  A missing file is not an error: the bridge runs on defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::inject_keys::KeyBindings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level bridge configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub keys: KeyBindings,
    #[serde(default)]
    pub bridge: BridgeSettings,
}

/// Serial ports of the two devices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    /// Port of the touch panel (`COM3`, `/dev/ttyUSB0`, ...).
    #[serde(default = "default_touch_port")]
    pub touch_port: String,
    /// Port of the IO button board.
    #[serde(default = "default_button_port")]
    pub button_port: String,
    /// Baud rate used for both ports.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// General bridge behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeSettings {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_touch_port() -> String {
    "COM3".to_string()
}
fn default_button_port() -> String {
    "COM25".to_string()
}
fn default_baud_rate() -> u32 {
    9600
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            touch_port: default_touch_port(),
            button_port: default_button_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let dir = platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(dir.join("config.toml"))
}

/// Loads `BridgeConfig` from `path`, returning `BridgeConfig::default()` if
/// the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<BridgeConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BridgeConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolves the platform config directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("MaiTouchTaiko"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("maitouch-taiko"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("MaiTouchTaiko")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
