//! MaiTouch-Taiko bridge: entry point.
//!
//! Reads the touch panel and the button board of a maimai-style cabinet and
//! presses the four taiko drum keys on this machine.
//!
//! # Usage
//!
//! ```text
//! taiko-bridge [OPTIONS]
//!
//! Options:
//!   --config <PATH>        Config file [default: platform config dir]
//!   --touch-port <PORT>    Touch panel serial port [config default: COM3]
//!   --button-port <PORT>   Button board serial port [config default: COM25]
//!   --baud-rate <BAUD>     Baud rate for both ports [config default: 9600]
//!   --monitor              Log frames and key events instead of pressing keys
//! ```
//!
//! Every option can also be set through the environment (`TAIKO_CONFIG`,
//! `TAIKO_TOUCH_PORT`, `TAIKO_BUTTON_PORT`, `TAIKO_BAUD_RATE`,
//! `TAIKO_MONITOR`).  Command-line values override the config file.
//!
//! # Architecture overview
//!
//! ```text
//! touch panel ──serial──► touch pipeline  ─┐
//!                                          ├─► KeyStateMachine ─► KeyInjector ─► OS
//! button board ─serial──► button pipeline ─┘
//! ```
//!
//! Each pipeline opens its port and runs on its own blocking thread; a port
//! that cannot be opened ends only its own pipeline.  Ctrl+C clears the shared
//! `running` flag; both serial readers then report end-of-stream within one
//! poll interval, each pipeline releases its keys, and the process exits.

use std::io::BufReader;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use taiko_core::KeyStateMachine;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use taiko_bridge::application::dispatch::Dispatcher;
use taiko_bridge::application::inject_keys::{InjectKeysUseCase, KeyInjector};
use taiko_bridge::infrastructure::input_emulation::log_only::LogOnlyInjector;
use taiko_bridge::infrastructure::serial::open_port;
use taiko_bridge::infrastructure::storage::config::{
    config_file_path, load_config_from, BridgeConfig, ConfigError,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Turns a maimai-style touch panel and button board into taiko drum keys.
#[derive(Debug, Parser)]
#[command(name = "taiko-bridge", version)]
struct Cli {
    /// Path of the TOML config file.
    #[arg(long, env = "TAIKO_CONFIG")]
    config: Option<PathBuf>,

    /// Serial port of the touch panel.
    #[arg(long, env = "TAIKO_TOUCH_PORT")]
    touch_port: Option<String>,

    /// Serial port of the button board.
    #[arg(long, env = "TAIKO_BUTTON_PORT")]
    button_port: Option<String>,

    /// Baud rate for both serial ports.
    #[arg(long, env = "TAIKO_BAUD_RATE")]
    baud_rate: Option<u32>,

    /// Log every frame and key event instead of injecting keys.
    #[arg(long, env = "TAIKO_MONITOR")]
    monitor: bool,
}

impl Cli {
    /// Overrides config file values with the ones given on the command line.
    fn apply_to(&self, config: &mut BridgeConfig) {
        if let Some(port) = &self.touch_port {
            config.serial.touch_port = port.clone();
        }
        if let Some(port) = &self.button_port {
            config.serial.button_port = port.clone();
        }
        if let Some(baud) = self.baud_rate {
            config.serial.baud_rate = baud;
        }
    }
}

/// Loads the config named on the command line, or the default one.
fn load_bridge_config(cli: &Cli) -> anyhow::Result<BridgeConfig> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => match config_file_path() {
            Ok(path) => path,
            Err(ConfigError::NoPlatformConfigDir) => return Ok(BridgeConfig::default()),
            Err(e) => return Err(e.into()),
        },
    };
    load_config_from(&path).with_context(|| format!("loading config from {}", path.display()))
}

/// Filter used when `RUST_LOG` is not set.
///
/// Monitor mode needs the per-frame `debug` logs, so it raises coarser levels.
fn default_filter(log_level: &str, monitor: bool) -> String {
    let coarse = matches!(log_level, "error" | "warn" | "info");
    if monitor && coarse {
        "debug".to_string()
    } else {
        log_level.to_string()
    }
}

fn build_injector(monitor: bool) -> anyhow::Result<Arc<dyn KeyInjector>> {
    if monitor {
        info!("monitor mode: key events are logged, not injected");
        return Ok(Arc::new(LogOnlyInjector::new()));
    }

    #[cfg(target_os = "windows")]
    let injector: Arc<dyn KeyInjector> = Arc::new(
        taiko_bridge::infrastructure::input_emulation::windows::WindowsKeyInjector::new(),
    );

    #[cfg(target_os = "linux")]
    let injector: Arc<dyn KeyInjector> = Arc::new(
        taiko_bridge::infrastructure::input_emulation::linux::LinuxXTestInjector::new()
            .context("opening X display for key injection")?,
    );

    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    let injector: Arc<dyn KeyInjector> = {
        warn!("no key injector for this platform; falling back to monitor mode");
        Arc::new(LogOnlyInjector::new())
    };

    Ok(injector)
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_bridge_config(&cli)?;
    cli.apply_to(&mut config);

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(default_filter(&config.bridge.log_level, cli.monitor))
        }))
        .init();

    info!(
        "MaiTouch-Taiko bridge starting: touch={}, buttons={}, baud={}",
        config.serial.touch_port, config.serial.button_port, config.serial.baud_rate
    );

    let injector = build_injector(cli.monitor)?;
    let inject = Arc::new(InjectKeysUseCase::new(injector, config.keys));
    let dispatcher = Dispatcher::new(Arc::new(KeyStateMachine::new()), inject);

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, releasing keys and shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    // ── Serial ports ──────────────────────────────────────────────────────────
    // Each port is opened on its own pipeline thread, so a missing or busy
    // port only ends that device's pipeline.
    let baud_rate = config.serial.baud_rate;
    let touch_port = config.serial.touch_port.clone();
    let touch_running = Arc::clone(&running);
    let button_port = config.serial.button_port.clone();
    let button_running = Arc::clone(&running);

    let report = dispatcher
        .run_with(
            move || open_port(&touch_port, baud_rate, touch_running),
            move || open_port(&button_port, baud_rate, button_running).map(BufReader::new),
        )
        .await;

    let shutting_down = !running.load(Ordering::Relaxed);
    for pipeline in [&report.touch, &report.buttons] {
        if !pipeline.exit.is_clean() {
            warn!(source = %pipeline.source, "pipeline ended abnormally: {}", pipeline.exit);
        }
    }
    if !shutting_down && !(report.touch.exit.is_clean() && report.buttons.exit.is_clean()) {
        anyhow::bail!(
            "device pipelines stopped (touch: {}, buttons: {})",
            report.touch.exit,
            report.buttons.exit
        );
    }

    info!("MaiTouch-Taiko bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
