//! Serial port access for the touch panel and the button board.
//!
//! Both devices are plain 8N1 serial ports (9600 baud on a stock cabinet).
//! The frame readers in `taiko-core` expect an ordinary blocking
//! [`std::io::Read`] whose only end is a real close or failure, but a serial
//! port read returns `TimedOut` whenever the device is quiet.
//! [`ShutdownAwareReader`] hides those timeouts and doubles as the shutdown
//! path: once the shared `running` flag is cleared, the next timeout is
//! reported as end-of-stream and the pipeline ends cleanly.

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

/// How long a single port read may block before the shutdown flag is checked.
pub const READ_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Error type for serial port operations.
#[derive(Debug, Error)]
pub enum SerialError {
    #[error("failed to open serial port {path} at {baud_rate} baud: {source}")]
    Open {
        path: String,
        baud_rate: u32,
        #[source]
        source: serialport::Error,
    },
}

/// A blocking reader that retries read timeouts until shutdown is requested.
pub struct ShutdownAwareReader<R> {
    inner: R,
    running: Arc<AtomicBool>,
}

impl<R: Read> ShutdownAwareReader<R> {
    pub fn new(inner: R, running: Arc<AtomicBool>) -> Self {
        Self { inner, running }
    }
}

impl<R: Read> Read for ShutdownAwareReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if !self.running.load(Ordering::Relaxed) {
                return Ok(0);
            }
            match self.inner.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}

/// Opens a serial port for reading.
///
/// # Errors
///
/// Returns [`SerialError::Open`] if the port does not exist, is in use, or
/// rejects the settings.
pub fn open_port(
    path: &str,
    baud_rate: u32,
    running: Arc<AtomicBool>,
) -> Result<ShutdownAwareReader<Box<dyn serialport::SerialPort>>, SerialError> {
    let port = serialport::new(path, baud_rate)
        .timeout(READ_POLL_INTERVAL)
        .open()
        .map_err(|source| SerialError::Open {
            path: path.to_string(),
            baud_rate,
            source,
        })?;
    info!(path, baud_rate, "serial port opened");
    Ok(ShutdownAwareReader::new(port, running))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
