//! Per-device frame pipelines and the dispatcher that runs them.
//!
//! # What is a pipeline? (for beginners)
//!
//! Each serial device gets one pipeline, which is a plain blocking loop:
//!
//! ```text
//! bytes ──► frame reader ──► payload decoder ──► KeyStateMachine::apply ──► injector
//! ```
//!
//! The loop runs until the device's byte stream ends (the port closed, or the
//! bridge is shutting down) or the reader hits a fatal error.  Either way the
//! pipeline then releases every key its device owns, so a drum key is never
//! left held down after its device disappears.
//!
//! The [`Dispatcher`] runs the touch pipeline and the button pipeline on two
//! `tokio::task::spawn_blocking` threads.  Each device is opened on its own
//! pipeline thread, and the two pipelines share one [`KeyStateMachine`] but
//! never write the same key, so a device that cannot be opened, or a
//! pipeline that ends, has no effect on the other.

use std::convert::Infallible;
use std::fmt;
use std::io::{self, BufRead, Read};
use std::sync::Arc;

use taiko_core::{
    decode_button_payload, decode_touch_payload, ButtonFrameReader, FramingError, InputSource,
    KeyStateMachine, SourceUpdate, TouchFrameReader, TouchZone,
};
use tracing::{debug, error, info, warn};

use super::inject_keys::InjectKeysUseCase;

/// How a pipeline ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineExit {
    /// The byte source reached end-of-stream.
    Closed,
    /// The byte source could not be opened.
    Unavailable,
    /// The touch stream lost frame alignment.
    Desync,
    /// The byte source failed.
    Io(io::ErrorKind),
    /// The pipeline thread panicked or was cancelled.
    Aborted,
}

impl PipelineExit {
    /// `true` for a clean end of stream.
    pub fn is_clean(&self) -> bool {
        matches!(self, PipelineExit::Closed)
    }
}

impl From<&FramingError> for PipelineExit {
    fn from(err: &FramingError) -> Self {
        match err {
            FramingError::Desync { .. } => PipelineExit::Desync,
            FramingError::Io(e) => PipelineExit::Io(e.kind()),
        }
    }
}

impl fmt::Display for PipelineExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineExit::Closed => f.write_str("stream closed"),
            PipelineExit::Unavailable => f.write_str("source unavailable"),
            PipelineExit::Desync => f.write_str("frame desynchronization"),
            PipelineExit::Io(kind) => write!(f, "I/O error ({kind})"),
            PipelineExit::Aborted => f.write_str("aborted"),
        }
    }
}

/// Summary of one finished pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub source: InputSource,
    /// Frames applied to the key-state machine.
    pub frames: u64,
    /// Frames dropped because their payload was malformed.
    pub skipped: u64,
    pub exit: PipelineExit,
}

/// Reports of both pipelines, returned once both have ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub touch: PipelineReport,
    pub buttons: PipelineReport,
}

/// Formats touched zones the way the panel labels them: `A1 B3 C2`.
pub fn format_zones(zones: &[TouchZone]) -> String {
    zones
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Pipelines ─────────────────────────────────────────────────────────────────

/// Runs the touch panel pipeline until its byte stream ends.
pub fn run_touch_pipeline<R: Read>(
    source: R,
    keys: &KeyStateMachine,
    inject: &InjectKeysUseCase,
) -> PipelineReport {
    let mut reader = TouchFrameReader::new(source);
    let mut frames = 0u64;

    let exit = loop {
        match reader.next_frame() {
            Ok(Some(payload)) => {
                frames += 1;
                let zones = decode_touch_payload(&payload);
                debug!(zones = %format_zones(&zones), "touch frame");
                let changes = keys.apply(SourceUpdate::Touch(&zones));
                inject.handle_changes(&changes);
            }
            Ok(None) => break PipelineExit::Closed,
            Err(e) => {
                error!("touch pipeline stopped: {e}");
                break PipelineExit::from(&e);
            }
        }
    };

    finish(InputSource::Touch, keys, inject, frames, 0, exit)
}

/// Runs the button board pipeline until its byte stream ends.
///
/// A frame whose payload cannot be decoded is logged and skipped.
pub fn run_button_pipeline<R: BufRead>(
    source: R,
    keys: &KeyStateMachine,
    inject: &InjectKeysUseCase,
) -> PipelineReport {
    let mut reader = ButtonFrameReader::new(source);
    let mut frames = 0u64;
    let mut skipped = 0u64;

    let exit = loop {
        match reader.next_frame() {
            Ok(Some(payload)) => match decode_button_payload(&payload) {
                Ok(frame) => {
                    frames += 1;
                    debug!(flags = %frame, "button frame");
                    let changes = keys.apply(SourceUpdate::Buttons(&frame));
                    inject.handle_changes(&changes);
                }
                Err(e) => {
                    skipped += 1;
                    let payload = String::from_utf8_lossy(&payload);
                    warn!(%payload, "skipping button frame: {e}");
                }
            },
            Ok(None) => break PipelineExit::Closed,
            Err(e) => {
                error!("button pipeline stopped: {e}");
                break PipelineExit::from(&e);
            }
        }
    };

    finish(InputSource::Button, keys, inject, frames, skipped, exit)
}

/// Opens a pipeline's byte source, then runs the pipeline on it.
///
/// A source that fails to open ends the pipeline as
/// [`PipelineExit::Unavailable`].
fn open_and_run<S, E, O, P>(
    source: InputSource,
    open: O,
    pipeline: P,
    keys: &KeyStateMachine,
    inject: &InjectKeysUseCase,
) -> PipelineReport
where
    E: fmt::Display,
    O: FnOnce() -> Result<S, E>,
    P: FnOnce(S, &KeyStateMachine, &InjectKeysUseCase) -> PipelineReport,
{
    match open() {
        Ok(stream) => pipeline(stream, keys, inject),
        Err(e) => {
            error!(%source, "cannot open source: {e}");
            finish(source, keys, inject, 0, 0, PipelineExit::Unavailable)
        }
    }
}

fn finish(
    source: InputSource,
    keys: &KeyStateMachine,
    inject: &InjectKeysUseCase,
    frames: u64,
    skipped: u64,
    exit: PipelineExit,
) -> PipelineReport {
    let released = keys.release_source(source);
    inject.handle_changes(&released);
    info!(%source, frames, skipped, released = released.len(), "pipeline ended: {exit}");
    PipelineReport {
        source,
        frames,
        skipped,
        exit,
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Runs both device pipelines concurrently against one key-state machine.
pub struct Dispatcher {
    keys: Arc<KeyStateMachine>,
    inject: Arc<InjectKeysUseCase>,
}

impl Dispatcher {
    pub fn new(keys: Arc<KeyStateMachine>, inject: Arc<InjectKeysUseCase>) -> Self {
        Self { keys, inject }
    }

    /// The shared key-state machine; safe to snapshot from any thread.
    pub fn keys(&self) -> &Arc<KeyStateMachine> {
        &self.keys
    }

    /// Runs both pipelines on already-open byte sources.
    ///
    /// See [`Dispatcher::run_with`].
    pub async fn run<T, B>(&self, touch: T, buttons: B) -> DispatchReport
    where
        T: Read + Send + 'static,
        B: BufRead + Send + 'static,
    {
        self.run_with(
            move || Ok::<_, Infallible>(touch),
            move || Ok::<_, Infallible>(buttons),
        )
        .await
    }

    /// Opens each byte source on its own pipeline thread, runs both pipelines
    /// to completion and returns how each ended.
    ///
    /// One pipeline failing to open, or ending (cleanly or not), never stops
    /// the other.
    pub async fn run_with<OT, OB, T, B, ET, EB>(
        &self,
        open_touch: OT,
        open_buttons: OB,
    ) -> DispatchReport
    where
        OT: FnOnce() -> Result<T, ET> + Send + 'static,
        OB: FnOnce() -> Result<B, EB> + Send + 'static,
        T: Read,
        B: BufRead,
        ET: fmt::Display,
        EB: fmt::Display,
    {
        let touch_task = {
            let keys = Arc::clone(&self.keys);
            let inject = Arc::clone(&self.inject);
            tokio::task::spawn_blocking(move || {
                open_and_run(InputSource::Touch, open_touch, run_touch_pipeline, &keys, &inject)
            })
        };
        let button_task = {
            let keys = Arc::clone(&self.keys);
            let inject = Arc::clone(&self.inject);
            tokio::task::spawn_blocking(move || {
                open_and_run(
                    InputSource::Button,
                    open_buttons,
                    run_button_pipeline,
                    &keys,
                    &inject,
                )
            })
        };

        let (touch, buttons) = tokio::join!(touch_task, button_task);
        DispatchReport {
            touch: self.joined(InputSource::Touch, touch),
            buttons: self.joined(InputSource::Button, buttons),
        }
    }

    fn joined(
        &self,
        source: InputSource,
        result: Result<PipelineReport, tokio::task::JoinError>,
    ) -> PipelineReport {
        result.unwrap_or_else(|e| {
            error!(%source, "pipeline thread failed: {e}");
            // The thread never reached its own release step.
            let released = self.keys.release_source(source);
            self.inject.handle_changes(&released);
            PipelineReport {
                source,
                frames: 0,
                skipped: 0,
                exit: PipelineExit::Aborted,
            }
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
