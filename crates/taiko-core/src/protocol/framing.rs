//! Frame synchronizers: cut an unframed byte stream into whole frames.
//!
//! # Touch grammar
//!
//! ```text
//! ( c0 c1 c2 c3 c4 c5 c6 )     9 bytes, no escaping
//! ```
//!
//! The panel streams continuously, so the port may be opened in the middle of
//! a frame.  [`TouchFrameReader::align`] is a one-time seek that discards bytes
//! up to and including the first `)`.  After that every frame is read as
//! exactly 9 bytes; a frame that does not start with `(` and end with `)` means
//! the stream is desynchronized, and since the grammar carries no redundancy
//! to resync safely, the reader reports [`FramingError::Desync`] and stops.
//!
//! # Button grammar
//!
//! ```text
//! ...noise... BTN 000000000000; ...noise... BTN 100000000000;
//! ```
//!
//! Every frame starts with the marker `BTN ` and ends with `;`, so the reader
//! re-synchronizes on each frame and needs no alignment phase.  A payload is
//! read at most [`MAX_BUTTON_PAYLOAD_LEN`] bytes deep; past that the reader
//! yields what it has, unterminated, and goes back to looking for a marker.
//!
//! Both readers are iterators over frames.  The sequence ends when the byte
//! source reports end-of-stream; a fatal error is yielded once and the
//! iterator is fused afterwards.

use std::io::{self, BufRead, Read};

use thiserror::Error;
use tracing::{debug, trace};

use super::button::MAX_BUTTON_PAYLOAD_LEN;
use super::touch::TOUCH_PAYLOAD_LEN;

/// Opening delimiter of a touch frame.
pub const TOUCH_FRAME_START: u8 = b'(';

/// Closing delimiter of a touch frame.
pub const TOUCH_FRAME_END: u8 = b')';

/// Total size of one touch frame on the wire.
pub const TOUCH_FRAME_LEN: usize = TOUCH_PAYLOAD_LEN + 2;

/// Marker that opens a button frame.
pub const BUTTON_FRAME_MARKER: &[u8] = b"BTN ";

/// Terminator that closes a button frame.
pub const BUTTON_FRAME_END: u8 = b';';

/// Fatal errors raised by a frame synchronizer.
#[derive(Debug, Error)]
pub enum FramingError {
    /// A touch frame's boundary bytes were not `(` and `)`.
    #[error("touch stream desynchronized: frame {frame:?} is not delimited by '(' and ')'")]
    Desync { frame: [u8; TOUCH_FRAME_LEN] },

    /// The byte source failed.
    #[error("byte source I/O error: {0}")]
    Io(#[from] io::Error),
}

// ── Touch frames ──────────────────────────────────────────────────────────────

/// Synchronizer for the 9-byte touch-grid frame stream.
pub struct TouchFrameReader<R> {
    source: R,
    aligned: bool,
    finished: bool,
}

impl<R: Read> TouchFrameReader<R> {
    /// Wraps a byte source.  No bytes are consumed until the first read.
    pub fn new(source: R) -> Self {
        Self {
            source,
            aligned: false,
            finished: false,
        }
    }

    /// Discards bytes up to and including the first `)`.
    ///
    /// Returns `Ok(false)` if the stream ended before a `)` was seen.
    /// Calling it again after a successful alignment is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::Io`] if the source fails.
    pub fn align(&mut self) -> Result<bool, FramingError> {
        if self.aligned {
            return Ok(true);
        }

        let mut byte = [0u8; 1];
        let mut skipped = 0usize;
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Ok(false),
                Ok(_) if byte[0] == TOUCH_FRAME_END => break,
                Ok(_) => skipped += 1,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        debug!(skipped, "touch stream aligned");
        self.aligned = true;
        Ok(true)
    }

    /// Reads the next frame and returns its 7-byte payload.
    ///
    /// Returns `Ok(None)` once the stream has ended (a partial trailing frame
    /// counts as the end of the stream).
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::Desync`] if the frame boundaries are wrong and
    /// [`FramingError::Io`] if the source fails.
    pub fn next_frame(&mut self) -> Result<Option<[u8; TOUCH_PAYLOAD_LEN]>, FramingError> {
        if !self.align()? {
            return Ok(None);
        }

        let mut frame = [0u8; TOUCH_FRAME_LEN];
        match self.source.read_exact(&mut frame) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        if frame[0] != TOUCH_FRAME_START || frame[TOUCH_FRAME_LEN - 1] != TOUCH_FRAME_END {
            return Err(FramingError::Desync { frame });
        }

        trace!(frame = %String::from_utf8_lossy(&frame), "touch frame");

        let mut payload = [0u8; TOUCH_PAYLOAD_LEN];
        payload.copy_from_slice(&frame[1..TOUCH_FRAME_LEN - 1]);
        Ok(Some(payload))
    }
}

impl<R: Read> Iterator for TouchFrameReader<R> {
    type Item = Result<[u8; TOUCH_PAYLOAD_LEN], FramingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_frame() {
            Ok(Some(payload)) => Some(Ok(payload)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

// ── Button frames ─────────────────────────────────────────────────────────────

/// Synchronizer for the `BTN <digits>;` text stream.
pub struct ButtonFrameReader<R> {
    source: R,
    finished: bool,
}

impl<R: BufRead> ButtonFrameReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            finished: false,
        }
    }

    /// Reads the next frame and returns the bytes between the marker and `;`.
    ///
    /// A frame with no `;` within [`MAX_BUTTON_PAYLOAD_LEN`] bytes is returned
    /// as its first `MAX_BUTTON_PAYLOAD_LEN + 1` bytes, which the decoder
    /// rejects.  Returns `Ok(None)` once the stream has ended.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::Io`] if the source fails.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, FramingError> {
        if !self.skip_past_marker()? {
            return Ok(None);
        }

        let mut payload = Vec::new();
        loop {
            let (consumed, done) = {
                let buf = match self.source.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                };
                if buf.is_empty() {
                    // Unterminated trailing frame.
                    return Ok(None);
                }

                let room = MAX_BUTTON_PAYLOAD_LEN + 1 - payload.len();
                let window = &buf[..buf.len().min(room)];
                match window.iter().position(|&b| b == BUTTON_FRAME_END) {
                    Some(end) => {
                        payload.extend_from_slice(&window[..end]);
                        (end + 1, true)
                    }
                    None => {
                        payload.extend_from_slice(window);
                        (window.len(), payload.len() > MAX_BUTTON_PAYLOAD_LEN)
                    }
                }
            };
            self.source.consume(consumed);
            if done {
                break;
            }
        }

        if payload.len() > MAX_BUTTON_PAYLOAD_LEN {
            debug!(len = payload.len(), "button frame overran the payload limit");
        } else {
            trace!(payload = %String::from_utf8_lossy(&payload), "button frame");
        }
        Ok(Some(payload))
    }

    /// Consumes bytes up to and including the next `BTN ` marker.
    ///
    /// Returns `Ok(false)` if the stream ended first.
    fn skip_past_marker(&mut self) -> Result<bool, FramingError> {
        let mut matched = 0usize;
        loop {
            let (consumed, found) = {
                let buf = match self.source.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                };
                if buf.is_empty() {
                    return Ok(false);
                }

                let mut consumed = 0;
                let mut found = false;
                for &byte in buf {
                    consumed += 1;
                    matched = advance_marker_match(matched, byte);
                    if matched == BUTTON_FRAME_MARKER.len() {
                        found = true;
                        break;
                    }
                }
                (consumed, found)
            };
            self.source.consume(consumed);
            if found {
                return Ok(true);
            }
        }
    }
}

/// Advances a marker match of length `matched` by one byte.
///
/// The marker has no proper prefix that is also a suffix, so a mismatch only
/// ever restarts the match, possibly at the current byte.
fn advance_marker_match(matched: usize, byte: u8) -> usize {
    if BUTTON_FRAME_MARKER[matched] == byte {
        matched + 1
    } else if BUTTON_FRAME_MARKER[0] == byte {
        1
    } else {
        0
    }
}

impl<R: BufRead> Iterator for ButtonFrameReader<R> {
    type Item = Result<Vec<u8>, FramingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_frame() {
            Ok(Some(payload)) => Some(Ok(payload)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
