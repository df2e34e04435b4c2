//! Receiving end of the serial telemetry: splits the byte stream into CR LF
//! terminated lines and decodes each one back into a [`Payload`].
//!
//! Lines that do not decode are logged and skipped; the stream carries on
//! with the next line.

use core::fmt;

use heapless::Vec;
use serde::Deserialize;

use crate::log::warn;
use crate::telemetry::Payload;
use crate::temperature_sensor::NO_READING;

/// Longest line kept; a reading payload is well under this.
pub const MAX_LINE: usize = 64;

/// Wire form of [`Payload`]. A failed reading travels as `null`.
#[derive(Deserialize)]
struct Frame {
    temperature_1: Option<f32>,
}

#[derive(Debug)]
pub enum DecodeError {
    Empty,
    Overflow,
    Json(serde_json_core::de::Error),
}

impl DecodeError {
    pub fn reason(&self) -> &'static str {
        match self {
            DecodeError::Empty => "empty line",
            DecodeError::Overflow => "line too long",
            DecodeError::Json(_) => "malformed payload",
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Json(e) => write!(f, "{}: {}", self.reason(), e),
            _ => f.write_str(self.reason()),
        }
    }
}

/// Drop the line terminator and any NUL padding after it.
fn trim_trailer(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !matches!(b, b'\r' | b'\n' | 0))
        .map_or(0, |last| last + 1);
    &line[..end]
}

/// Decode one telemetry line, with or without its terminator.
pub fn decode_line(line: &[u8]) -> Result<Payload, DecodeError> {
    let line = trim_trailer(line);
    if line.is_empty() {
        return Err(DecodeError::Empty);
    }

    let (frame, _) = serde_json_core::from_slice::<Frame>(line).map_err(DecodeError::Json)?;
    Ok(Payload {
        temperature_1: frame.temperature_1.unwrap_or(NO_READING),
    })
}

/// Reassembles telemetry lines from a byte stream of any chunking.
#[derive(Default)]
pub struct LineDecoder {
    line: Vec<u8, MAX_LINE>,
    overflowed: bool,
    rejected: u32,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines dropped so far because they did not decode.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Take one byte. Returns the outcome once a line is complete; blank
    /// lines are skipped without a result.
    pub fn push(&mut self, byte: u8) -> Option<Result<Payload, DecodeError>> {
        if byte != b'\n' {
            if self.line.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        let outcome = if self.overflowed {
            Err(DecodeError::Overflow)
        } else {
            decode_line(&self.line)
        };
        self.line.clear();
        self.overflowed = false;

        match outcome {
            Err(DecodeError::Empty) => None,
            outcome => Some(outcome),
        }
    }

    /// Feed a chunk of the stream, handing every decoded payload to
    /// `on_payload`. Bad lines are logged and skipped.
    pub fn feed(&mut self, bytes: &[u8], mut on_payload: impl FnMut(Payload)) {
        for &byte in bytes {
            match self.push(byte) {
                Some(Ok(payload)) => on_payload(payload),
                Some(Err(e)) => {
                    self.rejected += 1;
                    warn!("Dropped telemetry line: {}", e.reason());
                }
                None => {}
            }
        }
    }
}
