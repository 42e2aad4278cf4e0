// Morse decoder: symbol state machine and in-place buffer decoding.
//
// The state machine has two states.  `Idle` holds the root path code and
// is entered at start and after every flush; `Accumulating` holds a
// non-root code.  Dots and dashes extend the code, every other byte
// flushes it through the symbol table.  Extending is bounds-checked by
// `PathCode::extend`, so an overlong run is caught before any lookup.

use crate::table::{self, PLACEHOLDER, PathCode, Symbol};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A run of symbols left the symbol table's range.
    #[error(
        "invalid sequence: symbol run starting at offset {run_start} overflows the table at offset {offset}"
    )]
    InvalidSequence { offset: u64, run_start: u64 },

    /// I/O error while streaming input or output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do with symbols pending when the input ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrailingRun {
    /// Flush the pending run as if a separator followed it.
    #[default]
    Flush,
    /// Discard the pending run. Separators act as mandatory terminators.
    Drop,
}

/// What to do with a run of symbols that has no table entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlongRun {
    /// Abort the decode with [`DecodeError::InvalidSequence`].
    #[default]
    Reject,
    /// Swallow the rest of the run and emit the placeholder when it ends.
    Substitute,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub trailing: TrailingRun,
    pub overlong: OverlongRun,
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Root path code; nothing pending.
    Idle,
    /// At least one symbol pending since the last flush.
    Accumulating,
}

/// Byte-at-a-time Morse decoder.
///
/// Each input byte produces at most one output byte, so the output is never
/// longer than the input. The decoder never looks up a code outside the
/// table.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    options: DecodeOptions,
    path: PathCode,
    /// Set while swallowing an overlong run under `OverlongRun::Substitute`.
    overlong: bool,
    run_start: u64,
    consumed: u64,
    emitted: u64,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    pub fn state(&self) -> State {
        if self.path.is_root() && !self.overlong {
            State::Idle
        } else {
            State::Accumulating
        }
    }

    /// Total input bytes pushed since creation or the last reset.
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Total decoded bytes produced since creation or the last reset.
    pub fn bytes_emitted(&self) -> u64 {
        self.emitted
    }

    /// Return to the initial state, keeping the options.
    pub fn reset(&mut self) {
        *self = Self::with_options(self.options);
    }

    /// Feed one input byte.
    ///
    /// Returns the decoded byte when `byte` is a separator. On
    /// [`DecodeError::InvalidSequence`] the pending run is discarded and
    /// the decoder is back in [`State::Idle`].
    pub fn push(&mut self, byte: u8) -> Result<Option<u8>, DecodeError> {
        let offset = self.consumed;
        self.consumed += 1;

        let Some(symbol) = Symbol::from_byte(byte) else {
            return Ok(Some(self.flush()));
        };

        if self.path.is_root() && !self.overlong {
            self.run_start = offset;
        }
        if self.overlong {
            return Ok(None);
        }

        match self.path.extend(symbol) {
            Some(next) => {
                self.path = next;
                Ok(None)
            }
            None => match self.options.overlong {
                OverlongRun::Reject => {
                    let run_start = self.run_start;
                    log::debug!(
                        "rejecting symbol run at offset {run_start}: code {} cannot take '{}'",
                        self.path.get(),
                        symbol.as_byte() as char
                    );
                    self.path = PathCode::ROOT;
                    Err(DecodeError::InvalidSequence { offset, run_start })
                }
                OverlongRun::Substitute => {
                    self.overlong = true;
                    self.path = PathCode::ROOT;
                    Ok(None)
                }
            },
        }
    }

    /// Signal end of input.
    ///
    /// Returns the decoded byte for a pending run when the trailing policy
    /// is [`TrailingRun::Flush`]. Nothing is emitted in the idle state.
    pub fn finish(&mut self) -> Result<Option<u8>, DecodeError> {
        if self.state() == State::Idle {
            return Ok(None);
        }
        match self.options.trailing {
            TrailingRun::Flush => Ok(Some(self.flush())),
            TrailingRun::Drop => {
                self.path = PathCode::ROOT;
                self.overlong = false;
                Ok(None)
            }
        }
    }

    fn flush(&mut self) -> u8 {
        let out = if self.overlong {
            PLACEHOLDER
        } else {
            table::lookup(self.path)
        };
        self.path = PathCode::ROOT;
        self.overlong = false;
        self.emitted += 1;
        out
    }
}

// ---------------------------------------------------------------------------
// Buffer decoding
// ---------------------------------------------------------------------------

/// Decode `buf` in place with default options.
///
/// Returns the new logical length; bytes past it are left as they were.
/// On error the contents of `buf` are unspecified.
pub fn decode_in_place(buf: &mut [u8]) -> Result<usize, DecodeError> {
    decode_in_place_with(buf, &DecodeOptions::default())
}

/// Decode `buf` in place.
pub fn decode_in_place_with(
    buf: &mut [u8],
    options: &DecodeOptions,
) -> Result<usize, DecodeError> {
    let mut decoder = Decoder::with_options(*options);
    let mut write = 0;

    for read in 0..buf.len() {
        if let Some(out) = decoder.push(buf[read])? {
            // write <= read: every byte emits at most once.
            buf[write] = out;
            write += 1;
        }
    }
    if let Some(out) = decoder.finish()? {
        // A pending run consumed at least one byte without emitting.
        buf[write] = out;
        write += 1;
    }

    Ok(write)
}

/// Decode a NUL-terminated buffer in place.
///
/// Input ends at the first `0` byte or at the end of the slice. The
/// decoded text is terminated with a `0` when there is room for it.
/// Returns the decoded length, not counting the terminator.
pub fn decode_nul_terminated(buf: &mut [u8]) -> Result<usize, DecodeError> {
    decode_nul_terminated_with(buf, &DecodeOptions::default())
}

pub fn decode_nul_terminated_with(
    buf: &mut [u8],
    options: &DecodeOptions,
) -> Result<usize, DecodeError> {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let len = decode_in_place_with(&mut buf[..end], options)?;
    if let Some(terminator) = buf.get_mut(len) {
        *terminator = 0;
    }
    Ok(len)
}

/// Decode `input` into a new buffer with default options.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    decode_with(input, &DecodeOptions::default())
}

pub fn decode_with(input: &[u8], options: &DecodeOptions) -> Result<Vec<u8>, DecodeError> {
    let mut buf = input.to_vec();
    let len = decode_in_place_with(&mut buf, options)?;
    buf.truncate(len);
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
