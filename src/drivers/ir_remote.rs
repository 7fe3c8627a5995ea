//! IR remote event classifier.
//!
//! Consumes frames from an external NEC 8-bit decoder and turns them into
//! the same [`Gesture`] abstraction the switches produce, keyed by the
//! remote's button code.
//!
//! The decoder reports either a fresh code or a repeat marker (sent every
//! ~110 ms while a key stays down). The first repeats after a fresh code
//! are treated as the stream settling; only from the third repeat on is
//! the key considered held, and `Hold` is then re-asserted on every repeat
//! so that held keys ramp continuously.
//!
//! Runs in the decoder callback context: constant time, never blocks.

use core::fmt;

use super::Gesture;

/// Raw decoder value for a repeat marker.
pub const RAW_REPEAT: i32 = -1;

/// Repeats at or below this count are swallowed.
const REPEAT_SETTLE_COUNT: u8 = 1;

/// A decoded frame from the IR receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrFrame {
    /// A fresh button code.
    Code(u8),
    /// The previously sent button is still held.
    Repeat,
}

/// Malformed-frame reports from the decoder. Transient: reported and
/// ignored for this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrDecodeError {
    /// Leader burst had the wrong length.
    BadStart,
    /// Wrong number of bits in the data block.
    BadBlock,
    /// Repeat marker malformed.
    BadRepeat,
    /// Edge buffer overrun.
    Overrun,
    /// Data byte failed its inverted-copy check.
    BadData,
    /// Address byte failed its inverted-copy check.
    BadAddress,
    /// Positive value too wide for an 8-bit command code.
    CodeOutOfRange(i32),
    /// Any other negative value.
    Unknown(i32),
}

impl fmt::Display for IrDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadStart => write!(f, "invalid start pulse"),
            Self::BadBlock => write!(f, "error: bad block"),
            Self::BadRepeat => write!(f, "error: repeat"),
            Self::Overrun => write!(f, "error: overrun"),
            Self::BadData => write!(f, "error: invalid data"),
            Self::BadAddress => write!(f, "error: invalid address"),
            Self::CodeOutOfRange(raw) => write!(f, "code {raw} out of range"),
            Self::Unknown(raw) => write!(f, "unknown error {raw}"),
        }
    }
}

impl IrFrame {
    /// Interpret a raw decoder value: `0..=255` are button codes, `-1` is
    /// the repeat marker, other negatives are decoder errors.
    pub fn from_raw(raw: i32) -> Result<Self, IrDecodeError> {
        match raw {
            0..=255 => Ok(Self::Code(raw as u8)),
            RAW_REPEAT => Ok(Self::Repeat),
            -2 => Err(IrDecodeError::BadStart),
            -3 => Err(IrDecodeError::BadBlock),
            -4 => Err(IrDecodeError::BadRepeat),
            -5 => Err(IrDecodeError::Overrun),
            -6 => Err(IrDecodeError::BadData),
            -7 => Err(IrDecodeError::BadAddress),
            256.. => Err(IrDecodeError::CodeOutOfRange(raw)),
            other => Err(IrDecodeError::Unknown(other)),
        }
    }

    /// Build a frame from the `(code, is_repeat)` pair. The code is ignored
    /// for repeats.
    pub fn from_parts(code: u8, is_repeat: bool) -> Self {
        if is_repeat { Self::Repeat } else { Self::Code(code) }
    }
}

#[derive(Debug, Default)]
pub struct IrClassifier {
    repeat_count: u8,
    last_code: Option<u8>,
}

impl IrClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one frame. Returns the button code and gesture to dispatch,
    /// or `None` while the repeat stream is settling.
    pub fn classify(&mut self, frame: IrFrame) -> Option<(u8, Gesture)> {
        match frame {
            IrFrame::Code(code) => {
                self.repeat_count = 0;
                self.last_code = Some(code);
                Some((code, Gesture::Press))
            }
            IrFrame::Repeat => {
                let settled = self.repeat_count > REPEAT_SETTLE_COUNT;
                self.repeat_count = self.repeat_count.saturating_add(1);
                if settled {
                    self.last_code.map(|code| (code, Gesture::Hold))
                } else {
                    None
                }
            }
        }
    }

    /// Repeats seen since the last fresh code.
    pub fn repeat_count(&self) -> u8 {
        self.repeat_count
    }

    pub fn last_code(&self) -> Option<u8> {
        self.last_code
    }
}
