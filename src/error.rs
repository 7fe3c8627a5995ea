//! Unified error types for the kayak light firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! main loop's reporting uniform. All variants are `Copy` so they can be
//! carried through [`AppEvent`](crate::app::events::AppEvent)s and across
//! the critical section without allocation.
//!
//! | Class              | Policy                                         |
//! |--------------------|------------------------------------------------|
//! | `Input`            | reported, non-fatal, action skipped            |
//! | `Sensor`           | transient, reported, ignored for this cycle    |
//! | `Actuator`         | reported, non-fatal                            |
//! | `Invariant`        | fail fast: abort the operation, log at `error` |
//! | `Config`           | rejected at load time                          |

use core::fmt;

use crate::drivers::ir_remote::IrDecodeError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A switch line or IR code could not be turned into an action.
    Input(InputError),
    /// A sensor or input line could not be read.
    Sensor(SensorError),
    /// The PWM output rejected a write.
    Actuator(ActuatorError),
    /// Brightness state is corrupt.
    Invariant(InvariantViolation),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "input: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Invariant(e) => write!(f, "invariant: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// The remote sent a code with no entry in the action table.
    UnmappedButton(u8),
    /// The IR decoder reported a malformed frame.
    Decode(IrDecodeError),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedButton(code) => write!(f, "button 0x{code:02x} not mapped"),
            Self::Decode(e) => write!(f, "IR decode: {e}"),
        }
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<IrDecodeError> for Error {
    fn from(e: IrDecodeError) -> Self {
        Self::Input(InputError::Decode(e))
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO read returned an error.
    GpioReadFailed,
    /// The temperature/humidity sensor did not answer.
    ClimateReadFailed,
    /// The sensor frame failed its checksum.
    ChecksumMismatch,
    /// The sensor did not respond in time.
    Timeout,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::ClimateReadFailed => write!(f, "climate sensor read failed"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::Timeout => write!(f, "sensor timeout"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Invariant violations
// ---------------------------------------------------------------------------

/// Programming-error class: the brightness state was observed (or was
/// about to be put) outside its valid domain. Never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A level that is neither the off sentinel nor inside `[low, high]`.
    LevelOutOfRange(u16),
    /// The off sentinel falls inside the on range, so "off" is ambiguous.
    OffSentinelInsideRange(u16),
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LevelOutOfRange(level) => write!(f, "level {level} outside valid range"),
            Self::OffSentinelInsideRange(off) => {
                write!(f, "off sentinel {off} lies inside the on range")
            }
        }
    }
}

impl core::error::Error for InvariantViolation {}

impl From<InvariantViolation> for Error {
    fn from(e: InvariantViolation) -> Self {
        Self::Invariant(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
