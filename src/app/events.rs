//! Outbound application events.
//!
//! The [`LightService`](super::service::LightService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them: log to serial, record in a test, etc.

use super::dispatch::ButtonId;
use crate::drivers::Gesture;
use crate::error::{Error, InvariantViolation, SensorError};
use crate::light::LightAction;
use crate::sensors::climate::ClimateReading;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The service applied its initial level to the output.
    Started { level: u16, duty: u16 },

    /// An input was classified and mapped to an action.
    Input {
        button: ButtonId,
        gesture: Gesture,
        action: LightAction,
    },

    /// Brightness changed.
    LevelChanged { level: u16, duty: u16 },

    /// An input could not be handled (unmapped code, decoder error,
    /// unreadable line, output fault). Non-fatal.
    InputRejected(Error),

    /// Brightness state found corrupt; the operation was aborted.
    InvariantViolated(InvariantViolation),

    /// Periodic climate reading.
    Climate(ClimateReading),

    /// The climate sensor did not answer this cycle.
    ClimateReadFailed(SensorError),
}
