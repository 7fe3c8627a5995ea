//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LightService (domain)
//! ```
//!
//! Driven adapters (switch inputs, PWM output, display, climate sensor,
//! event sinks) implement these traits. The
//! [`LightService`](super::service::LightService) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! All port errors are typed; callers must handle every variant explicitly.

use crate::drivers::button::SwitchLine;
use crate::error::{ActuatorError, SensorError};
use crate::light::display::DisplayRequest;
use crate::sensors::climate::ClimateReading;

// ───────────────────────────────────────────────────────────────
// Switch port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the three override switches.
pub trait SwitchPort {
    /// Raw digital level of the line (`false` = pulled low = pressed).
    fn read_level(&mut self, line: SwitchLine) -> Result<bool, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Duty port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the light's PWM output.
pub trait DutyPort {
    /// Write a 16-bit duty value (polarity already applied).
    fn set_duty(&mut self, duty: u16) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → segment display)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget status output. Implementations may drop or overwrite
/// a request that has not been shown yet.
pub trait DisplayPort {
    fn show(&mut self, request: DisplayRequest);
}

// ───────────────────────────────────────────────────────────────
// Climate port (driven adapter: sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Temperature / humidity sensor.
pub trait ClimatePort {
    /// Trigger a measurement and return it.
    fn read(&mut self) -> Result<ClimateReading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, test
/// recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
