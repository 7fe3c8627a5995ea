//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { level, duty } => {
                info!("START | level={} duty={}", level, duty);
            }
            AppEvent::Input {
                button,
                gesture,
                action,
            } => {
                info!("INPUT | {:?} {:?} -> {:?}", button, gesture, action);
            }
            AppEvent::LevelChanged { level, duty } => {
                info!("LEVEL | level={} duty={}", level, duty);
            }
            AppEvent::InputRejected(e) => {
                warn!("REJECT | {}", e);
            }
            AppEvent::InvariantViolated(v) => {
                error!("INVARIANT | {}", v);
            }
            AppEvent::Climate(r) => {
                info!(
                    "CLIMATE | T={:.1}\u{00b0}C ({:.1}\u{00b0}F) | RH={:.1}%",
                    r.celsius,
                    r.fahrenheit(),
                    r.humidity_percent,
                );
            }
            AppEvent::ClimateReadFailed(e) => {
                warn!("CLIMATE | read failed: {}", e);
            }
        }
    }
}
