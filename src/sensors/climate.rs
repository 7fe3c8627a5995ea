//! DHT22 temperature / humidity monitoring.
//!
//! The sensor itself sits behind [`ClimatePort`]; this module only paces
//! the reads and reports them. It never touches the brightness state.
//!
//! A failed read is transient: it is reported and the next interval simply
//! tries again.

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::{ClimatePort, EventSink};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub celsius: f32,
    /// Relative humidity (0 – 100 %).
    pub humidity_percent: f32,
}

impl ClimateReading {
    pub fn fahrenheit(&self) -> f32 {
        self.celsius * 9.0 / 5.0 + 32.0
    }
}

/// Paces sensor reads at a fixed interval.
pub struct ClimateMonitor {
    interval_ms: u32,
    last_read_ms: Option<u32>,
    last: Option<ClimateReading>,
    failures: u32,
}

impl ClimateMonitor {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_read_ms: None,
            last: None,
            failures: 0,
        }
    }

    /// Read the sensor if the interval has elapsed. Returns the fresh
    /// reading, or `None` when not due or the read failed.
    pub fn poll(
        &mut self,
        now_ms: u32,
        sensor: &mut impl ClimatePort,
        sink: &mut impl EventSink,
    ) -> Option<ClimateReading> {
        if let Some(last) = self.last_read_ms {
            if now_ms.wrapping_sub(last) < self.interval_ms {
                return None;
            }
        }
        self.last_read_ms = Some(now_ms);

        match sensor.read() {
            Ok(reading) => {
                self.last = Some(reading);
                sink.emit(&AppEvent::Climate(reading));
                Some(reading)
            }
            Err(e) => {
                self.failures = self.failures.saturating_add(1);
                warn!("Failed to read sensor data: {}", e);
                sink.emit(&AppEvent::ClimateReadFailed(e));
                None
            }
        }
    }

    /// Most recent successful reading.
    pub fn last(&self) -> Option<ClimateReading> {
        self.last
    }

    /// Failed reads since boot.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
