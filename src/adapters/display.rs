//! Display adapters.
//!
//! The segment driver itself runs outside the core. These adapters hand
//! [`DisplayRequest`]s over to it:
//!
//! - [`SignalDisplay`] posts into an `embassy_sync` [`Signal`], so a request
//!   that has not been picked up yet is overwritten by the next one.
//! - [`LogDisplay`] writes the rendered text to the serial log.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::info;

use crate::app::ports::DisplayPort;
use crate::light::display::DisplayRequest;

/// Latest-value mailbox between the service and the display driver.
pub type DisplaySignal = Signal<CriticalSectionRawMutex, DisplayRequest>;

/// Posts requests to a [`DisplaySignal`]. Never blocks.
pub struct SignalDisplay<'a> {
    signal: &'a DisplaySignal,
}

impl<'a> SignalDisplay<'a> {
    pub fn new(signal: &'a DisplaySignal) -> Self {
        Self { signal }
    }
}

impl DisplayPort for SignalDisplay<'_> {
    fn show(&mut self, request: DisplayRequest) {
        self.signal.signal(request);
    }
}

/// Logs each request as `DISPLAY | "text" for N ms`.
#[derive(Default)]
pub struct LogDisplay;

impl LogDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl DisplayPort for LogDisplay {
    fn show(&mut self, request: DisplayRequest) {
        info!("DISPLAY | \"{}\" for {}ms", request.text(), request.duration_ms);
    }
}
