//! Kayak light firmware: main entry point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   SignalDisplay   Dht22        │
//! │  (Switch+Duty)     (EventSink)    (DisplayPort)   (Climate)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              LightService (pure logic)                 │    │
//! │  │  Switch/IR classifiers · ActionTable · SharedLight     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ISRs + esp_timer ticks ──▶ event channel ──▶ main loop        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info, warn};

use kayaklight::adapters::display::{DisplaySignal, LogDisplay, SignalDisplay};
use kayaklight::adapters::hardware::HardwareAdapter;
use kayaklight::adapters::log_sink::LogEventSink;
use kayaklight::app::ports::DisplayPort;
use kayaklight::app::service::LightService;
use kayaklight::config::LightConfig;
use kayaklight::drivers::{hw_init, hw_timer};
use kayaklight::events;
use kayaklight::light::Brightness;
use kayaklight::light::polarity::Polarity;
use kayaklight::light::shared::SharedLight;
use kayaklight::pins;
use kayaklight::sensors::dht22::Dht22;

/// Requests for the segment driver. Only the newest unshown one is kept.
static DISPLAY: DisplaySignal = DisplaySignal::new();

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  KayakLight v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = LightConfig::default();
    config.validate()?;

    // ── 3. Initialise hardware peripherals ────────────────────
    let polarity = Polarity::from_invert_flag(config.invert_polarity);
    if let Err(e) = hw_init::init_peripherals(config.pwm_freq_hz, polarity) {
        // Without the PWM channel there is nothing useful to do.
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        warn!("ISR service init failed: {}, switches polled only", e);
    }
    hw_timer::start_timers(config.poll_interval_ms, config.climate_interval_ms);

    // ── 4. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new();
    let mut display = SignalDisplay::new(&DISPLAY);
    let mut dht = Dht22::new(pins::DHT22_GPIO);
    let mut log_sink = LogEventSink::new();
    // Stands in for the segment driver until one is wired up.
    let mut segments = LogDisplay::new();

    // ── 5. Construct the light and the service ────────────────
    let light = SharedLight::new(Brightness::new(&config)?);
    let mut app = LightService::new(&config, &light);
    app.start(&mut hw, &mut display, &mut log_sink)?;

    info!(
        "IR receiver on GPIO{}: decoder feeds events::push_ir_raw()",
        pins::IR_RECEIVER_GPIO
    );
    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    let mut dropped_seen = 0;
    loop {
        let now_ms = hw_timer::now_ms();

        let mut fault = None;
        events::drain_events(|event| {
            if let Err(e) = app.handle_event(event, now_ms, &mut hw, &mut display, &mut dht, &mut log_sink) {
                fault = Some(e);
            }
        });
        if let Some(e) = fault {
            // Brightness state is corrupt: stop driving the light.
            error!("Fatal: {}, halting", e);
            hw_timer::stop_timers();
            #[allow(clippy::empty_loop)]
            loop {}
        }

        if let Some(request) = DISPLAY.try_take() {
            segments.show(request);
        }

        let dropped = events::dropped_events();
        if dropped != dropped_seen {
            warn!("Event queue overflow: {} events dropped since boot", dropped);
            dropped_seen = dropped;
        }

        // Yield to the idle task between drains.
        esp_idf_svc::hal::delay::FreeRtos::delay_ms(1);
    }
}
