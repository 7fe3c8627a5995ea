//! Integration tests for the switch → classifier → dispatch → light
//! pipeline, driven through `LightService` with mock adapters.

use super::mock_hw::{MockClimate, MockHardware, PRESSED, RELEASED, RecordingDisplay, RecordingSink};

use kayaklight::app::events::AppEvent;
use kayaklight::app::service::LightService;
use kayaklight::config::LightConfig;
use kayaklight::drivers::button::SwitchLine;
use kayaklight::error::{ActuatorError, Error, InvariantViolation, SensorError};
use kayaklight::events::Event;
use kayaklight::light::Brightness;
use kayaklight::light::shared::SharedLight;

const START_LEVEL: u16 = 32_767;

struct Bench {
    hw: MockHardware,
    display: RecordingDisplay,
    sink: RecordingSink,
}

impl Bench {
    fn new() -> Self {
        Self {
            hw: MockHardware::new(),
            display: RecordingDisplay::new(),
            sink: RecordingSink::new(),
        }
    }

    /// Forget everything recorded so far.
    fn clear(&mut self) {
        self.hw.duties.clear();
        self.display.shown.clear();
        self.sink.events.clear();
    }
}

fn make_light(config: &LightConfig) -> SharedLight {
    SharedLight::new(Brightness::new(config).unwrap())
}

fn start(app: &mut LightService<'_>, b: &mut Bench) {
    app.start(&mut b.hw, &mut b.display, &mut b.sink).unwrap();
    b.clear();
}

/// Poll every 10 ms from `from` to `to` inclusive with `line` at `level`.
fn drive(app: &mut LightService<'_>, b: &mut Bench, line: SwitchLine, level: bool, from: u32, to: u32) {
    b.hw.set(line, level);
    for t in (from..=to).step_by(10) {
        app.poll_switches(t, &mut b.hw, &mut b.display, &mut b.sink).unwrap();
    }
}

/// A 100 ms tap starting at `t0`.
fn tap(app: &mut LightService<'_>, b: &mut Bench, line: SwitchLine, t0: u32) {
    drive(app, b, line, PRESSED, t0, t0 + 90);
    drive(app, b, line, RELEASED, t0 + 100, t0 + 120);
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_applies_initial_level_with_inverted_duty() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();

    app.start(&mut b.hw, &mut b.display, &mut b.sink).unwrap();

    assert_eq!(b.hw.duties, vec![u16::MAX - START_LEVEL]);
    assert_eq!(b.display.last_text().as_deref(), Some("50%"));
    assert_eq!(
        b.sink.events,
        vec![AppEvent::Started {
            level: START_LEVEL,
            duty: u16::MAX - START_LEVEL
        }]
    );
}

#[test]
fn corrupt_config_rejected_before_service_exists() {
    let config = LightConfig {
        off_sentinel: 5000,
        ..LightConfig::default()
    };
    assert!(config.validate().is_err());
    assert_eq!(
        Brightness::new(&config).err(),
        Some(InvariantViolation::OffSentinelInsideRange(5000))
    );
}

// ── Switch gestures ───────────────────────────────────────────

#[test]
fn top_tap_increments_once() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    start(&mut app, &mut b);

    tap(&mut app, &mut b, SwitchLine::Top, 0);

    assert_eq!(b.sink.level_changes(), vec![START_LEVEL + 1000]);
    assert_eq!(b.hw.duties, vec![u16::MAX - (START_LEVEL + 1000)]);
    assert_eq!(b.display.last_text().as_deref(), Some("52%"));
    assert!(!app.switches_busy());
}

#[test]
fn top_hold_jumps_high_once_and_release_is_silent() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    start(&mut app, &mut b);

    drive(&mut app, &mut b, SwitchLine::Top, PRESSED, 0, 1500);
    assert_eq!(b.sink.level_changes(), vec![config.high_threshold]);
    assert_eq!(b.display.last_text().as_deref(), Some("high"));

    drive(&mut app, &mut b, SwitchLine::Top, RELEASED, 1510, 1600);
    assert_eq!(b.sink.level_changes().len(), 1, "release after hold must not press");
}

#[test]
fn bottom_hold_jumps_low() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    start(&mut app, &mut b);

    drive(&mut app, &mut b, SwitchLine::Bottom, PRESSED, 0, 1000);
    assert_eq!(light.snapshot().level, config.low_threshold);
    assert_eq!(b.display.last_text().as_deref(), Some("low "));
}

#[test]
fn glitch_shorter_than_debounce_is_ignored() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    start(&mut app, &mut b);

    drive(&mut app, &mut b, SwitchLine::Top, PRESSED, 0, 20);
    drive(&mut app, &mut b, SwitchLine::Top, RELEASED, 30, 200);

    assert!(b.sink.events.is_empty());
    assert_eq!(light.snapshot().level, START_LEVEL);
}

#[test]
fn middle_tap_toggles_off_and_back() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    start(&mut app, &mut b);

    tap(&mut app, &mut b, SwitchLine::Middle, 0);
    let snap = light.snapshot();
    assert!(snap.is_off);
    assert_eq!(snap.last_valid_level, START_LEVEL);
    assert_eq!(b.hw.last_duty(), Some(u16::MAX), "inverted off is full duty");
    assert_eq!(b.display.last_text().as_deref(), Some("off "));

    tap(&mut app, &mut b, SwitchLine::Middle, 1000);
    assert_eq!(light.snapshot().level, START_LEVEL);
    assert_eq!(b.hw.last_duty(), Some(u16::MAX - START_LEVEL));
}

#[test]
fn level_actions_are_noops_while_off() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    start(&mut app, &mut b);

    tap(&mut app, &mut b, SwitchLine::Middle, 0);
    b.clear();

    tap(&mut app, &mut b, SwitchLine::Top, 1000);
    tap(&mut app, &mut b, SwitchLine::Bottom, 2000);
    drive(&mut app, &mut b, SwitchLine::Top, PRESSED, 3000, 4000);
    drive(&mut app, &mut b, SwitchLine::Top, RELEASED, 4010, 4100);

    assert!(b.hw.duties.is_empty());
    assert!(b.display.shown.is_empty());
    assert!(b.sink.level_changes().is_empty());
    assert!(light.snapshot().is_off);
}

#[test]
fn two_switches_classified_independently() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    start(&mut app, &mut b);

    // Top held the whole time; bottom tapped while top is still down.
    b.hw.set(SwitchLine::Top, PRESSED);
    for t in (0..=1200).step_by(10) {
        let bottom = if (200..300).contains(&t) { PRESSED } else { RELEASED };
        b.hw.set(SwitchLine::Bottom, bottom);
        app.poll_switches(t, &mut b.hw, &mut b.display, &mut b.sink).unwrap();
    }

    // Bottom tap decrements first, then top's hold jumps high.
    assert_eq!(
        b.sink.level_changes(),
        vec![START_LEVEL - 1000, config.high_threshold]
    );
}

// ── Fault reporting ───────────────────────────────────────────

#[test]
fn unreadable_line_reported_others_still_work() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    start(&mut app, &mut b);
    b.hw.unreadable = Some(SwitchLine::Bottom);

    tap(&mut app, &mut b, SwitchLine::Top, 0);

    assert_eq!(b.sink.level_changes(), vec![START_LEVEL + 1000]);
    assert!(b.sink.events.contains(&AppEvent::InputRejected(Error::Sensor(
        SensorError::GpioReadFailed
    ))));
}

#[test]
fn pwm_failure_reported_and_rolled_back() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    start(&mut app, &mut b);
    b.hw.fail_pwm = true;

    tap(&mut app, &mut b, SwitchLine::Top, 0);

    assert!(b.sink.events.contains(&AppEvent::InputRejected(Error::Actuator(
        ActuatorError::PwmWriteFailed
    ))));
    assert!(b.display.shown.is_empty());
    assert_eq!(light.snapshot().level, START_LEVEL);
}

#[test]
fn failed_toggle_off_keeps_state_matching_output() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    app.start(&mut b.hw, &mut b.display, &mut b.sink).unwrap();
    let lit_duty = u16::MAX - START_LEVEL;
    assert_eq!(b.hw.last_duty(), Some(lit_duty));

    b.hw.fail_pwm = true;
    app.on_raw_ir(0x16, &mut b.hw, &mut b.display, &mut b.sink).unwrap();
    assert!(!light.snapshot().is_off, "lamp is still lit, so the state must say on");
    assert_eq!(b.hw.last_duty(), Some(lit_duty));

    b.hw.fail_pwm = false;
    for _ in 0..5 {
        app.on_raw_ir(0x18, &mut b.hw, &mut b.display, &mut b.sink).unwrap();
    }
    let snap = light.snapshot();
    assert_eq!(snap.level, START_LEVEL + 5 * config.increment);
    assert_eq!(b.hw.last_duty(), Some(snap.duty));

    // Toggling off now works and drives the dark duty.
    app.on_raw_ir(0x16, &mut b.hw, &mut b.display, &mut b.sink).unwrap();
    assert!(light.snapshot().is_off);
    assert_eq!(b.hw.last_duty(), Some(u16::MAX));
}

// ── Event loop glue ───────────────────────────────────────────

#[test]
fn handle_event_routes_every_kind() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    let mut dht = MockClimate::ok(20.0, 55.0);
    start(&mut app, &mut b);

    app.handle_event(Event::IrRaw(0x45), 0, &mut b.hw, &mut b.display, &mut dht, &mut b.sink)
        .unwrap();
    assert_eq!(light.snapshot().level, config.low_threshold);

    b.hw.set(SwitchLine::Top, PRESSED);
    app.handle_event(Event::SwitchEdge(SwitchLine::Top), 100, &mut b.hw, &mut b.display, &mut dht, &mut b.sink)
        .unwrap();
    assert!(app.switches_busy());

    app.handle_event(Event::ClimateTick, 200, &mut b.hw, &mut b.display, &mut dht, &mut b.sink)
        .unwrap();
    app.handle_event(Event::ClimateTick, 300, &mut b.hw, &mut b.display, &mut dht, &mut b.sink)
        .unwrap();
    assert_eq!(dht.reads, 1, "second tick inside the interval must not read");
    assert!(matches!(
        app.climate().last(),
        Some(r) if (r.fahrenheit() - 68.0).abs() < 0.01
    ));

    for t in (110..=400).step_by(10) {
        let level = if t <= 200 { PRESSED } else { RELEASED };
        b.hw.set(SwitchLine::Top, level);
        app.handle_event(Event::PollTick, t, &mut b.hw, &mut b.display, &mut dht, &mut b.sink)
            .unwrap();
    }
    assert_eq!(light.snapshot().level, config.low_threshold + 1000);
    assert!(!app.switches_busy());
}

#[test]
fn climate_failure_does_not_touch_light() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    let mut dht = MockClimate::failing(SensorError::ChecksumMismatch);
    start(&mut app, &mut b);

    app.handle_event(Event::ClimateTick, 0, &mut b.hw, &mut b.display, &mut dht, &mut b.sink)
        .unwrap();

    assert_eq!(
        b.sink.events,
        vec![AppEvent::ClimateReadFailed(SensorError::ChecksumMismatch)]
    );
    assert!(b.hw.duties.is_empty());
    assert_eq!(light.snapshot().level, START_LEVEL);
}

#[test]
fn direct_polarity_writes_level_as_duty() {
    let config = LightConfig {
        invert_polarity: false,
        ..LightConfig::default()
    };
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = Bench::new();
    app.start(&mut b.hw, &mut b.display, &mut b.sink).unwrap();
    assert_eq!(b.hw.last_duty(), Some(START_LEVEL));

    tap(&mut app, &mut b, SwitchLine::Middle, 0);
    assert_eq!(b.hw.last_duty(), Some(0));
}
