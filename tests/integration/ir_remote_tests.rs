//! Integration tests for the IR decode → classify → dispatch pipeline.

use super::mock_hw::{MockHardware, RecordingDisplay, RecordingSink};

use kayaklight::app::dispatch::{ButtonId, remote_codes};
use kayaklight::app::events::AppEvent;
use kayaklight::app::service::LightService;
use kayaklight::config::LightConfig;
use kayaklight::drivers::Gesture;
use kayaklight::drivers::ir_remote::{IrDecodeError, RAW_REPEAT};
use kayaklight::error::{Error, InputError};
use kayaklight::light::shared::SharedLight;
use kayaklight::light::{Brightness, LightAction, NamedLevel};

const START_LEVEL: u16 = 32_767;

struct Bench {
    hw: MockHardware,
    display: RecordingDisplay,
    sink: RecordingSink,
}

fn make_light(config: &LightConfig) -> SharedLight {
    SharedLight::new(Brightness::new(config).unwrap())
}

fn bench() -> Bench {
    Bench {
        hw: MockHardware::new(),
        display: RecordingDisplay::new(),
        sink: RecordingSink::new(),
    }
}

fn send(app: &mut LightService<'_>, b: &mut Bench, raw: i32) {
    app.on_raw_ir(raw, &mut b.hw, &mut b.display, &mut b.sink).unwrap();
}

fn inputs(sink: &RecordingSink) -> Vec<(ButtonId, Gesture, LightAction)> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Input {
                button,
                gesture,
                action,
            } => Some((*button, *gesture, *action)),
            _ => None,
        })
        .collect()
}

#[test]
fn key_one_press_then_repeats() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = bench();

    send(&mut app, &mut b, i32::from(remote_codes::KEY_1));
    send(&mut app, &mut b, RAW_REPEAT);
    send(&mut app, &mut b, RAW_REPEAT);
    send(&mut app, &mut b, RAW_REPEAT);

    let key = ButtonId::Remote(remote_codes::KEY_1);
    assert_eq!(
        inputs(&b.sink),
        vec![
            (key, Gesture::Press, LightAction::JumpTo(NamedLevel::Low)),
            (key, Gesture::Hold, LightAction::None),
        ]
    );
    assert_eq!(b.sink.level_changes(), vec![config.low_threshold]);
}

#[test]
fn held_up_key_ramps_after_settling() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = bench();

    send(&mut app, &mut b, i32::from(remote_codes::KEY_UP));
    for _ in 0..5 {
        send(&mut app, &mut b, RAW_REPEAT);
    }

    // Press, then holds on repeats 3, 4 and 5.
    assert_eq!(
        b.sink.level_changes(),
        vec![
            START_LEVEL + 1000,
            START_LEVEL + 2000,
            START_LEVEL + 3000,
            START_LEVEL + 4000,
        ]
    );
}

#[test]
fn held_down_key_saturates_at_low() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = bench();

    send(&mut app, &mut b, i32::from(remote_codes::KEY_DOWN));
    for _ in 0..100 {
        send(&mut app, &mut b, RAW_REPEAT);
    }

    assert_eq!(light.snapshot().level, config.low_threshold);
    assert_eq!(b.display.last_text().as_deref(), Some("low "));
}

#[test]
fn preset_keys_follow_ir_levels() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = bench();

    for (code, level) in remote_codes::PRESET_KEYS.into_iter().zip(config.ir_levels) {
        send(&mut app, &mut b, i32::from(code));
        assert_eq!(light.snapshot().level, level);
    }
    send(&mut app, &mut b, i32::from(remote_codes::KEY_9));
    assert_eq!(light.snapshot().level, config.high_threshold);
}

#[test]
fn star_toggles_and_presets_ignored_while_off() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = bench();

    send(&mut app, &mut b, i32::from(remote_codes::KEY_STAR));
    assert!(light.snapshot().is_off);
    let writes = b.hw.duties.len();

    send(&mut app, &mut b, i32::from(remote_codes::KEY_5));
    send(&mut app, &mut b, i32::from(remote_codes::KEY_UP));
    send(&mut app, &mut b, i32::from(remote_codes::KEY_9));
    assert_eq!(b.hw.duties.len(), writes);
    assert!(light.snapshot().is_off);

    send(&mut app, &mut b, i32::from(remote_codes::KEY_STAR));
    assert_eq!(light.snapshot().level, START_LEVEL);
}

#[test]
fn unmapped_code_reported_without_mutation() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = bench();

    send(&mut app, &mut b, 0x99);

    assert_eq!(
        b.sink.events,
        vec![AppEvent::InputRejected(Error::Input(InputError::UnmappedButton(0x99)))]
    );
    assert!(b.hw.duties.is_empty());
    assert_eq!(light.snapshot().level, START_LEVEL);
}

#[test]
fn decoder_errors_are_transient() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = bench();

    send(&mut app, &mut b, i32::from(remote_codes::KEY_UP));
    send(&mut app, &mut b, -5);
    send(&mut app, &mut b, -42);
    // The repeat stream survives the errors.
    send(&mut app, &mut b, RAW_REPEAT);
    send(&mut app, &mut b, RAW_REPEAT);
    send(&mut app, &mut b, RAW_REPEAT);

    assert!(b.sink.events.contains(&AppEvent::InputRejected(Error::Input(
        InputError::Decode(IrDecodeError::Overrun)
    ))));
    assert!(b.sink.events.contains(&AppEvent::InputRejected(Error::Input(
        InputError::Decode(IrDecodeError::Unknown(-42))
    ))));
    assert_eq!(b.sink.level_changes(), vec![START_LEVEL + 1000, START_LEVEL + 2000]);
}

#[test]
fn decoded_event_entry_point_matches_raw() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = bench();

    let change = app
        .on_decoded_event(remote_codes::KEY_UP, false, &mut b.hw, &mut b.display, &mut b.sink)
        .unwrap();
    assert_eq!(change.map(|c| c.level), Some(START_LEVEL + 1000));

    // The code byte of a repeat is ignored.
    for _ in 0..3 {
        app.on_decoded_event(0, true, &mut b.hw, &mut b.display, &mut b.sink)
            .unwrap();
    }
    assert_eq!(light.snapshot().level, START_LEVEL + 2000);
}

#[test]
fn spare_keys_are_mapped_but_inert() {
    let config = LightConfig::default();
    let light = make_light(&config);
    let mut app = LightService::new(&config, &light);
    let mut b = bench();

    for code in [
        remote_codes::KEY_0,
        remote_codes::KEY_POUND,
        remote_codes::KEY_LEFT,
        remote_codes::KEY_RIGHT,
        remote_codes::KEY_OK,
    ] {
        send(&mut app, &mut b, i32::from(code));
    }

    assert_eq!(b.sink.rejections(), 0);
    assert_eq!(inputs(&b.sink).len(), 5);
    assert!(b.hw.duties.is_empty());
}
