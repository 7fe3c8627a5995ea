//! Mock hardware adapters for integration tests.
//!
//! Records every duty write, display request and application event so
//! tests can assert on the full history without touching real GPIO/PWM
//! registers.

use kayaklight::app::events::AppEvent;
use kayaklight::app::ports::{ClimatePort, DisplayPort, DutyPort, EventSink, SwitchPort};
use kayaklight::drivers::button::SwitchLine;
use kayaklight::error::{ActuatorError, SensorError};
use kayaklight::light::display::DisplayRequest;
use kayaklight::sensors::climate::ClimateReading;

pub const PRESSED: bool = false;
pub const RELEASED: bool = true;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Raw line levels, indexed by `SwitchLine::index()`.
    pub levels: [bool; SwitchLine::COUNT],
    pub duties: Vec<u16>,
    pub fail_pwm: bool,
    pub unreadable: Option<SwitchLine>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            levels: [RELEASED; SwitchLine::COUNT],
            duties: Vec::new(),
            fail_pwm: false,
            unreadable: None,
        }
    }

    pub fn set(&mut self, line: SwitchLine, level: bool) {
        self.levels[line.index()] = level;
    }

    pub fn last_duty(&self) -> Option<u16> {
        self.duties.last().copied()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchPort for MockHardware {
    fn read_level(&mut self, line: SwitchLine) -> Result<bool, SensorError> {
        if self.unreadable == Some(line) {
            return Err(SensorError::GpioReadFailed);
        }
        Ok(self.levels[line.index()])
    }
}

impl DutyPort for MockHardware {
    fn set_duty(&mut self, duty: u16) -> Result<(), ActuatorError> {
        if self.fail_pwm {
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.duties.push(duty);
        Ok(())
    }
}

// ── RecordingDisplay ──────────────────────────────────────────

#[derive(Default)]
pub struct RecordingDisplay {
    pub shown: Vec<DisplayRequest>,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_text(&self) -> Option<String> {
        self.shown.last().map(|r| r.text().as_str().to_owned())
    }
}

impl DisplayPort for RecordingDisplay {
    fn show(&mut self, request: DisplayRequest) {
        self.shown.push(request);
    }
}

// ── MockClimate ───────────────────────────────────────────────

pub struct MockClimate {
    pub next: Result<ClimateReading, SensorError>,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockClimate {
    pub fn ok(celsius: f32, humidity_percent: f32) -> Self {
        Self {
            next: Ok(ClimateReading {
                celsius,
                humidity_percent,
            }),
            reads: 0,
        }
    }

    pub fn failing(e: SensorError) -> Self {
        Self {
            next: Err(e),
            reads: 0,
        }
    }
}

impl ClimatePort for MockClimate {
    fn read(&mut self) -> Result<ClimateReading, SensorError> {
        self.reads += 1;
        self.next
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level_changes(&self) -> Vec<u16> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::LevelChanged { level, .. } => Some(*level),
                _ => None,
            })
            .collect()
    }

    pub fn rejections(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::InputRejected(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
