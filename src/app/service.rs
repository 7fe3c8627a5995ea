//! Light service, the hexagonal core.
//!
//! [`LightService`] owns the input classifiers, the dispatch table, and the
//! climate monitor, and holds a handle to the [`SharedLight`]. All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SwitchPort ──▶ ┌──────────────────────────────┐ ──▶ DisplayPort
//!  IR frames  ──▶ │         LightService          │ ──▶ EventSink
//!                 │ classify · dispatch · apply   │
//!    DutyPort ◀── └──────────────┬───────────────┘
//!                                ▼
//!                           SharedLight
//! ```

use log::{error, info, warn};

use crate::config::LightConfig;
use crate::drivers::Gesture;
use crate::drivers::button::{SwitchClassifier, SwitchLine, SwitchTiming};
use crate::drivers::ir_remote::{IrClassifier, IrFrame};
use crate::error::{Error, InputError, Result};
use crate::events::Event;
use crate::light::LevelChange;
use crate::light::shared::SharedLight;
use crate::sensors::climate::ClimateMonitor;

use super::dispatch::{ActionTable, ButtonId, build_action_table};
use super::events::AppEvent;
use super::ports::{ClimatePort, DisplayPort, DutyPort, EventSink, SwitchPort};

// ───────────────────────────────────────────────────────────────
// LightService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct LightService<'a> {
    light: &'a SharedLight,
    table: ActionTable,
    switches: [SwitchClassifier; SwitchLine::COUNT],
    ir: IrClassifier,
    climate: ClimateMonitor,
}

impl<'a> LightService<'a> {
    /// Construct the service with the default action table.
    ///
    /// Does **not** touch the output; call [`start`](Self::start) next.
    pub fn new(config: &LightConfig, light: &'a SharedLight) -> Self {
        Self::with_table(config, light, build_action_table(config))
    }

    /// Construct the service with a custom action table.
    pub fn with_table(config: &LightConfig, light: &'a SharedLight, table: ActionTable) -> Self {
        let timing = SwitchTiming::from_config(config);
        Self {
            light,
            table,
            switches: SwitchLine::ALL.map(|line| SwitchClassifier::new(line, timing)),
            ir: IrClassifier::new(),
            climate: ClimateMonitor::new(config.climate_interval_ms),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Apply the initial level to the output and announce it.
    pub fn start(
        &mut self,
        out: &mut impl DutyPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let current = self.light.sync_output(out)?;
        display.show(current.display);
        sink.emit(&AppEvent::Started {
            level: current.level,
            duty: current.duty,
        });
        info!("LightService started at level {} (duty {})", current.level, current.duty);
        Ok(())
    }

    // ── Main-loop glue ────────────────────────────────────────

    /// Process one queued event. Non-fatal problems are reported through
    /// `sink` and swallowed; only invariant violations are returned.
    pub fn handle_event(
        &mut self,
        event: Event,
        now_ms: u32,
        hw: &mut (impl SwitchPort + DutyPort),
        display: &mut impl DisplayPort,
        climate: &mut impl ClimatePort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match event {
            Event::SwitchEdge(_) | Event::PollTick => {
                self.poll_switches(now_ms, hw, display, sink)?;
            }
            Event::IrRaw(raw) => {
                self.on_raw_ir(raw, hw, display, sink)?;
            }
            Event::ClimateTick => {
                self.climate.poll(now_ms, climate, sink);
            }
        }
        Ok(())
    }

    // ── Switch input ──────────────────────────────────────────

    /// Sample every switch line once and dispatch any classified gesture.
    /// Call at the poll interval and on every edge interrupt.
    pub fn poll_switches(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SwitchPort + DutyPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        for line in SwitchLine::ALL {
            let level = match hw.read_level(line) {
                Ok(level) => level,
                Err(e) => {
                    warn!("{:?} switch unreadable: {}", line, e);
                    sink.emit(&AppEvent::InputRejected(e.into()));
                    continue;
                }
            };
            if let Some(gesture) = self.switches[line.index()].sample(now_ms, level) {
                self.dispatch(ButtonId::Switch(line), gesture, hw, display, sink)?;
            }
        }
        Ok(())
    }

    /// True while any switch is mid-activation (debouncing, pressed or held).
    pub fn switches_busy(&self) -> bool {
        self.switches.iter().any(SwitchClassifier::is_busy)
    }

    // ── IR input ──────────────────────────────────────────────

    /// Entry point for an already-decoded `(code, is_repeat)` event.
    pub fn on_decoded_event(
        &mut self,
        code: u8,
        is_repeat: bool,
        out: &mut impl DutyPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> Result<Option<LevelChange>> {
        self.on_ir_frame(IrFrame::from_parts(code, is_repeat), out, display, sink)
    }

    /// Entry point for the decoder's raw value, including its error codes.
    /// Decoder errors are transient: reported and otherwise ignored.
    pub fn on_raw_ir(
        &mut self,
        raw: i32,
        out: &mut impl DutyPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> Result<Option<LevelChange>> {
        match IrFrame::from_raw(raw) {
            Ok(frame) => self.on_ir_frame(frame, out, display, sink),
            Err(e) => {
                warn!("IR decode failed: {}", e);
                sink.emit(&AppEvent::InputRejected(e.into()));
                Ok(None)
            }
        }
    }

    fn on_ir_frame(
        &mut self,
        frame: IrFrame,
        out: &mut impl DutyPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> Result<Option<LevelChange>> {
        match self.ir.classify(frame) {
            Some((code, gesture)) => self.dispatch(ButtonId::Remote(code), gesture, out, display, sink),
            None => Ok(None),
        }
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Look up the action for a classified input and apply it.
    ///
    /// Unmapped buttons and output faults are reported and yield `Ok(None)`.
    /// An invariant violation aborts the operation and is returned.
    pub fn dispatch(
        &mut self,
        button: ButtonId,
        gesture: Gesture,
        out: &mut impl DutyPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> Result<Option<LevelChange>> {
        let action = match self.table.lookup(button, gesture) {
            Ok(action) => action,
            Err(e @ InputError::UnmappedButton(_)) => {
                warn!("{}", e);
                sink.emit(&AppEvent::InputRejected(e.into()));
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        sink.emit(&AppEvent::Input {
            button,
            gesture,
            action,
        });

        match self.light.apply(action, out) {
            Ok(Some(change)) => {
                display.show(change.display);
                sink.emit(&AppEvent::LevelChanged {
                    level: change.level,
                    duty: change.duty,
                });
                Ok(Some(change))
            }
            Ok(None) => Ok(None),
            Err(Error::Invariant(v)) => {
                error!("{:?} {:?} aborted: {}", button, gesture, v);
                sink.emit(&AppEvent::InvariantViolated(v));
                Err(Error::Invariant(v))
            }
            Err(e) => {
                warn!("{:?} {:?} not applied: {}", button, gesture, e);
                sink.emit(&AppEvent::InputRejected(e));
                Ok(None)
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn light(&self) -> &'a SharedLight {
        self.light
    }

    pub fn climate(&self) -> &ClimateMonitor {
        &self.climate
    }
}
