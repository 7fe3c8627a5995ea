//! Brightness state machine.
//!
//! [`Brightness`] owns the duty-cycle setpoint `level` and the
//! `last_valid_level` used to come back from toggle-off. It is pure: every
//! operation returns the resulting [`LevelChange`] (physical duty plus a
//! display request) and the caller decides how to apply it. Shared access
//! from several input contexts goes through [`shared::SharedLight`].
//!
//! ```text
//!            toggle_off                       increment / decrement
//!   ON ───────────────────▶ OFF          (saturating in [low, high])
//!    ▲  saves last_valid     │                   jump_to(High|Mid|Low)
//!    └───────────────────────┘                   set_level_if_on(v)
//!         toggle_off: restores last_valid     (all no-ops while OFF)
//! ```

pub mod display;
pub mod polarity;
pub mod shared;

use log::error;

use crate::config::LightConfig;
use crate::error::InvariantViolation;
use display::{DisplayMode, DisplayRequest, LevelName, percent_of_full_scale};
use polarity::Polarity;

/// Preset levels reachable by hold actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedLevel {
    High,
    Mid,
    Low,
}

/// Everything an input can ask the light to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightAction {
    /// Mapped but deliberately inert.
    None,
    Increment,
    Decrement,
    JumpTo(NamedLevel),
    /// Discrete preset; ignored while off.
    SetLevelIfOn(u16),
    ToggleOff,
}

/// Outcome of a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub level: u16,
    /// Value for the PWM output, polarity already applied.
    pub duty: u16,
    pub display: DisplayRequest,
}

/// Static brightness limits, copied out of [`LightConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub low: u16,
    pub mid: u16,
    pub high: u16,
    pub off: u16,
    pub step: u16,
}

impl Limits {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            low: config.low_threshold,
            mid: config.mid_threshold,
            high: config.high_threshold,
            off: config.off_sentinel,
            step: config.increment,
        }
    }

    fn is_on_level(&self, level: u16) -> bool {
        (self.low..=self.high).contains(&level)
    }

    fn named(&self, name: NamedLevel) -> u16 {
        match name {
            NamedLevel::High => self.high,
            NamedLevel::Mid => self.mid,
            NamedLevel::Low => self.low,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Brightness {
    level: u16,
    last_valid_level: u16,
    limits: Limits,
    polarity: Polarity,
    display_duration_ms: u32,
}

impl Brightness {
    /// Build the state from configuration, starting at `initial_level`.
    pub fn new(config: &LightConfig) -> Result<Self, InvariantViolation> {
        let limits = Limits::from_config(config);
        if limits.is_on_level(limits.off) {
            return Err(InvariantViolation::OffSentinelInsideRange(limits.off));
        }
        let level = config.initial_level;
        if level != limits.off && !limits.is_on_level(level) {
            return Err(InvariantViolation::LevelOutOfRange(level));
        }
        Ok(Self {
            level,
            // Booting dark still needs somewhere to toggle back on to.
            last_valid_level: if level == limits.off { limits.mid } else { level },
            limits,
            polarity: Polarity::from_invert_flag(config.invert_polarity),
            display_duration_ms: config.display_duration_ms,
        })
    }

    pub fn level(&self) -> u16 {
        self.level
    }

    pub fn last_valid_level(&self) -> u16 {
        self.last_valid_level
    }

    pub fn is_off(&self) -> bool {
        self.level == self.limits.off
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Physical duty for the current level.
    pub fn duty(&self) -> u16 {
        if self.is_off() {
            self.polarity.off_duty()
        } else {
            self.polarity.to_duty(self.level)
        }
    }

    /// The current state expressed as a change, for re-applying outputs.
    pub fn current(&self) -> LevelChange {
        LevelChange {
            level: self.level,
            duty: self.duty(),
            display: self.display_request(),
        }
    }

    // ── Operations ────────────────────────────────────────────

    /// Assign `level` directly. Does not clamp: `v` must already be the off
    /// sentinel or inside `[low, high]`.
    pub fn set_level(&mut self, v: u16) -> Result<LevelChange, InvariantViolation> {
        self.check()?;
        if v != self.limits.off && !self.limits.is_on_level(v) {
            error!("set_level({v}) rejected: outside valid range");
            return Err(InvariantViolation::LevelOutOfRange(v));
        }
        self.level = v;
        Ok(self.current())
    }

    /// Step brighter, saturating at `high`. No-op while off.
    pub fn increment(&mut self) -> Result<Option<LevelChange>, InvariantViolation> {
        self.check()?;
        if self.is_off() {
            return Ok(None);
        }
        let next = self.level.saturating_add(self.limits.step).min(self.limits.high);
        self.set_level(next).map(Some)
    }

    /// Step dimmer, saturating at `low`. No-op while off.
    pub fn decrement(&mut self) -> Result<Option<LevelChange>, InvariantViolation> {
        self.check()?;
        if self.is_off() {
            return Ok(None);
        }
        let next = self.level.saturating_sub(self.limits.step).max(self.limits.low);
        self.set_level(next).map(Some)
    }

    /// Jump to a preset. No-op while off.
    pub fn jump_to(&mut self, name: NamedLevel) -> Result<Option<LevelChange>, InvariantViolation> {
        self.check()?;
        if self.is_off() {
            return Ok(None);
        }
        self.set_level(self.limits.named(name)).map(Some)
    }

    /// Jump to an arbitrary on level. No-op while off.
    pub fn set_level_if_on(&mut self, v: u16) -> Result<Option<LevelChange>, InvariantViolation> {
        self.check()?;
        if self.is_off() {
            return Ok(None);
        }
        self.set_level(v).map(Some)
    }

    /// On → remember the level and go off. Off → restore the remembered level.
    pub fn toggle_off(&mut self) -> Result<LevelChange, InvariantViolation> {
        self.check()?;
        if self.is_off() {
            self.set_level(self.last_valid_level)
        } else {
            self.last_valid_level = self.level;
            self.set_level(self.limits.off)
        }
    }

    /// Execute one dispatched action.
    pub fn apply(&mut self, action: LightAction) -> Result<Option<LevelChange>, InvariantViolation> {
        match action {
            LightAction::None => Ok(None),
            LightAction::Increment => self.increment(),
            LightAction::Decrement => self.decrement(),
            LightAction::JumpTo(name) => self.jump_to(name),
            LightAction::SetLevelIfOn(v) => self.set_level_if_on(v),
            LightAction::ToggleOff => self.toggle_off().map(Some),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn check(&self) -> Result<(), InvariantViolation> {
        if !self.is_off() && !self.limits.is_on_level(self.level) {
            error!("brightness state corrupt: level={}", self.level);
            return Err(InvariantViolation::LevelOutOfRange(self.level));
        }
        if !self.limits.is_on_level(self.last_valid_level) {
            error!("brightness state corrupt: last_valid_level={}", self.last_valid_level);
            return Err(InvariantViolation::LevelOutOfRange(self.last_valid_level));
        }
        Ok(())
    }

    fn display_request(&self) -> DisplayRequest {
        let mode = if self.is_off() {
            DisplayMode::Named(LevelName::Off)
        } else if self.level == self.limits.high {
            DisplayMode::Named(LevelName::High)
        } else if self.level == self.limits.low {
            DisplayMode::Named(LevelName::Low)
        } else {
            DisplayMode::Percent(percent_of_full_scale(self.level))
        };
        DisplayRequest {
            mode,
            duration_ms: self.display_duration_ms,
        }
    }

    #[cfg(test)]
    fn corrupt(&mut self, level: u16) {
        self.level = level;
    }
}
