//! Tick-driven debounced switch classifier with press / hold detection.
//!
//! ## Hardware
//!
//! Three active-low momentary switches to ground with internal pull-ups.
//! The GPIO falling-edge interrupt only wakes the main loop; all timing
//! happens in [`SwitchClassifier::sample`], called at the poll interval
//! while a press is in progress. Nothing here blocks, so a held switch
//! never stalls the other lines or the IR stream.
//!
//! ## Gesture detection
//!
//! | Gesture | Condition                                   | Emitted              |
//! |---------|---------------------------------------------|----------------------|
//! | Noise   | Line released before the debounce re-sample | nothing              |
//! | Press   | Released before `hold_threshold_ms`         | on release           |
//! | Hold    | Still active after `hold_threshold_ms`      | at threshold crossing|
//!
//! ```text
//!  IDLE ──[active, re-armed]──▶ DEBOUNCING ──[inactive after debounce]──▶ IDLE
//!                                   │
//!                          [active after debounce]
//!                                   ▼
//!  IDLE ◀──[inactive: Press]─── PRESSED ──[elapsed > hold: Hold]──▶ HELD
//!    ▲                                                                │
//!    └──────────────────────────[inactive]────────────────────────────┘
//! ```

use log::debug;

use super::Gesture;
use crate::config::LightConfig;
use crate::pins;

/// Logical switch identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SwitchLine {
    Top = 0,
    Middle = 1,
    Bottom = 2,
}

impl SwitchLine {
    /// Total number of lines, used to size per-line arrays.
    pub const COUNT: usize = 3;

    /// Every line, in table order.
    pub const ALL: [Self; Self::COUNT] = [Self::Top, Self::Middle, Self::Bottom];

    /// GPIO this line is wired to.
    pub const fn gpio(self) -> i32 {
        match self {
            Self::Top => pins::TOP_SWITCH_GPIO,
            Self::Middle => pins::MIDDLE_SWITCH_GPIO,
            Self::Bottom => pins::BOTTOM_SWITCH_GPIO,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Timing parameters, copied out of [`LightConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchTiming {
    pub debounce_ms: u32,
    pub hold_threshold_ms: u32,
}

impl SwitchTiming {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            debounce_ms: config.debounce_ms,
            hold_threshold_ms: config.hold_threshold_ms,
        }
    }
}

impl Default for SwitchTiming {
    fn default() -> Self {
        Self::from_config(&LightConfig::default())
    }
}

/// Internal state machine for gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Debouncing { since_ms: u32 },
    Pressed { since_ms: u32 },
    Held,
}

pub struct SwitchClassifier {
    line: SwitchLine,
    timing: SwitchTiming,
    state: GestureState,
    /// Re-arm guard: set on the falling edge, cleared only once release is
    /// observed. A new activation is not recognised while it is set.
    stable_active: bool,
}

impl SwitchClassifier {
    pub fn new(line: SwitchLine, timing: SwitchTiming) -> Self {
        Self {
            line,
            timing,
            state: GestureState::Idle,
            stable_active: false,
        }
    }

    pub fn line(&self) -> SwitchLine {
        self.line
    }

    /// True while an activation is being tracked; the caller should keep
    /// sampling at the poll interval until this goes false.
    pub fn is_busy(&self) -> bool {
        self.state != GestureState::Idle
    }

    /// Feed one sample of the raw line level (`false` = pulled low = pressed).
    /// `now_ms` is monotonic milliseconds; wrap-around is handled.
    pub fn sample(&mut self, now_ms: u32, level: bool) -> Option<Gesture> {
        let active = !level;

        match self.state {
            GestureState::Idle => {
                if active && !self.stable_active {
                    self.stable_active = true;
                    self.state = GestureState::Debouncing { since_ms: now_ms };
                }
                None
            }

            GestureState::Debouncing { since_ms } => {
                if now_ms.wrapping_sub(since_ms) < self.timing.debounce_ms {
                    return None;
                }
                if active {
                    self.state = GestureState::Pressed { since_ms: now_ms };
                } else {
                    debug!("{:?}: edge discarded as noise", self.line);
                    self.rearm();
                }
                None
            }

            GestureState::Pressed { since_ms } => {
                if !active {
                    debug!("{:?}: press", self.line);
                    self.rearm();
                    return Some(Gesture::Press);
                }
                if now_ms.wrapping_sub(since_ms) > self.timing.hold_threshold_ms {
                    debug!("{:?}: hold", self.line);
                    self.state = GestureState::Held;
                    return Some(Gesture::Hold);
                }
                None
            }

            GestureState::Held => {
                if !active {
                    self.rearm();
                }
                None
            }
        }
    }

    fn rearm(&mut self) {
        self.state = GestureState::Idle;
        self.stable_active = false;
    }
}
