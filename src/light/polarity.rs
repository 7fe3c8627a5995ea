//! Logical level → physical duty mapping.
//!
//! Brightness levels are always stored as "more is brighter". Boards that
//! drive the fixture's dimming input through an inverting mosfet stage
//! need the complement written to the PWM, so the dark end of the scale
//! is the maximum duty value.

/// Output stage polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Duty equals level; zero duty is dark.
    Direct,
    /// Duty is the complement of level; maximum duty is dark.
    Inverted,
}

impl Polarity {
    pub const fn from_invert_flag(invert: bool) -> Self {
        if invert { Self::Inverted } else { Self::Direct }
    }

    /// Physical duty for an on level.
    pub const fn to_duty(self, level: u16) -> u16 {
        match self {
            Self::Direct => level,
            Self::Inverted => u16::MAX - level,
        }
    }

    /// Physical duty that turns the fixture fully dark, whatever value the
    /// configuration uses as its off sentinel.
    pub const fn off_duty(self) -> u16 {
        match self {
            Self::Direct => 0,
            Self::Inverted => u16::MAX,
        }
    }
}
