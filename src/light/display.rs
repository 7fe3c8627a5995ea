//! Display requests emitted on every brightness change.
//!
//! The core never drives the segments itself; it hands a
//! [`DisplayRequest`] to the [`DisplayPort`](crate::app::ports::DisplayPort).
//! Requests are best-effort status: a later one may replace an earlier one
//! that was never shown.

use core::fmt::Write;

use heapless::String;

/// Characters on the 4-digit display.
pub const DISPLAY_WIDTH: usize = 4;

/// Levels that are shown by name rather than as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelName {
    High,
    Low,
    Off,
}

impl LevelName {
    /// Text as laid out on the 4-digit display.
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low ",
            Self::Off => "off ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Brightness as a percentage of full scale (0 – 100).
    Percent(u8),
    /// One of the named levels.
    Named(LevelName),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRequest {
    pub mode: DisplayMode,
    /// How long the value stays up before the display blanks.
    pub duration_ms: u32,
}

impl DisplayRequest {
    /// Render for a 4-digit display. Percentages use two digits followed by
    /// `%` (drawn as the two-glyph percent sign by the driver), capped at 99.
    pub fn text(&self) -> String<DISPLAY_WIDTH> {
        let mut out = String::new();
        match self.mode {
            DisplayMode::Named(name) => {
                let _ = out.push_str(name.label());
            }
            DisplayMode::Percent(p) => {
                let _ = write!(out, "{:02}%", p.min(99));
            }
        }
        out
    }
}

/// Percentage of full scale, rounded to nearest.
pub fn percent_of_full_scale(level: u16) -> u8 {
    ((u32::from(level) * 100 + u32::from(u16::MAX) / 2) / u32::from(u16::MAX)) as u8
}
