//! System configuration parameters
//!
//! All tunable parameters for the kayak light. Brightness values are in
//! the PWM driver's native 16-bit resolution (0 – 65535).

use serde::{Deserialize, Serialize};

/// Number of discrete brightness presets reachable from remote keys 2–8.
pub const IR_LEVEL_COUNT: usize = 7;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    // --- Switch timing ---
    /// Switch sampling period while a press is in progress (milliseconds)
    pub poll_interval_ms: u32,
    /// Settling time after a falling edge before re-sampling (milliseconds)
    pub debounce_ms: u32,
    /// Minimum sustained press classified as a hold (milliseconds)
    pub hold_threshold_ms: u32,

    // --- Brightness ---
    /// Step applied by increment / decrement
    pub increment: u16,
    /// Dimmest on level
    pub low_threshold: u16,
    /// Middle preset
    pub mid_threshold: u16,
    /// Brightest on level (65535 max)
    pub high_threshold: u16,
    /// Reserved level meaning "fixture off"; must lie outside the on range
    pub off_sentinel: u16,
    /// Drive the output through an inverting mosfet stage
    pub invert_polarity: bool,
    /// Level applied at boot
    pub initial_level: u16,
    /// Presets for remote keys 2–8, dimmest first
    pub ir_levels: [u16; IR_LEVEL_COUNT],

    // --- Display ---
    /// How long a brightness notification stays on the display (milliseconds)
    pub display_duration_ms: u32,

    // --- Timing ---
    /// Temperature / humidity read interval (milliseconds)
    pub climate_interval_ms: u32,
    /// PWM carrier frequency (Hz)
    pub pwm_freq_hz: u32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            // Switch timing
            poll_interval_ms: 10,
            debounce_ms: 50,
            hold_threshold_ms: 800,

            // Brightness
            increment: 1000,
            low_threshold: 1000, // min 1, 0 is reserved for off
            mid_threshold: 10_000,
            high_threshold: 63_000,
            off_sentinel: 0,
            invert_polarity: true,
            initial_level: 32_767,
            ir_levels: [5000, 10_000, 15_000, 25_000, 33_000, 45_000, 55_000],

            // Display
            display_duration_ms: 2000,

            // Timing
            climate_interval_ms: 2000, // DHT22 needs >= 2 s between reads
            pwm_freq_hz: 1000,
        }
    }
}

/// Reasons a configuration is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config document"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Malformed => Self::Config("malformed config document"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

impl LightConfig {
    /// Check every cross-field constraint. Invalid values are rejected,
    /// never silently clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 || self.climate_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("intervals must be non-zero"));
        }
        if self.debounce_ms >= self.hold_threshold_ms {
            return Err(ConfigError::ValidationFailed(
                "debounce_ms must be shorter than hold_threshold_ms",
            ));
        }
        if self.increment == 0 {
            return Err(ConfigError::ValidationFailed("increment must be non-zero"));
        }
        if self.low_threshold > self.mid_threshold || self.mid_threshold > self.high_threshold {
            return Err(ConfigError::ValidationFailed(
                "thresholds must satisfy low <= mid <= high",
            ));
        }
        if self.is_on_level(self.off_sentinel) {
            return Err(ConfigError::ValidationFailed(
                "off_sentinel must lie outside [low_threshold, high_threshold]",
            ));
        }
        if self.initial_level != self.off_sentinel && !self.is_on_level(self.initial_level) {
            return Err(ConfigError::ValidationFailed(
                "initial_level must be off_sentinel or inside the on range",
            ));
        }
        if !self.ir_levels.iter().all(|&level| self.is_on_level(level)) {
            return Err(ConfigError::ValidationFailed(
                "ir_levels must lie inside the on range",
            ));
        }
        Ok(())
    }

    /// Parse a JSON document (missing fields take their defaults) and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Whether `level` lies inside the on range `[low_threshold, high_threshold]`.
    pub fn is_on_level(&self, level: u16) -> bool {
        (self.low_threshold..=self.high_threshold).contains(&level)
    }
}
