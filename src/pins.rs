//! GPIO / peripheral pin assignments for the kayak light controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers. Switches are wired to ground with the internal
//! pull-ups enabled, so no external resistors are required.

// ---------------------------------------------------------------------------
// Override switches (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Top switch: brighter on press, full brightness on hold.
pub const TOP_SWITCH_GPIO: i32 = 20;
/// Middle switch: toggle off on press, middle preset on hold.
pub const MIDDLE_SWITCH_GPIO: i32 = 21;
/// Bottom switch: dimmer on press, dimmest on hold.
pub const BOTTOM_SWITCH_GPIO: i32 = 22;

// ---------------------------------------------------------------------------
// Light output
// ---------------------------------------------------------------------------

/// PWM output to the gate of the dimming mosfet.
pub const LIGHT_PWM_GPIO: i32 = 6;

/// LEDC timer resolution (bits). Duty values are scaled from 16-bit.
pub const PWM_RESOLUTION_BITS: u32 = 13;

// ---------------------------------------------------------------------------
// Inputs / peripherals
// ---------------------------------------------------------------------------

/// IR receiver data line (NEC 8-bit remote).
pub const IR_RECEIVER_GPIO: i32 = 17;

/// DHT22 temperature / humidity sensor data line.
pub const DHT22_GPIO: i32 = 16;

/// TM1637 4-digit display clock.
pub const DISPLAY_CLK_GPIO: i32 = 7;
/// TM1637 4-digit display data.
pub const DISPLAY_DIO_GPIO: i32 = 8;
