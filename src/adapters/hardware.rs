//! Hardware adapters: bridge real peripherals to the domain port traits.
//!
//! - [`HardwareAdapter`] drives the board through the raw ESP-IDF calls in
//!   [`hw_init`]. On non-espidf targets those calls are simulation stubs.
//! - [`HalLight`] is the same bridge over any `embedded-hal` 1.0 pins and
//!   PWM channel, for boards brought up through a HAL crate.
//!
//! Both accept 16-bit duty values from the domain and rescale them to the
//! PWM's native resolution.

use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{DutyPort, SwitchPort};
use crate::drivers::button::SwitchLine;
use crate::drivers::hw_init;
use crate::error::{ActuatorError, SensorError};

/// Rescale a 16-bit duty to `0..=max`, rounding to nearest.
pub fn scale_duty(duty: u16, max: u32) -> u32 {
    let full = u64::from(u16::MAX);
    ((u64::from(duty) * u64::from(max) + full / 2) / full) as u32
}

// ───────────────────────────────────────────────────────────────
// HardwareAdapter (ESP-IDF sys calls)
// ───────────────────────────────────────────────────────────────

/// Concrete adapter over the pins configured by [`hw_init`].
pub struct HardwareAdapter {
    last_duty: Option<u32>,
}

impl Default for HardwareAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareAdapter {
    pub fn new() -> Self {
        Self { last_duty: None }
    }

    /// Last raw LEDC duty written, if any.
    pub fn last_duty(&self) -> Option<u32> {
        self.last_duty
    }
}

// ── SwitchPort implementation ─────────────────────────────────

impl SwitchPort for HardwareAdapter {
    fn read_level(&mut self, line: SwitchLine) -> Result<bool, SensorError> {
        Ok(hw_init::gpio_read(line.gpio()))
    }
}

// ── DutyPort implementation ───────────────────────────────────

impl DutyPort for HardwareAdapter {
    fn set_duty(&mut self, duty: u16) -> Result<(), ActuatorError> {
        let raw = scale_duty(duty, hw_init::LEDC_MAX_DUTY);
        hw_init::ledc_set(raw).map_err(|rc| {
            warn!("LEDC duty write failed (rc={})", rc);
            ActuatorError::PwmWriteFailed
        })?;
        self.last_duty = Some(raw);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// HalLight (embedded-hal 1.0)
// ───────────────────────────────────────────────────────────────

/// Three switch inputs plus the light's PWM channel.
pub struct HalLight<T, M, B, P> {
    top: T,
    middle: M,
    bottom: B,
    pwm: P,
}

impl<T, M, B, P> HalLight<T, M, B, P>
where
    T: InputPin,
    M: InputPin,
    B: InputPin,
    P: SetDutyCycle,
{
    pub fn new(top: T, middle: M, bottom: B, pwm: P) -> Self {
        Self {
            top,
            middle,
            bottom,
            pwm,
        }
    }

    pub fn release(self) -> (T, M, B, P) {
        (self.top, self.middle, self.bottom, self.pwm)
    }
}

impl<T, M, B, P> SwitchPort for HalLight<T, M, B, P>
where
    T: InputPin,
    M: InputPin,
    B: InputPin,
    P: SetDutyCycle,
{
    fn read_level(&mut self, line: SwitchLine) -> Result<bool, SensorError> {
        let level = match line {
            SwitchLine::Top => self.top.is_high().map_err(|_| ()),
            SwitchLine::Middle => self.middle.is_high().map_err(|_| ()),
            SwitchLine::Bottom => self.bottom.is_high().map_err(|_| ()),
        };
        level.map_err(|()| SensorError::GpioReadFailed)
    }
}

impl<T, M, B, P> DutyPort for HalLight<T, M, B, P>
where
    T: InputPin,
    M: InputPin,
    B: InputPin,
    P: SetDutyCycle,
{
    fn set_duty(&mut self, duty: u16) -> Result<(), ActuatorError> {
        let max = self.pwm.max_duty_cycle();
        let scaled = scale_duty(duty, u32::from(max)) as u16;
        self.pwm
            .set_duty_cycle(scaled)
            .map_err(|_| ActuatorError::PwmWriteFailed)
    }
}
