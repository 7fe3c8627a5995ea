//! One-shot hardware peripheral initialization.
//!
//! Configures the switch GPIOs, the light's LEDC timer/channel, and the
//! DHT22 data line using raw ESP-IDF sys calls. Called once from `main()`
//! before the event loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

use crate::light::polarity::Polarity;

/// Full-scale value of the light's LEDC channel.
pub const LEDC_MAX_DUTY: u32 = (1 << crate::pins::PWM_RESOLUTION_BITS) - 1;

/// Raw LEDC duty that keeps the fixture dark under `polarity`.
pub const fn dark_duty(polarity: Polarity) -> u32 {
    match polarity {
        Polarity::Direct => 0,
        Polarity::Inverted => LEDC_MAX_DUTY,
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals(pwm_freq_hz: u32, polarity: Polarity) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before event loop; single-threaded.
    unsafe {
        init_switch_inputs()?;
        init_dht_line()?;
        init_ledc(pwm_freq_hz, dark_duty(polarity))?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_pwm_freq_hz: u32, _polarity: Polarity) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── Switch inputs ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_switch_inputs() -> Result<(), HwInitError> {
    use crate::drivers::button::SwitchLine;

    for line in SwitchLine::ALL {
        // Active-low with internal pull-up; falling edge starts a press.
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << line.gpio(),
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: switch inputs configured (top/middle/bottom)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host stub: every line reads released (pulled high).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── DHT22 data line ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_dht_line() -> Result<(), HwInitError> {
    // Open-drain so the line can be driven low and then released to the
    // sensor without reconfiguring.
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::DHT22_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    unsafe { gpio_set_level(pins::DHT22_GPIO, 1) };

    info!("hw_init: DHT22 line configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub const LEDC_CH_LIGHT: u32 = ledc_channel_t_LEDC_CHANNEL_0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(pwm_freq_hz: u32, dark: u32) -> Result<(), HwInitError> {
    // SAFETY: Called from single main-task context via init_peripherals().
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pins::PWM_RESOLUTION_BITS,
        freq_hz: pwm_freq_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    // Start dark until the service applies the configured initial level.
    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_LIGHT,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::LIGHT_PWM_GPIO,
        duty: dark,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!("hw_init: LEDC configured (light=CH0, {} Hz, {}-bit)", pwm_freq_hz, pins::PWM_RESOLUTION_BITS);
    Ok(())
}

/// Write a raw LEDC duty (`0..=LEDC_MAX_DUTY`). Returns the ESP-IDF code
/// of the first failing call.
#[cfg(target_os = "espidf")]
pub fn ledc_set(duty: u32) -> Result<(), i32> {
    // SAFETY: the LEDC channel was configured in init_ledc(); only the
    // holder of the light's critical section calls this function.
    unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_LIGHT, duty);
        if ret != ESP_OK { return Err(ret); }
        let ret = ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_LIGHT);
        if ret != ESP_OK { return Err(ret); }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_duty: u32) -> Result<(), i32> {
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::drivers::button::SwitchLine;
#[cfg(target_os = "espidf")]
use crate::events::push_switch_edge;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn switch_gpio_isr(arg: *mut core::ffi::c_void) {
    // The handler argument carries the line index, not a pointer.
    let line = match arg as usize {
        0 => SwitchLine::Top,
        1 => SwitchLine::Middle,
        _ => SwitchLine::Bottom,
    };
    push_switch_edge(line);
}

/// Install per-pin GPIO ISR service and register the switch handlers.
/// Call after init_peripherals() and before the event loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handlers only push
    // to the non-blocking event channel.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for line in SwitchLine::ALL {
            let ret = gpio_isr_handler_add(
                line.gpio(),
                Some(switch_gpio_isr),
                line.index() as *mut core::ffi::c_void,
            );
            if ret != ESP_OK { return Err(HwInitError::IsrInstallFailed(ret)); }
            gpio_intr_enable(line.gpio());
        }

        info!("hw_init: ISR service installed (switch top/middle/bottom)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
