//! Hardware timer module using ESP-IDF's esp_timer API.
//!
//! Creates periodic timers that push events into the event channel.
//! On simulation targets the timers are no-ops.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR); they
//! only call push_event(), which never blocks.

#[cfg(target_os = "espidf")]
use crate::events::{Event, push_event};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut POLL_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut CLIMATE_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: POLL_TIMER is written once in `start_timers()` before any
/// timer callbacks fire.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn poll_timer() -> esp_timer_handle_t { unsafe { POLL_TIMER } }

/// SAFETY: Same invariants as `poll_timer()`.
#[cfg(target_os = "espidf")]
unsafe fn climate_timer() -> esp_timer_handle_t { unsafe { CLIMATE_TIMER } }

#[cfg(target_os = "espidf")]
unsafe extern "C" fn poll_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::PollTick);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn climate_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::ClimateTick);
}

/// Start the tick timers:
///
/// - switch poll timer (`poll_interval_ms`, 10 ms by default)
/// - climate read timer (`climate_interval_ms`, 2 s by default)
#[cfg(target_os = "espidf")]
pub fn start_timers(poll_interval_ms: u32, climate_interval_ms: u32) {
    // SAFETY: POLL_TIMER and CLIMATE_TIMER are written here once at boot
    // from the single main-task context before any timer callbacks fire.
    unsafe {
        let poll_args = esp_timer_create_args_t {
            callback: Some(poll_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"poll".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&poll_args, &raw mut POLL_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: poll timer create failed (rc={}), switches are edge-only", ret);
            return;
        }
        let ret = esp_timer_start_periodic(POLL_TIMER, u64::from(poll_interval_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: poll timer start failed (rc={})", ret);
            return;
        }

        let climate_args = esp_timer_create_args_t {
            callback: Some(climate_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"climate".as_ptr(),
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&climate_args, &raw mut CLIMATE_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: climate timer create failed (rc={}), no climate readings", ret);
            return;
        }
        let ret = esp_timer_start_periodic(CLIMATE_TIMER, u64::from(climate_interval_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: climate timer start failed (rc={})", ret);
            return;
        }

        info!(
            "hw_timer: poll@{}ms + climate@{}ms started",
            poll_interval_ms, climate_interval_ms
        );
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn start_timers(_poll_interval_ms: u32, _climate_interval_ms: u32) {
    log::info!("hw_timer(sim): timers not started (events driven by sleep loop)");
}

/// Stop all tick timers.
#[cfg(target_os = "espidf")]
pub fn stop_timers() {
    // SAFETY: handles are valid if start_timers() succeeded; the null
    // check covers a partial start.
    unsafe {
        let pt = poll_timer();
        if !pt.is_null() { esp_timer_stop(pt); }
        let ct = climate_timer();
        if !ct.is_null() { esp_timer_stop(ct); }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_timers() {}

/// Milliseconds since boot, wrapping. Classifiers compare with
/// `wrapping_sub`, so the wrap at ~49 days is harmless.
#[cfg(target_os = "espidf")]
pub fn now_ms() -> u32 {
    // SAFETY: esp_timer_get_time is a monotonic counter read.
    (unsafe { esp_timer_get_time() } / 1_000) as u32
}

#[cfg(not(target_os = "espidf"))]
pub fn now_ms() -> u32 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_millis() as u32
}
