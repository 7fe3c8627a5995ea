//! DHT22 (AM2302) temperature / humidity sensor.
//!
//! Single-wire protocol: the host holds the line low for ≥1 ms, releases
//! it, and the sensor answers with an 80 µs low / 80 µs high preamble
//! followed by 40 data bits. Each bit is a ~50 µs low followed by a high
//! pulse whose width encodes the value (~27 µs = 0, ~70 µs = 1).
//!
//! Frame layout: `[RH hi, RH lo, T hi, T lo, checksum]`, both values in
//! tenths, temperature sign in bit 15.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the open-drain line configured by hw_init.
//! On host/test: returns a frame injected with [`sim_set_frame`].

use crate::app::ports::ClimatePort;
use crate::error::SensorError;
use crate::sensors::climate::ClimateReading;

/// Raw 40-bit frame.
pub type Frame = [u8; 5];

/// Decode a frame, verifying its checksum.
pub fn decode_frame(frame: Frame) -> Result<ClimateReading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }
    let rh = u16::from_be_bytes([frame[0], frame[1]]);
    let t = u16::from_be_bytes([frame[2], frame[3]]);
    let magnitude = f32::from(t & 0x7FFF) / 10.0;
    Ok(ClimateReading {
        celsius: if t & 0x8000 != 0 { -magnitude } else { magnitude },
        humidity_percent: f32::from(rh) / 10.0,
    })
}

pub struct Dht22 {
    gpio: i32,
}

impl Dht22 {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    #[cfg(target_os = "espidf")]
    fn read_frame(&mut self) -> Result<Frame, SensorError> {
        use crate::drivers::hw_init;
        use esp_idf_svc::sys::{esp_rom_delay_us, esp_timer_get_time};

        fn now_us() -> i64 {
            // SAFETY: monotonic counter read.
            unsafe { esp_timer_get_time() }
        }

        // Wait while the line sits at `level`; returns the time spent.
        let wait_while = |level: bool, timeout_us: i64| -> Result<i64, SensorError> {
            let start = now_us();
            while hw_init::gpio_read(self.gpio) == level {
                if now_us() - start > timeout_us {
                    return Err(SensorError::Timeout);
                }
            }
            Ok(now_us() - start)
        };

        hw_init::gpio_write(self.gpio, false);
        // SAFETY: busy-wait ROM helper.
        unsafe { esp_rom_delay_us(1_100) };
        hw_init::gpio_write(self.gpio, true);

        // Release → sensor pulls low → preamble.
        wait_while(true, 100)?;
        wait_while(false, 100)?;
        wait_while(true, 100)?;

        let mut frame: Frame = [0; 5];
        for bit in 0..40 {
            wait_while(false, 80)?;
            let high_us = wait_while(true, 100)?;
            if high_us > 48 {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_frame(&mut self) -> Result<Frame, SensorError> {
        sim::frame()
    }
}

impl ClimatePort for Dht22 {
    fn read(&mut self) -> Result<ClimateReading, SensorError> {
        decode_frame(self.read_frame()?)
    }
}

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicU64, Ordering};

    use super::Frame;
    use crate::error::SensorError;

    const PRESENT: u64 = 1 << 40;

    /// Bits 0..40 frame, bit 40 set when a frame is present.
    static SIM_FRAME: AtomicU64 = AtomicU64::new(0);

    pub fn set(frame: Option<Frame>) {
        let packed = frame.map_or(0, |f| {
            let mut bytes = [0u8; 8];
            bytes[3..].copy_from_slice(&f);
            u64::from_be_bytes(bytes) | PRESENT
        });
        SIM_FRAME.store(packed, Ordering::Relaxed);
    }

    pub fn frame() -> Result<Frame, SensorError> {
        let packed = SIM_FRAME.load(Ordering::Relaxed);
        if packed & PRESENT == 0 {
            return Err(SensorError::Timeout);
        }
        let bytes = (packed & (PRESENT - 1)).to_be_bytes();
        let mut f: Frame = [0; 5];
        f.copy_from_slice(&bytes[3..]);
        Ok(f)
    }
}

/// Inject the frame the simulated sensor answers with (`None` = no answer).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_frame(frame: Option<Frame>) {
    sim::set(frame);
}
