//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements         | Connects to                 |
//! |------------------|--------------------|-----------------------------|
//! | `hardware`       | SwitchPort         | ESP32 GPIO / embedded-hal   |
//! |                  | DutyPort           | ESP32 LEDC / embedded-hal   |
//! | `display`        | DisplayPort        | Display signal, serial log  |
//! | `log_sink`       | EventSink          | Serial log output           |
//!
//! The DHT22 climate adapter lives in [`crate::sensors::dht22`].

pub mod display;
pub mod hardware;
pub mod log_sink;
