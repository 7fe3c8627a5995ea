//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the input-to-light rules: button identities, the
//! dispatch table, and the service that ties classifiers to the shared
//! brightness state. All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod dispatch;
pub mod events;
pub mod ports;
pub mod service;
