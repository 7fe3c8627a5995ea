//! Sensor subsystem.
//!
//! Only ambient monitoring lives here; switch and IR inputs are handled by
//! the classifiers in [`crate::drivers`].

pub mod climate;
pub mod dht22;
