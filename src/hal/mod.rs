//! Hardware Abstraction Layer implementations.
//!
//! Concrete implementations of the traits defined in [`crate::traits`]:
//!
//! - `mock`: test implementations for desktop development
//! - `esp32`: ESP32 with a UART-attached GPS receiver and a PPS GPIO
//!   (requires the `esp32` feature)

pub mod mock;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "esp32")]
pub use esp32::*;
