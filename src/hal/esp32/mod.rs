//! ESP32 implementations (esp-idf based).
//!
//! - [`Esp32Ticks`]: wrapping microsecond counter over the ESP-IDF timer
//! - [`Esp32Serial`]: UART byte intake from the GPS receiver
//! - [`PpsPin`]: PPS GPIO edge wired to the interrupt entry point

mod pps;
mod serial;
mod ticks;

pub use pps::PpsPin;
pub use serial::Esp32Serial;
pub use ticks::Esp32Ticks;
