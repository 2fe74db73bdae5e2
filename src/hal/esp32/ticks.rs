//! ESP32 tick source using the ESP-IDF timer.

use crate::traits::TickSource;

/// ESP32 microsecond counter.
///
/// Reads `esp_timer_get_time()`, which counts microseconds since boot. The
/// truncation to 32 bits is the counter's native wrap; elapsed-tick math on
/// the consumer side is wraparound-correct by contract.
///
/// Stateless, so one instance can live in a `static` for interrupt
/// registration while another is handed to the time source.
///
/// # Example
///
/// ```ignore
/// use rs_gpstime::hal::esp32::Esp32Ticks;
/// use rs_gpstime::traits::TickSource;
///
/// static TICKS: Esp32Ticks = Esp32Ticks::new();
/// let t0 = TICKS.now_us();
/// ```
pub struct Esp32Ticks;

impl Esp32Ticks {
    /// Creates a new tick source instance.
    #[inline]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Esp32Ticks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for Esp32Ticks {
    #[inline]
    fn now_us(&self) -> u32 {
        // Safe: a plain read of the hardware timer, no side effects.
        let micros = unsafe { esp_idf_hal::sys::esp_timer_get_time() };
        micros as u32
    }
}
