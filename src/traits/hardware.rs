//! Hardware abstraction traits for the tick counter and the GPS byte stream.
//!
//! These are the two seams that let the time source run on different
//! platforms (ESP32 hardware, desktop mocks).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`TickSource`] | Free-running wrapping microsecond counter |
//! | [`DataSource`] | Non-blocking byte intake from the GPS receiver |
//!
//! For testing and desktop development, use the mock implementations from
//! [`crate::hal::mock`]. For ESP32 hardware, use the implementations from
//! `hal::esp32` (requires the `esp32` feature).

/// Free-running microsecond counter.
///
/// The counter wraps at its native 32-bit width (about every 71.6 minutes);
/// consumers must compute elapsed ticks with `u32::wrapping_sub`. The read
/// must be safe from interrupt context: a plain hardware register read with
/// no side effects.
///
/// # Example
///
/// ```rust
/// use rs_gpstime::traits::TickSource;
/// use rs_gpstime::hal::MockTicks;
///
/// let ticks = MockTicks::new();
/// ticks.advance(1_500);
/// assert_eq!(ticks.now_us(), 1_500);
/// ```
pub trait TickSource {
    /// Returns the current counter value in microseconds.
    fn now_us(&self) -> u32;
}

// Shared references read the same counter; this lets a test keep a handle to
// a mock while the time source owns the borrow it was built with.
impl<T: TickSource + ?Sized> TickSource for &T {
    #[inline]
    fn now_us(&self) -> u32 {
        (**self).now_us()
    }
}

/// Byte-oriented input from the GPS receiver.
///
/// The contract is non-blocking-read-or-absent: `read_byte` returns whatever
/// is immediately available and never waits, so a main loop polling several
/// input sources can round-robin without starving any of them.
pub trait DataSource {
    /// Returns the next available byte, or `None` if nothing is pending.
    fn read_byte(&mut self) -> Option<u8>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTicks(u32);

    impl TickSource for FixedTicks {
        fn now_us(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn tick_source_through_reference() {
        let ticks = FixedTicks(42);
        let by_ref: &FixedTicks = &ticks;
        assert_eq!(by_ref.now_us(), 42);
        assert_eq!((&by_ref).now_us(), 42);
    }

    struct Drained;

    impl DataSource for Drained {
        fn read_byte(&mut self) -> Option<u8> {
            None
        }
    }

    #[test]
    fn empty_source_reports_absent() {
        let mut src = Drained;
        assert_eq!(src.read_byte(), None);
    }
}
