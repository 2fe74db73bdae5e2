//! Fixed-point absolute time representation.
//!
//! Time is carried as a pair of unsigned 32-bit words: whole seconds since
//! the Unix epoch, and a binary fraction of a second over an implicit 2^32
//! denominator (the NTP short-format convention). All arithmetic is integer
//! and allocation-free so it can run in interrupt context.
//!
//! # Example
//!
//! ```rust
//! use rs_gpstime::EpochTime;
//!
//! // 500_000 elapsed microseconds at a 1_000_000 us/s tick rate
//! // is exactly half a second past the baseline.
//! let t = EpochTime::from_baseline(1_000_000_000, 500_000, 1_000_000);
//! assert_eq!(t.secs, 1_000_000_000);
//! assert_eq!(t.frac, 1 << 31);
//! ```

/// An absolute instant as (seconds, fractional seconds).
///
/// `frac` counts in units of 2^-32 seconds. The fractional component is
/// always a valid value below one full second; operations that would push it
/// past the denominator carry exactly one into `secs` and wrap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpochTime {
    /// Whole seconds since the Unix epoch.
    pub secs: u32,
    /// Fractional seconds, numerator over 2^32.
    pub frac: u32,
}

impl EpochTime {
    /// The epoch itself; also the "not yet set" sentinel in status output.
    pub const ZERO: Self = Self { secs: 0, frac: 0 };

    /// Creates an instant from its two components.
    #[inline]
    pub const fn new(secs: u32, frac: u32) -> Self {
        Self { secs, frac }
    }

    /// Creates an instant on an exact second boundary.
    #[inline]
    pub const fn from_secs(secs: u32) -> Self {
        Self { secs, frac: 0 }
    }

    /// Extrapolates from a baseline second using elapsed counter ticks.
    ///
    /// `elapsed_us` ticks at `us_per_sec` ticks per second are folded into
    /// whole seconds plus a fractional remainder. Elapsed spans of more than
    /// one second roll the seconds component forward, which is what keeps
    /// readings correct across a missed PPS edge.
    pub fn from_baseline(secs: u32, elapsed_us: u32, us_per_sec: u32) -> Self {
        let whole = elapsed_us / us_per_sec;
        let rem = elapsed_us % us_per_sec;
        Self {
            secs: secs.wrapping_add(whole),
            frac: fraction_of_second(rem, us_per_sec),
        }
    }

    /// Adds a fractional-second amount, carrying overflow into `secs`.
    ///
    /// The carry is always exactly one second: both operands are below the
    /// 2^32 denominator, so their sum is below two full seconds.
    #[inline]
    pub fn add_fraction(self, frac: u32) -> Self {
        let (frac, carry) = self.frac.overflowing_add(frac);
        Self {
            secs: self.secs.wrapping_add(carry as u32),
            frac,
        }
    }

    /// Fractional part scaled to microseconds, for display and logging.
    #[inline]
    pub fn subsec_micros(self) -> u32 {
        ((self.frac as u64 * 1_000_000) >> 32) as u32
    }

    /// Lossy conversion to floating-point seconds.
    ///
    /// Only for status reporting; timing computations stay in fixed point.
    #[inline]
    pub fn as_f64(self) -> f64 {
        self.secs as f64 + self.frac as f64 / 4_294_967_296.0
    }
}

/// Converts a sub-second tick count into the 2^32 fixed-point fraction.
///
/// `us` must be the remainder of a division by `us_per_sec`, i.e. strictly
/// less than one second's worth of ticks.
#[inline]
pub fn fraction_of_second(us: u32, us_per_sec: u32) -> u32 {
    (((us as u64) << 32) / us_per_sec as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_default() {
        assert_eq!(EpochTime::default(), EpochTime::ZERO);
    }

    #[test]
    fn half_second_fraction() {
        assert_eq!(fraction_of_second(500_000, 1_000_000), 1 << 31);
    }

    #[test]
    fn quarter_second_fraction() {
        assert_eq!(fraction_of_second(250_000, 1_000_000), 1 << 30);
    }

    #[test]
    fn fraction_tracks_calibration_divisor() {
        // A slow counter (999_000 ticks per second) still maps its half-way
        // point to half of the fixed-point range, within rounding.
        let frac = fraction_of_second(499_500, 999_000);
        assert!((frac as i64 - (1i64 << 31)).abs() <= 1);
    }

    #[test]
    fn from_baseline_sub_second() {
        let t = EpochTime::from_baseline(100, 250_000, 1_000_000);
        assert_eq!(t.secs, 100);
        assert_eq!(t.frac, 1 << 30);
    }

    #[test]
    fn from_baseline_rolls_whole_seconds() {
        // 2.5 seconds of elapsed ticks: seconds advance by two, the
        // remainder extrapolates.
        let t = EpochTime::from_baseline(100, 2_500_000, 1_000_000);
        assert_eq!(t.secs, 102);
        assert_eq!(t.frac, 1 << 31);
    }

    #[test]
    fn from_baseline_wraps_seconds() {
        let t = EpochTime::from_baseline(u32::MAX, 1_000_000, 1_000_000);
        assert_eq!(t.secs, 0);
        assert_eq!(t.frac, 0);
    }

    #[test]
    fn add_fraction_carries_exactly_one_second() {
        let t = EpochTime::new(10, u32::MAX).add_fraction(1);
        assert_eq!(t.secs, 11);
        assert_eq!(t.frac, 0);
    }

    #[test]
    fn add_fraction_without_carry() {
        let t = EpochTime::new(10, 100).add_fraction(200);
        assert_eq!(t.secs, 10);
        assert_eq!(t.frac, 300);
    }

    #[test]
    fn ordering_is_seconds_then_fraction() {
        let a = EpochTime::new(10, u32::MAX);
        let b = EpochTime::new(11, 0);
        let c = EpochTime::new(11, 1);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn subsec_micros_round_trip() {
        let t = EpochTime::new(0, fraction_of_second(123_456, 1_000_000));
        // One unit of slack for the fixed-point floor divisions.
        assert!((t.subsec_micros() as i64 - 123_456).abs() <= 1);
    }

    #[test]
    fn as_f64_half_second() {
        let t = EpochTime::new(5, 1 << 31);
        assert!((t.as_f64() - 5.5).abs() < 1e-9);
    }
}
