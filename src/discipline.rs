//! Shared clock state and the two interrupt-side edge latches.
//!
//! [`Discipline`] owns everything that both the main loop and the interrupt
//! handlers touch: the extrapolation baseline, the lock flag, the receive
//! timestamp slot, and the last fix location. The interior is a single `Copy`
//! snapshot behind a [`critical_section::Mutex`], so every access is one
//! scoped interrupt-masked window around a plain load or store — multi-field
//! state can never be observed half-written, and there is nothing to block
//! on. Extrapolation arithmetic runs outside the masked window wherever the
//! result does not have to be latched atomically.
//!
//! The target has no OS synchronization primitives; `critical-section`
//! provides the masking implementation on-device and a std-backed one for
//! host tests.

use core::cell::Cell;

use critical_section::Mutex;

use crate::time::EpochTime;

/// Nominal tick rate of the microsecond counter.
///
/// Used as the extrapolation divisor until (and unless) a PPS edge measures
/// the real rate.
pub const NOMINAL_US_PER_SEC: u32 = 1_000_000;

/// Everything shared between interrupt and mainline execution.
///
/// Kept `Copy` so a critical section is a single `Cell` load or store.
#[derive(Clone, Copy)]
struct Shared {
    /// Whole seconds at the extrapolation baseline.
    baseline_secs: u32,
    /// Tick counter value at the baseline (last PPS edge, or last fix when
    /// PPS is not installed).
    baseline_tick: u32,
    /// Measured ticks per second; the extrapolation divisor.
    us_per_sec: u32,
    /// Whether a PPS edge has been captured yet. The first edge has no
    /// predecessor to measure against, so it arms calibration instead of
    /// updating it.
    pps_armed: bool,
    /// Latched once the first valid fix is absorbed.
    locked: bool,
    /// Single-slot receive timestamp, last write wins.
    recv: Option<EpochTime>,
    /// Last fix latitude in degrees; zero before the first fix.
    lat: f64,
    /// Last fix longitude in degrees; zero before the first fix.
    lon: f64,
}

/// The GPS/PPS clock discipline state machine.
///
/// Constructed once, then shared by reference between the main loop (fix
/// ingestion, [`now_at`](Self::now_at)) and the interrupt entry points
/// ([`pps_edge`](Self::pps_edge), [`recv_edge`](Self::recv_edge)). All
/// methods take `&self`; `Discipline` is `Sync` and suitable for a `static`.
pub struct Discipline {
    state: Mutex<Cell<Shared>>,
}

impl Discipline {
    /// Creates an unlocked discipline with the given nominal tick rate.
    ///
    /// `us_per_sec` seeds the extrapolation divisor for operation without
    /// PPS; a measured value replaces it from the second PPS edge on.
    pub const fn new(us_per_sec: u32) -> Self {
        Self {
            state: Mutex::new(Cell::new(Shared {
                baseline_secs: 0,
                baseline_tick: 0,
                us_per_sec,
                pps_armed: false,
                locked: false,
                recv: None,
                lat: 0.0,
                lon: 0.0,
            })),
        }
    }

    /// PPS edge latch. Call from the pulse-per-second interrupt with the
    /// tick counter value read at entry.
    ///
    /// Integer arithmetic only, one bounded critical section. A missed or
    /// spurious edge is not detectable here and is absorbed as ground truth;
    /// the seconds counter advances by exactly one per call.
    pub fn pps_edge(&self, tick_now: u32) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut st = cell.get();
            if st.pps_armed {
                let elapsed = tick_now.wrapping_sub(st.baseline_tick);
                // Two edges inside the same microsecond would zero the
                // extrapolation divisor; keep the previous calibration.
                if elapsed != 0 {
                    st.us_per_sec = elapsed;
                }
            } else {
                st.pps_armed = true;
            }
            st.baseline_tick = tick_now;
            st.baseline_secs = st.baseline_secs.wrapping_add(1);
            cell.set(st);
        });
    }

    /// Receive edge latch. Call from the network-frame-arrival interrupt.
    ///
    /// Resolves the current absolute time through the same baseline as
    /// [`now_at`](Self::now_at) and stores it in the single receive slot,
    /// overwriting any unconsumed previous arrival. Resolving at latch time
    /// means the consumer never races a later baseline change.
    pub fn recv_edge(&self, tick_now: u32) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut st = cell.get();
            let elapsed = tick_now.wrapping_sub(st.baseline_tick);
            st.recv = Some(EpochTime::from_baseline(
                st.baseline_secs,
                elapsed,
                st.us_per_sec,
            ));
            cell.set(st);
        });
    }

    /// Current best-estimate absolute time at the given tick reading.
    ///
    /// The baseline tuple is snapshotted atomically; the division happens
    /// outside the masked window. Elapsed ticks beyond one second roll whole
    /// seconds forward, so a missed PPS edge degrades to extrapolation
    /// rather than a stalled clock.
    pub fn now_at(&self, tick_now: u32) -> EpochTime {
        let st = self.snapshot();
        let elapsed = tick_now.wrapping_sub(st.baseline_tick);
        EpochTime::from_baseline(st.baseline_secs, elapsed, st.us_per_sec)
    }

    /// Most recently latched receive timestamp, `None` before the first
    /// arrival. Non-consuming; a new arrival overwrites the slot.
    pub fn recv_time(&self) -> Option<EpochTime> {
        self.snapshot().recv
    }

    /// Absorbs the seconds value of a valid fix as the new baseline and
    /// latches the lock state.
    ///
    /// When PPS disciplines the sub-second (`reset_baseline_tick == false`)
    /// only the seconds field is corrected, leaving the tick baseline at the
    /// last PPS edge. Without PPS the fix also becomes the tick baseline.
    ///
    /// Returns the signed correction `predicted - absorbed` in seconds, i.e.
    /// how far the PPS-derived count had drifted from the fix. The fix is
    /// always authoritative; the return value exists for logging.
    pub fn absorb_fix(&self, secs: u32, tick_now: u32, reset_baseline_tick: bool) -> i32 {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut st = cell.get();
            let elapsed = tick_now.wrapping_sub(st.baseline_tick);
            let predicted = st.baseline_secs.wrapping_add(elapsed / st.us_per_sec);
            st.baseline_secs = secs;
            if reset_baseline_tick {
                st.baseline_tick = tick_now;
            }
            st.locked = true;
            cell.set(st);
            predicted.wrapping_sub(secs) as i32
        })
    }

    /// Refreshes the last known fix location.
    ///
    /// Location is report-only state; it is refreshed even from sentences
    /// whose time field was unusable.
    pub fn set_location(&self, lat: f64, lon: f64) {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut st = cell.get();
            st.lat = lat;
            st.lon = lon;
            cell.set(st);
        });
    }

    /// Last fix location as (latitude, longitude) degrees; zeros before the
    /// first fix carrying a position.
    pub fn location(&self) -> (f64, f64) {
        let st = self.snapshot();
        (st.lat, st.lon)
    }

    /// True once at least one valid fix has been absorbed. Never reverts.
    pub fn is_locked(&self) -> bool {
        self.snapshot().locked
    }

    /// Current extrapolation divisor (measured or nominal ticks per second).
    pub fn calibration(&self) -> u32 {
        self.snapshot().us_per_sec
    }

    /// Whole seconds at the current baseline, for staleness reporting.
    pub fn baseline_secs(&self) -> u32 {
        self.snapshot().baseline_secs
    }

    fn snapshot(&self) -> Shared {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }
}
