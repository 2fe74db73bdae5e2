//! The GPS time source orchestrator.
//!
//! [`GpsTimeSource`] ties the pieces together: it drains bytes from the
//! receiver's serial stream, runs them through the [`FixDecoder`], absorbs
//! decoded fixes into the shared [`Discipline`], and answers the time
//! queries the NTP layer needs (`now`, `recv_time`, `time_valid`).
//!
//! # Overview
//!
//! - The [`Discipline`] holds everything interrupts touch and is borrowed,
//!   not owned, so the application can place it in a `static` and wire the
//!   PPS/receive interrupts to it via [`crate::irq::enable_interrupts`].
//! - Everything else (decoder buffer, fix statistics) is confined to the
//!   main loop and needs no synchronization.
//!
//! # Example
//!
//! ```rust
//! use rs_gpstime::hal::{MockDataSource, MockTicks};
//! use rs_gpstime::{Discipline, GpsTimeSource, NOMINAL_US_PER_SEC};
//!
//! let clock = Discipline::new(NOMINAL_US_PER_SEC);
//! let serial = MockDataSource::new();
//! let ticks = MockTicks::new();
//!
//! serial.queue_sentence("$GPRMC,014640.00,A,4807.038,N,01131.000,E,0.0,0.0,090901,,*37");
//!
//! let mut gps = GpsTimeSource::new(&clock, &serial, &ticks);
//! assert!(!gps.time_valid());
//!
//! gps.poll();
//! assert!(gps.time_valid());
//! assert_eq!(gps.now().secs, 1_000_000_000);
//! ```

use crate::config::GpsConfig;
use crate::discipline::Discipline;
use crate::fix::{FixDecoder, GpsFix};
use crate::time::EpochTime;
use crate::traits::{DataSource, TickSource};

/// Orchestrates fix ingestion and time queries over a shared [`Discipline`].
///
/// # Type Parameters
///
/// - `D`: the receiver byte stream ([`DataSource`])
/// - `T`: the microsecond counter ([`TickSource`])
///
/// # Concurrency
///
/// The orchestrator itself belongs to the main loop (`poll` takes
/// `&mut self`). All state shared with interrupt context lives behind the
/// borrowed [`Discipline`], which is why `now()` is safe to call at any
/// time, interrupts enabled or not.
pub struct GpsTimeSource<'a, D: DataSource, T: TickSource> {
    discipline: &'a Discipline,
    data: D,
    ticks: T,
    decoder: FixDecoder,
    config: GpsConfig,
    fixes_absorbed: u32,
    invalid_fixes: u32,
    last_fix_secs: Option<u32>,
}

impl<'a, D: DataSource, T: TickSource> GpsTimeSource<'a, D, T> {
    /// Creates a time source with the default configuration.
    pub fn new(discipline: &'a Discipline, data: D, ticks: T) -> Self {
        Self::with_config(discipline, data, ticks, GpsConfig::default())
    }

    /// Creates a time source with an explicit configuration.
    pub fn with_config(discipline: &'a Discipline, data: D, ticks: T, config: GpsConfig) -> Self {
        Self {
            discipline,
            data,
            ticks,
            decoder: FixDecoder::new(),
            config,
            fixes_absorbed: 0,
            invalid_fixes: 0,
            last_fix_secs: None,
        }
    }

    /// Current best-estimate absolute time.
    ///
    /// Valid to call at any point; before lock it extrapolates from the
    /// epoch, which is why callers must gate on [`time_valid`](Self::time_valid)
    /// before serving the value as authoritative.
    pub fn now(&self) -> EpochTime {
        self.discipline.now_at(self.ticks.now_us())
    }

    /// Most recently latched network-arrival timestamp, `None` before the
    /// first arrival.
    pub fn recv_time(&self) -> Option<EpochTime> {
        self.discipline.recv_time()
    }

    /// True once at least one valid fix has been absorbed. Never reverts;
    /// staleness is reported through [`status`](Self::status) instead.
    pub fn time_valid(&self) -> bool {
        self.discipline.is_locked()
    }

    /// Latitude of the last fix in degrees; zero before the first fix.
    pub fn latitude(&self) -> f64 {
        self.discipline.location().0
    }

    /// Longitude of the last fix in degrees; zero before the first fix.
    pub fn longitude(&self) -> f64 {
        self.discipline.location().1
    }

    /// The shared discipline state, for interrupt wiring and direct latch
    /// access in tests.
    pub fn discipline(&self) -> &'a Discipline {
        self.discipline
    }

    /// Main-loop ingestion step: drain pending receiver bytes through the
    /// decoder and absorb any completed fix.
    ///
    /// At most [`GpsConfig::max_bytes_per_poll`] bytes are consumed per
    /// call, so a caller round-robining several input sources always gets
    /// control back promptly. Returns the last fix completed during this
    /// call, if any.
    pub fn poll(&mut self) -> Option<GpsFix> {
        let mut completed = None;
        for _ in 0..self.config.max_bytes_per_poll {
            let Some(byte) = self.data.read_byte() else {
                break;
            };
            if let Some(fix) = self.decoder.push_byte(byte) {
                self.ingest(fix);
                completed = Some(fix);
            }
        }
        completed
    }

    /// Snapshot of everything the status surface reports.
    pub fn status(&self) -> TimeStatus {
        let now = self.now();
        let (latitude, longitude) = self.discipline.location();
        TimeStatus {
            valid: self.discipline.is_locked(),
            time: now,
            latitude,
            longitude,
            us_per_sec: self.discipline.calibration(),
            fixes_absorbed: self.fixes_absorbed,
            invalid_fixes: self.invalid_fixes,
            last_fix_age_secs: self.last_fix_secs.map(|s| now.secs.saturating_sub(s)),
        }
    }

    fn ingest(&mut self, fix: GpsFix) {
        if let Some((lat, lon)) = fix.location {
            self.discipline.set_location(lat, lon);
        }
        match fix.seconds {
            Some(secs) => {
                let was_locked = self.discipline.is_locked();
                let correction =
                    self.discipline
                        .absorb_fix(secs, self.ticks.now_us(), !self.config.pps_enabled);
                self.fixes_absorbed += 1;
                self.last_fix_secs = Some(secs);
                if !was_locked {
                    log::info!("time lock acquired, epoch seconds {secs}");
                } else if correction.unsigned_abs() > self.config.step_tolerance_secs {
                    log::warn!(
                        "fix stepped the clock by {correction}s (tolerance {}s)",
                        self.config.step_tolerance_secs
                    );
                }
            }
            None => {
                self.invalid_fixes += 1;
            }
        }
    }
}

/// Full state snapshot for the status surface.
///
/// This is what the HTTP status endpoint serializes. `last_fix_age_secs` is
/// the observable that makes the never-unlock design workable: consumers
/// that care about holdover can alarm on it.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeStatus {
    /// Whether at least one valid fix has been absorbed.
    pub valid: bool,
    /// Current best-estimate time.
    pub time: EpochTime,
    /// Last fix latitude in degrees, zero before the first fix.
    pub latitude: f64,
    /// Last fix longitude in degrees, zero before the first fix.
    pub longitude: f64,
    /// Extrapolation divisor: measured (PPS) or nominal ticks per second.
    pub us_per_sec: u32,
    /// Count of valid fixes absorbed since start.
    pub fixes_absorbed: u32,
    /// Count of decoded sentences whose time was unusable.
    pub invalid_fixes: u32,
    /// Seconds since the last valid fix, `None` before lock.
    pub last_fix_age_secs: Option<u32>,
}

impl Default for TimeStatus {
    fn default() -> Self {
        Self {
            valid: false,
            time: EpochTime::ZERO,
            latitude: 0.0,
            longitude: 0.0,
            us_per_sec: crate::discipline::NOMINAL_US_PER_SEC,
            fixes_absorbed: 0,
            invalid_fixes: 0,
            last_fix_age_secs: None,
        }
    }
}
