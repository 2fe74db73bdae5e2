//! # rs-gpstime
//!
//! A GPS/PPS-disciplined time source for small embedded devices acting as
//! network time references.
//!
//! The crate fuses three inputs of very different character:
//!
//! - **NMEA fixes** - absolute but low-rate and jittery (one sentence per
//!   second over a slow UART)
//! - **PPS edges** - no absolute value at all, but cycle-accurate second
//!   boundaries
//! - **a free-running microsecond counter** - high resolution, wraps, drifts
//!
//! and produces a continuously valid wall-clock reading plus precise arrival
//! timestamps for inbound network frames, ready for an NTP responder.
//!
//! ## Architecture
//!
//! The crate is structured so everything can run and be tested on desktop
//! without hardware:
//!
//! - `traits` - the two hardware seams: tick counter and receiver bytes
//! - `time` - fixed-point (seconds, 2^-32 fractions) time representation
//! - `discipline` - state shared with interrupt context: extrapolation
//!   baseline, lock state, receive latch; all access through scoped
//!   critical sections, no OS locks
//! - `fix` - line framing in front of the external NMEA parser
//! - `source` - the main-loop orchestrator tying it together
//! - `irq` - process-wide interrupt dispatch (single-instance, set once)
//! - `hal` - concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_gpstime::hal::{MockDataSource, MockTicks};
//! use rs_gpstime::{Discipline, GpsTimeSource, NOMINAL_US_PER_SEC, TickSource};
//!
//! // The discipline holds everything interrupts touch; on hardware it
//! // lives in a `static`.
//! let clock = Discipline::new(NOMINAL_US_PER_SEC);
//! let serial = MockDataSource::new();
//! let ticks = MockTicks::new();
//! let mut gps = GpsTimeSource::new(&clock, &serial, &ticks);
//!
//! // One valid NMEA fix locks the clock...
//! serial.queue_sentence("$GPRMC,014640.00,A,4807.038,N,01131.000,E,0.0,0.0,090901,,*37");
//! gps.poll();
//! assert!(gps.time_valid());
//! assert_eq!(gps.now().secs, 1_000_000_000);
//!
//! // ...and PPS edges discipline the sub-second extrapolation.
//! ticks.set(1_000_000);
//! clock.pps_edge(ticks.now_us());
//! ticks.advance(500_000);
//! let t = gps.now();
//! assert_eq!(t.secs, 1_000_000_001);
//! assert_eq!(t.frac, 1 << 31);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

/// Builder-style configuration for the time source and its services.
pub mod config;
/// Shared clock state and the interrupt-side edge latches.
pub mod discipline;
/// Crate error type.
pub mod error;
/// NMEA fix decoding boundary.
pub mod fix;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Process-wide interrupt dispatch for the PPS and receive edges.
pub mod irq;
/// The main-loop orchestrator and status snapshot.
pub mod source;
/// Fixed-point absolute time representation.
pub mod time;
/// Core traits for hardware abstraction.
pub mod traits;

/// Network services: HTTP status endpoint (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use config::{Config, DeviceConfig, GpsConfig, SerialConfig, WebConfig};
pub use discipline::{Discipline, NOMINAL_US_PER_SEC};
pub use error::Error;
pub use fix::{FixDecoder, GpsFix};
pub use irq::{enable_interrupts, pps_interrupt, recv_interrupt};
pub use source::{GpsTimeSource, TimeStatus};
pub use time::EpochTime;
pub use traits::{DataSource, TickSource};
