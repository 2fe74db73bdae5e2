//! Mock implementations for testing without hardware.
//!
//! Test doubles for the two hardware traits, enabling development and
//! testing on desktop without a GPS receiver attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockTicks`] | [`TickSource`] | Controllable microsecond counter |
//! | [`MockDataSource`] | [`DataSource`] | Queued receiver bytes |
//!
//! Both mocks use interior mutability and are driven through `&self`, so a
//! test can keep its own handle while the time source holds a borrow:
//!
//! ```rust
//! use rs_gpstime::hal::{MockDataSource, MockTicks};
//! use rs_gpstime::{Discipline, GpsTimeSource, NOMINAL_US_PER_SEC};
//!
//! let clock = Discipline::new(NOMINAL_US_PER_SEC);
//! let serial = MockDataSource::new();
//! let ticks = MockTicks::new();
//! let mut gps = GpsTimeSource::new(&clock, &serial, &ticks);
//!
//! serial.queue_bytes(b"$GP");
//! ticks.advance(1_000);
//! gps.poll();
//! ```
//!
//! [`TickSource`]: crate::traits::TickSource
//! [`DataSource`]: crate::traits::DataSource

use core::cell::{Cell, RefCell};

use heapless::Deque;

use crate::traits::{DataSource, TickSource};

/// Byte capacity of the mock receive queue; enough for a burst of NMEA
/// sentences between polls.
const MOCK_QUEUE_LEN: usize = 1024;

/// Mock microsecond counter for testing.
///
/// # Example
///
/// ```rust
/// use rs_gpstime::hal::MockTicks;
/// use rs_gpstime::traits::TickSource;
///
/// let ticks = MockTicks::new();
/// assert_eq!(ticks.now_us(), 0);
///
/// ticks.set(1_000);
/// ticks.advance(500);
/// assert_eq!(ticks.now_us(), 1_500);
/// ```
#[derive(Debug, Default)]
pub struct MockTicks {
    now: Cell<u32>,
}

impl MockTicks {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the counter to an absolute value.
    pub fn set(&self, us: u32) {
        self.now.set(us);
    }

    /// Advances the counter, wrapping at the native width like the real
    /// hardware counter does.
    pub fn advance(&self, us: u32) {
        self.now.set(self.now.get().wrapping_add(us));
    }
}

impl TickSource for MockTicks {
    fn now_us(&self) -> u32 {
        self.now.get()
    }
}

/// Mock receiver byte stream for testing.
///
/// Queue raw bytes or whole sentences; the source hands them out one at a
/// time and reports absent when drained, matching the
/// non-blocking-read-or-absent contract.
///
/// # Example
///
/// ```rust
/// use rs_gpstime::hal::MockDataSource;
/// use rs_gpstime::traits::DataSource;
///
/// let src = MockDataSource::new();
/// src.queue_bytes(b"$G");
///
/// let mut reader = &src;
/// assert_eq!(reader.read_byte(), Some(b'$'));
/// assert_eq!(reader.read_byte(), Some(b'G'));
/// assert_eq!(reader.read_byte(), None);
/// ```
#[derive(Debug, Default)]
pub struct MockDataSource {
    queue: RefCell<Deque<u8, MOCK_QUEUE_LEN>>,
}

impl MockDataSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues raw bytes. Bytes beyond the queue capacity are dropped, the
    /// same way a full hardware FIFO overruns.
    pub fn queue_bytes(&self, bytes: &[u8]) {
        let mut queue = self.queue.borrow_mut();
        for &b in bytes {
            if queue.push_back(b).is_err() {
                break;
            }
        }
    }

    /// Queues a sentence followed by the `\r\n` terminator.
    pub fn queue_sentence(&self, sentence: &str) {
        self.queue_bytes(sentence.as_bytes());
        self.queue_bytes(b"\r\n");
    }

    /// True when every queued byte has been read.
    pub fn is_drained(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Number of bytes still queued.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl DataSource for MockDataSource {
    fn read_byte(&mut self) -> Option<u8> {
        self.queue.borrow_mut().pop_front()
    }
}

// Shared-reference form, so tests can queue more bytes while the time
// source owns the reading end.
impl DataSource for &MockDataSource {
    fn read_byte(&mut self) -> Option<u8> {
        self.queue.borrow_mut().pop_front()
    }
}
