//! Configuration for the time source and its services.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_gpstime::config::{Config, GpsConfig, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default()
//!     .with_gps(GpsConfig::default().with_pps_enabled(false))
//!     .with_web(WebConfig::default().with_port(3000));
//! ```

use heapless::String as HString;

use crate::discipline::NOMINAL_US_PER_SEC;

/// Maximum length for identification strings (device names, IDs).
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings.
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a `&str`, truncating on a character boundary if
/// too long.
pub fn short_string(s: &str) -> ShortString {
    let mut out = ShortString::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Time-discipline configuration.
    pub gps: GpsConfig,
    /// GPS serial link configuration.
    pub serial: SerialConfig,
    /// Status server configuration.
    pub web: WebConfig,
    /// Device identification.
    pub device: DeviceConfig,
}

impl Config {
    /// Set GPS discipline configuration.
    pub fn with_gps(mut self, gps: GpsConfig) -> Self {
        self.gps = gps;
        self
    }

    /// Set serial link configuration.
    pub fn with_serial(mut self, serial: SerialConfig) -> Self {
        self.serial = serial;
        self
    }

    /// Set status server configuration.
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Set device configuration.
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// GPS Config
// ============================================================================

/// Time-discipline configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsConfig {
    /// Nominal tick rate of the microsecond counter, used as the
    /// extrapolation divisor until PPS measures the real rate.
    pub nominal_us_per_sec: u32,
    /// Whether a PPS line is wired up. Without it, every valid fix rebases
    /// the sub-second extrapolation directly.
    pub pps_enabled: bool,
    /// Fix corrections larger than this many seconds are logged at `warn`
    /// level. The fix is absorbed either way.
    pub step_tolerance_secs: u32,
    /// Upper bound on bytes drained from the serial source per `poll()`
    /// call, so the caller's round-robin over input sources keeps turning.
    pub max_bytes_per_poll: usize,
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            nominal_us_per_sec: NOMINAL_US_PER_SEC,
            pps_enabled: true,
            step_tolerance_secs: 2,
            max_bytes_per_poll: 64,
        }
    }
}

impl GpsConfig {
    /// Set the nominal tick rate.
    pub fn with_nominal_us_per_sec(mut self, us: u32) -> Self {
        self.nominal_us_per_sec = us;
        self
    }

    /// Enable or disable PPS discipline.
    pub fn with_pps_enabled(mut self, enabled: bool) -> Self {
        self.pps_enabled = enabled;
        self
    }

    /// Set the correction-logging tolerance.
    pub fn with_step_tolerance_secs(mut self, secs: u32) -> Self {
        self.step_tolerance_secs = secs;
        self
    }

    /// Set the per-poll byte budget.
    pub fn with_max_bytes_per_poll(mut self, bytes: usize) -> Self {
        self.max_bytes_per_poll = bytes;
        self
    }
}

// ============================================================================
// Serial Config
// ============================================================================

/// GPS serial link configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerialConfig {
    /// Receiver baud rate. Most GPS modules default to 9600.
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baud_rate: 9600 }
    }
}

impl SerialConfig {
    /// Set the baud rate.
    pub fn with_baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = baud;
        self
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Status server configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Port to listen on.
    pub port: u16,
    /// Whether the status server is enabled.
    pub enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            enabled: true,
        }
    }
}

impl WebConfig {
    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable the status server.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name.
    pub name: ShortString,
    /// Device ID (for sites running several references).
    pub id: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-gpstime"),
            id: short_string("ref1"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the device ID.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = short_string(id);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
