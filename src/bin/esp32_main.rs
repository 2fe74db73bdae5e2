//! ESP32 GPS time reference.
//!
//! Entry point for the device build. It wires up:
//! - the GPS receiver UART (NMEA in)
//! - the PPS GPIO edge interrupt
//! - the main loop that feeds the fix decoder and reports once a second
//!
//! The NTP responder itself plugs in on top of this: it calls `now()` /
//! `recv_time()` on the time source and routes its frame-arrival event to
//! `rs_gpstime::recv_interrupt`.
//!
//! # Wiring
//!
//! - GPS TX → GPIO20 (UART1 RX)
//! - GPS PPS → GPIO10
//!
//! # Build
//!
//! ```bash
//! cargo build --bin esp32_main --features esp32 --target riscv32imc-esp-espidf
//! ```

use std::thread;
use std::time::Duration;

use esp_idf_hal::peripherals::Peripherals;
use rs_gpstime::hal::esp32::{Esp32Serial, Esp32Ticks, PpsPin};
use rs_gpstime::{enable_interrupts, Config, Discipline, GpsTimeSource, NOMINAL_US_PER_SEC};

/// Main loop interval in milliseconds (100 Hz, well above the ~1 KiB/s the
/// receiver produces at 9600 baud).
const LOOP_INTERVAL_MS: u64 = 10;

// Interrupt handlers reach these through the process-wide registration; the
// main loop borrows them.
static CLOCK: Discipline = Discipline::new(NOMINAL_US_PER_SEC);
static TICKS: Esp32Ticks = Esp32Ticks::new();

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();

    println!();
    println!("==============================");
    println!("  rs-gpstime reference clock");
    println!("==============================");
    println!();

    let config = Config::default();
    let peripherals = Peripherals::take()?;

    // =========================================================================
    // GPS receiver UART
    // =========================================================================
    let serial = Esp32Serial::new(
        peripherals.uart1,
        peripherals.pins.gpio21, // TX, unused by most receivers
        peripherals.pins.gpio20, // RX
        config.serial.baud_rate,
    )?;
    println!(
        "[OK] GPS UART initialized (GPIO20 RX @ {} baud)",
        config.serial.baud_rate
    );

    // =========================================================================
    // Interrupt wiring (one live instance per process)
    // =========================================================================
    enable_interrupts(&CLOCK, &TICKS)?;
    let _pps = if config.gps.pps_enabled {
        let mut pin = PpsPin::new(peripherals.pins.gpio10)?;
        pin.arm()?;
        println!("[OK] PPS edge armed (GPIO10)");
        Some(pin)
    } else {
        println!("[--] PPS disabled, extrapolating from fixes");
        None
    };

    // =========================================================================
    // Main loop
    // =========================================================================
    let mut gps = GpsTimeSource::with_config(&CLOCK, serial, &TICKS, config.gps.clone());
    let mut reported_secs = 0u32;

    loop {
        gps.poll();

        let now = gps.now();
        if gps.time_valid() && now.secs != reported_secs {
            reported_secs = now.secs;
            let status = gps.status();
            println!(
                "time {}.{:06}  cal {} us/s  fixes {}  pos {:.4},{:.4}",
                now.secs,
                now.subsec_micros(),
                status.us_per_sec,
                status.fixes_absorbed,
                status.latitude,
                status.longitude,
            );
        }

        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}
