//! Desktop demonstration of the time source and status endpoint.
//!
//! Replays a short canned NMEA stream against the mock HAL, simulating one
//! PPS edge per second, then goes into holdover so the status endpoint
//! shows the fix age climbing.
//!
//! ```bash
//! cargo run --example desktop_status --features web
//! curl localhost:8080/api/status
//! ```

use std::sync::Arc;
use std::time::Duration;

use rs_gpstime::hal::{MockDataSource, MockTicks};
use rs_gpstime::services::{serve_status, StatusCell};
use rs_gpstime::{Config, Discipline, GpsTimeSource, NOMINAL_US_PER_SEC};

static CLOCK: Discipline = Discipline::new(NOMINAL_US_PER_SEC);

// A short fix stream starting at epoch second 1_000_000_000 (the last
// sentence steps the clock), then silence.
const CANNED_SENTENCES: &[&str] = &[
    "$GPRMC,014640.00,A,4807.038,N,01131.000,E,0.0,0.0,090901,,*37",
    "$GPRMC,014641.00,A,4807.038,N,01131.000,E,0.0,0.0,090901,,*36",
    "$GPRMC,014645.00,A,4807.038,N,01131.000,E,0.0,0.0,090901,,*32",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::default();
    let cell = Arc::new(StatusCell::new());

    let server_cell = cell.clone();
    let web = config.web.clone();
    tokio::spawn(async move {
        if let Err(e) = serve_status(server_cell, &web).await {
            eprintln!("status server error: {e}");
        }
    });
    println!("serving http://localhost:{}/api/status", config.web.port);

    let serial = MockDataSource::new();
    let ticks = MockTicks::new();
    let mut gps = GpsTimeSource::new(&CLOCK, &serial, &ticks);

    let mut second = 0usize;
    loop {
        // One simulated second: the counter advances, the PPS edge fires,
        // and (while the canned stream lasts) a sentence arrives.
        ticks.advance(1_000_000);
        CLOCK.pps_edge(ticks.now_us());
        if let Some(sentence) = CANNED_SENTENCES.get(second) {
            serial.queue_sentence(sentence);
        }
        second += 1;

        while !serial.is_drained() {
            gps.poll();
        }

        let status = gps.status();
        cell.publish(status);
        println!(
            "t={}.{:03} valid={} fix_age={:?}",
            status.time.secs,
            status.time.subsec_micros() / 1_000,
            status.valid,
            status.last_fix_age_secs,
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
