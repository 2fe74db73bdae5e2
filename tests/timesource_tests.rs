//! Integration tests for the GPS time source.

use rs_gpstime::hal::{MockDataSource, MockTicks};
use rs_gpstime::time::fraction_of_second;
use rs_gpstime::{Discipline, EpochTime, GpsConfig, GpsTimeSource, NOMINAL_US_PER_SEC};

// Epoch second 1_000_000_000 = 2001-09-09T01:46:40Z.
const FIX_1E9: &str = "$GPRMC,014640.00,A,4807.038,N,01131.000,E,0.0,0.0,090901,,*37";
// One second later.
const FIX_1E9_PLUS_1: &str = "$GPRMC,014641.00,A,4807.038,N,01131.000,E,0.0,0.0,090901,,*36";
// A fix whose receiver flagged it invalid.
const INVALID_FIX: &str = "$GPRMC,123520.00,V,4807.038,N,01131.000,E,,,230324,,*25";

fn source_with_fix<'a>(
    clock: &'a Discipline,
    serial: &'a MockDataSource,
    ticks: &'a MockTicks,
) -> GpsTimeSource<'a, &'a MockDataSource, &'a MockTicks> {
    serial.queue_sentence(FIX_1E9);
    let mut gps = GpsTimeSource::new(clock, serial, ticks);
    gps.poll();
    assert!(gps.time_valid());
    gps
}

#[test]
fn spec_scenario_pps_disciplined_half_second() {
    // Fix reports 1_000_000_000 s; PPS edges at ticks 0, 1_000_000,
    // 2_000_000. A reading at tick 1_500_000 must report one whole second
    // past the fix and half a second of fraction.
    let clock = Discipline::new(NOMINAL_US_PER_SEC);
    let serial = MockDataSource::new();
    let ticks = MockTicks::new();

    clock.pps_edge(0);
    let gps = source_with_fix(&clock, &serial, &ticks);

    clock.pps_edge(1_000_000);
    ticks.set(1_500_000);
    let t = gps.now();
    assert_eq!(t.secs, 1_000_000_001);
    assert_eq!(t.frac, 1 << 31);

    clock.pps_edge(2_000_000);
    ticks.set(2_250_000);
    let t = gps.now();
    assert_eq!(t.secs, 1_000_000_002);
    assert_eq!(t.frac, 1 << 30);
}

#[test]
fn fraction_follows_measured_calibration() {
    // PPS every exactly C ticks: sampling k ticks past an edge must return
    // k/C in fixed point, for a deliberately off-nominal C.
    const C: u32 = 999_123;
    let clock = Discipline::new(NOMINAL_US_PER_SEC);
    let serial = MockDataSource::new();
    let ticks = MockTicks::new();
    let gps = source_with_fix(&clock, &serial, &ticks);

    clock.pps_edge(0);
    clock.pps_edge(C); // measures C ticks per second
    ticks.set(C);
    let base = gps.now();

    for k in [0u32, 1, C / 4, C / 2, C - 1] {
        ticks.set(C + k);
        let t = gps.now();
        assert_eq!(t.secs, base.secs);
        assert_eq!(t.frac, fraction_of_second(k, C), "k = {k}");
    }
}

#[test]
fn lock_latches_on_first_valid_fix_and_never_reverts() {
    let clock = Discipline::new(NOMINAL_US_PER_SEC);
    let serial = MockDataSource::new();
    let ticks = MockTicks::new();
    let mut gps = GpsTimeSource::new(&clock, &serial, &ticks);

    assert!(!gps.time_valid());

    serial.queue_sentence(FIX_1E9);
    gps.poll();
    assert!(gps.time_valid());

    // A stream of invalid fixes afterwards must not unlock.
    for _ in 0..10 {
        serial.queue_sentence(INVALID_FIX);
        while gps.poll().is_none() && !serial.is_drained() {}
        assert!(gps.time_valid());
    }
}

#[test]
fn fix_seconds_win_over_pps_count() {
    // Two fixes one second apart while PPS claims five seconds elapsed: the
    // second fix is authoritative, so drift does not compound.
    let clock = Discipline::new(NOMINAL_US_PER_SEC);
    let serial = MockDataSource::new();
    let ticks = MockTicks::new();
    let config = GpsConfig::default().with_step_tolerance_secs(2);
    serial.queue_sentence(FIX_1E9);
    let mut gps = GpsTimeSource::with_config(&clock, &serial, &ticks, config);
    gps.poll();

    for edge in 1..=5u32 {
        clock.pps_edge(edge * 1_000_000);
    }
    ticks.set(5_000_000);
    assert_eq!(gps.now().secs, 1_000_000_005);

    serial.queue_sentence(FIX_1E9_PLUS_1);
    gps.poll();
    assert_eq!(gps.now().secs, 1_000_000_001);

    // And the next extrapolation continues from the corrected second.
    ticks.set(5_500_000);
    let t = gps.now();
    assert_eq!(t.secs, 1_000_000_001);
    assert_eq!(t.frac, 1 << 31);
}

#[test]
fn recv_timestamp_tracks_arrivals_not_reads() {
    let clock = Discipline::new(NOMINAL_US_PER_SEC);
    let serial = MockDataSource::new();
    let ticks = MockTicks::new();
    let gps = source_with_fix(&clock, &serial, &ticks);

    assert_eq!(gps.recv_time(), None);

    clock.recv_edge(250_000);
    let first = gps.recv_time().unwrap();
    assert_eq!(first.secs, 1_000_000_000);
    assert_eq!(first.frac, 1 << 30);

    // now() reads do not disturb the latch.
    ticks.set(900_000);
    let _ = gps.now();
    let _ = gps.now();
    assert_eq!(gps.recv_time(), Some(first));

    // A new arrival overwrites it.
    clock.recv_edge(500_000);
    let second = gps.recv_time().unwrap();
    assert_eq!(second.frac, 1 << 31);
}

#[test]
fn now_is_monotonic_as_ticks_advance() {
    let clock = Discipline::new(NOMINAL_US_PER_SEC);
    let serial = MockDataSource::new();
    let ticks = MockTicks::new();
    let gps = source_with_fix(&clock, &serial, &ticks);

    let mut prev = EpochTime::ZERO;
    for _ in 0..100 {
        ticks.advance(37_003);
        let t = gps.now();
        assert!(t >= prev);
        prev = t;
    }

    // Repeated reads with no tick movement are equal, not decreasing.
    assert_eq!(gps.now(), gps.now());
}

#[test]
fn location_reported_from_last_fix_or_zero() {
    let clock = Discipline::new(NOMINAL_US_PER_SEC);
    let serial = MockDataSource::new();
    let ticks = MockTicks::new();
    let mut gps = GpsTimeSource::new(&clock, &serial, &ticks);

    // Before any fix: zeros rather than an error.
    assert_eq!(gps.latitude(), 0.0);
    assert_eq!(gps.longitude(), 0.0);

    // An invalid fix still refreshes the position it carries.
    serial.queue_sentence(INVALID_FIX);
    gps.poll();
    assert!((gps.latitude() - 48.1173).abs() < 1e-3);
    assert!((gps.longitude() - 11.5166).abs() < 1e-3);
    assert!(!gps.time_valid());
}

#[test]
fn status_snapshot_reflects_discipline() {
    let clock = Discipline::new(NOMINAL_US_PER_SEC);
    let serial = MockDataSource::new();
    let ticks = MockTicks::new();
    let mut gps = source_with_fix(&clock, &serial, &ticks);

    clock.pps_edge(0);
    clock.pps_edge(999_900);
    serial.queue_sentence(INVALID_FIX);
    while gps.poll().is_none() && !serial.is_drained() {}

    let status = gps.status();
    assert!(status.valid);
    assert_eq!(status.us_per_sec, 999_900);
    assert_eq!(status.fixes_absorbed, 1);
    assert_eq!(status.invalid_fixes, 1);
}
