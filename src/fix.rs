//! NMEA fix decoding boundary.
//!
//! The time source does not parse NMEA syntax itself; the external [`nmea`]
//! crate does. This module owns the byte-at-a-time line framing in front of
//! that parser and the conversion from the receiver's UTC date/time to whole
//! seconds since the Unix epoch.
//!
//! Only RMC sentences are consumed: they carry everything the discipline
//! needs (receiver validity flag, UTC time and date, position). Every other
//! sentence type parses cleanly and is discarded.

use chrono::{NaiveDate, NaiveTime};
use heapless::Vec;

use nmea::sentences::rmc::RmcStatusOfFix;
use nmea::ParseResult;

/// NMEA 0183 caps sentences at 82 characters; a little slack covers
/// receivers that pad proprietary fields.
const MAX_SENTENCE_LEN: usize = 96;

/// What one decoded sentence contributed.
///
/// `seconds` is present only when the receiver flagged the fix valid *and*
/// the sentence carried both a date and a time. `location` is present
/// whenever the sentence carried one — including on invalid fixes, whose
/// position is still worth reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GpsFix {
    /// Whole seconds since the Unix epoch, from a valid fix.
    pub seconds: Option<u32>,
    /// (latitude, longitude) in decimal degrees.
    pub location: Option<(f64, f64)>,
}

/// Byte-stream front end for the NMEA parser.
///
/// Feed it one byte at a time from the [`DataSource`](crate::traits::DataSource);
/// it buffers until a complete line, hands the line to the parser, and
/// reports decoded RMC sentences.
///
/// # Example
///
/// ```rust
/// use rs_gpstime::fix::FixDecoder;
///
/// let mut decoder = FixDecoder::new();
/// let sentence = b"$GPRMC,014640.00,A,4807.038,N,01131.000,E,0.0,0.0,090901,,*37\r\n";
///
/// let mut fix = None;
/// for &b in sentence.iter() {
///     if let Some(f) = decoder.push_byte(b) {
///         fix = Some(f);
///     }
/// }
/// assert_eq!(fix.unwrap().seconds, Some(1_000_000_000));
/// ```
#[derive(Debug, Default)]
pub struct FixDecoder {
    line: Vec<u8, MAX_SENTENCE_LEN>,
}

impl FixDecoder {
    /// Creates a decoder with an empty line buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one byte; returns a fix when it completes a decodable RMC
    /// sentence.
    ///
    /// Framing is tolerant of line noise: a `$` always starts a fresh
    /// sentence, carriage returns are dropped, and an overlong line is
    /// discarded wholesale so the decoder resynchronizes on the next `$`.
    /// Undecodable sentences are skipped silently; per spec there is no
    /// error to surface, only a fix that does not happen.
    pub fn push_byte(&mut self, byte: u8) -> Option<GpsFix> {
        match byte {
            b'$' => {
                self.line.clear();
                let _ = self.line.push(b'$');
                None
            }
            b'\r' => None,
            b'\n' => {
                let fix = decode_line(&self.line);
                self.line.clear();
                fix
            }
            _ => {
                if self.line.push(byte).is_err() {
                    self.line.clear();
                }
                None
            }
        }
    }
}

fn decode_line(line: &[u8]) -> Option<GpsFix> {
    let sentence = core::str::from_utf8(line).ok()?;
    match nmea::parse_str(sentence) {
        Ok(ParseResult::RMC(rmc)) => {
            let location = match (rmc.lat, rmc.lon) {
                (Some(lat), Some(lon)) => Some((lat, lon)),
                _ => None,
            };
            let seconds = if matches!(rmc.status_of_fix, RmcStatusOfFix::Invalid) {
                None
            } else {
                match (rmc.fix_date, rmc.fix_time) {
                    (Some(date), Some(time)) => unix_seconds(date, time),
                    _ => None,
                }
            };
            Some(GpsFix { seconds, location })
        }
        Ok(_) => None,
        Err(e) => {
            log::debug!("discarding undecodable sentence: {e:?}");
            None
        }
    }
}

/// UTC calendar time to whole seconds since the Unix epoch.
///
/// `None` for instants outside the unsigned 32-bit range (the receiver
/// reporting a date before 1970 means it has no almanac yet).
fn unix_seconds(date: NaiveDate, time: NaiveTime) -> Option<u32> {
    u32::try_from(date.and_time(time).and_utc().timestamp()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(decoder: &mut FixDecoder, bytes: &[u8]) -> Option<GpsFix> {
        let mut out = None;
        for &b in bytes {
            if let Some(fix) = decoder.push_byte(b) {
                out = Some(fix);
            }
        }
        out
    }

    #[test]
    fn valid_rmc_yields_seconds_and_location() {
        let mut decoder = FixDecoder::new();
        let fix = feed(
            &mut decoder,
            b"$GPRMC,123519.00,A,4807.038,N,01131.000,E,022.4,084.4,230324,003.1,W*4F\r\n",
        )
        .unwrap();
        // 2024-03-23T12:35:19Z
        assert_eq!(fix.seconds, Some(1_711_197_319));
        let (lat, lon) = fix.location.unwrap();
        assert!((lat - 48.1173).abs() < 1e-3);
        assert!((lon - 11.5166).abs() < 1e-3);
    }

    #[test]
    fn invalid_fix_keeps_location_but_no_time() {
        let mut decoder = FixDecoder::new();
        let fix = feed(
            &mut decoder,
            b"$GPRMC,123520.00,V,4807.038,N,01131.000,E,,,230324,,*25\r\n",
        )
        .unwrap();
        assert_eq!(fix.seconds, None);
        assert!(fix.location.is_some());
    }

    #[test]
    fn invalid_fix_without_position_is_empty() {
        let mut decoder = FixDecoder::new();
        let fix = feed(&mut decoder, b"$GPRMC,123519.00,V,,,,,,,230324,,*16\r\n").unwrap();
        assert_eq!(fix, GpsFix::default());
    }

    #[test]
    fn corrupted_checksum_is_discarded() {
        let mut decoder = FixDecoder::new();
        let fix = feed(
            &mut decoder,
            b"$GPRMC,123519.00,A,4807.038,N,01131.000,E,022.4,084.4,230324,003.1,W*00\r\n",
        );
        assert_eq!(fix, None);
    }

    #[test]
    fn non_rmc_sentences_are_ignored() {
        let mut decoder = FixDecoder::new();
        let fix = feed(
            &mut decoder,
            b"$GPTXT,01,01,02,u-blox ag - www.u-blox.com*50\r\n",
        );
        assert_eq!(fix, None);
    }

    #[test]
    fn dollar_resynchronizes_mid_sentence() {
        let mut decoder = FixDecoder::new();
        // A truncated sentence interrupted by the start of a fresh one.
        let fix = feed(
            &mut decoder,
            b"$GPRMC,0146$GPRMC,014640.00,A,4807.038,N,01131.000,E,0.0,0.0,090901,,*37\r\n",
        )
        .unwrap();
        assert_eq!(fix.seconds, Some(1_000_000_000));
    }

    #[test]
    fn overlong_line_is_dropped_and_decoder_recovers() {
        let mut decoder = FixDecoder::new();
        for _ in 0..300 {
            assert_eq!(decoder.push_byte(b'x'), None);
        }
        assert_eq!(decoder.push_byte(b'\n'), None);
        let fix = feed(
            &mut decoder,
            b"$GPRMC,014640.00,A,4807.038,N,01131.000,E,0.0,0.0,090901,,*37\r\n",
        )
        .unwrap();
        assert_eq!(fix.seconds, Some(1_000_000_000));
    }

    #[test]
    fn epoch_conversion_matches_known_instant() {
        let date = NaiveDate::from_ymd_opt(2001, 9, 9).unwrap();
        let time = NaiveTime::from_hms_opt(1, 46, 40).unwrap();
        assert_eq!(unix_seconds(date, time), Some(1_000_000_000));
    }

    #[test]
    fn pre_epoch_dates_are_rejected() {
        let date = NaiveDate::from_ymd_opt(1969, 12, 31).unwrap();
        let time = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        assert_eq!(unix_seconds(date, time), None);
    }
}
