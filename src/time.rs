//! Civil time to Julian Day conversion.
//!
//! A wall-clock reading in an IANA zone resolves to an absolute instant,
//! which maps linearly onto the Julian Day count. All ephemeris queries in
//! this crate are keyed by the resulting [`JulianDay`].

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::CalculationError;
use crate::JulianDay;

/// Julian Day at the Unix epoch (1970-01-01T00:00:00Z).
pub const JD_AT_UNIX_EPOCH: f64 = 2_440_587.5;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Resolve a local civil date/time in an IANA zone to a Julian Day.
///
/// `date` is `YYYY-MM-DD`, `time` is `HH:MM` or `HH:MM:SS`. An ambiguous
/// local time (DST fold) resolves to the earlier instant; a nonexistent
/// local time (DST gap) is an error.
pub fn to_julian_day(date: &str, time: &str, zone: &str) -> Result<JulianDay, CalculationError> {
    let tz: Tz = zone
        .parse()
        .map_err(|_| CalculationError::InvalidCivilTime(format!("unknown time zone: {zone}")))?;

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        CalculationError::InvalidCivilTime(format!("unparseable date: {date}"))
    })?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| CalculationError::InvalidCivilTime(format!("unparseable time: {time}")))?;

    let local = match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _later) => earlier,
        LocalResult::None => {
            return Err(CalculationError::InvalidCivilTime(format!(
                "{date} {time} does not exist in {zone}"
            )))
        }
    };

    Ok(utc_to_julian_day(&local.with_timezone(&Utc)))
}

/// Convert an absolute UTC instant to a Julian Day.
pub fn utc_to_julian_day(utc: &DateTime<Utc>) -> JulianDay {
    utc.timestamp_millis() as f64 / MS_PER_DAY + JD_AT_UNIX_EPOCH
}

/// Convert a Julian Day back to a UTC instant.
pub fn julian_day_to_utc(jd: JulianDay) -> Option<DateTime<Utc>> {
    let millis = (jd - JD_AT_UNIX_EPOCH) * MS_PER_DAY;
    Utc.timestamp_millis_opt(millis.round() as i64).single()
}
