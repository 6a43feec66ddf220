//! Conversions between wall-clock times in a site timezone and UTC instants.

use chrono::{LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use time::{OffsetDateTime, UtcOffset};

const LOCAL_INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimezoneError {
    #[error("unknown timezone `{0}`")]
    UnknownZone(String),
    #[error("`{0}` is not a local date-time (expected YYYY-MM-DDTHH:MM)")]
    Unparseable(String),
    #[error("`{input}` does not exist in {zone} (skipped by a clock change)")]
    Nonexistent { input: String, zone: Tz },
    #[error("timestamp out of range")]
    OutOfRange,
}

pub fn parse_zone(name: &str) -> Result<Tz, TimezoneError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TimezoneError::UnknownZone(name.to_string()))
}

/// Interpret `local` (as typed into an admin form) in `tz` and return the UTC instant.
///
/// Ambiguous times during a backwards clock change resolve to the earlier instant.
pub fn normalize_local(local: &str, tz: Tz) -> Result<OffsetDateTime, TimezoneError> {
    let trimmed = local.trim();
    let naive = LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| TimezoneError::Unparseable(local.to_string()))?;

    let resolved = match tz.from_local_datetime(&naive) {
        LocalResult::Single(value) => value,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            return Err(TimezoneError::Nonexistent {
                input: trimmed.to_string(),
                zone: tz,
            });
        }
    };

    OffsetDateTime::from_unix_timestamp(resolved.with_timezone(&Utc).timestamp())
        .map_err(|_| TimezoneError::OutOfRange)
}

/// Render a UTC instant as wall-clock time in `tz`, e.g. for schedule listings.
pub fn localized_display(time: OffsetDateTime, tz: Tz) -> String {
    let utc = time.to_offset(UtcOffset::UTC);
    match Utc.timestamp_opt(utc.unix_timestamp(), 0) {
        LocalResult::Single(value) => value
            .with_timezone(&tz)
            .format("%Y-%m-%d %H:%M %Z")
            .to_string(),
        _ => utc.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn normalizes_wall_clock_to_utc() {
        let tz = parse_zone("Europe/Berlin").unwrap();
        let utc = normalize_local("2025-07-01T18:30", tz).unwrap();
        assert_eq!(utc, datetime!(2025-07-01 16:30 UTC));
    }

    #[test]
    fn rejects_skipped_local_time() {
        let tz = parse_zone("Europe/Berlin").unwrap();
        let err = normalize_local("2025-03-30T02:30", tz).unwrap_err();
        assert!(matches!(err, TimezoneError::Nonexistent { .. }));
    }

    #[test]
    fn ambiguous_local_time_takes_earlier_instant() {
        let tz = parse_zone("Europe/Berlin").unwrap();
        let utc = normalize_local("2025-10-26 02:30", tz).unwrap();
        assert_eq!(utc, datetime!(2025-10-26 00:30 UTC));
    }

    #[test]
    fn unknown_zone_and_bad_input() {
        assert!(parse_zone("Mars/Olympus").is_err());
        assert!(matches!(
            normalize_local("tomorrow", Tz::UTC),
            Err(TimezoneError::Unparseable(_))
        ));
    }

    #[test]
    fn display_uses_zone_abbreviation() {
        let tz = parse_zone("Europe/Berlin").unwrap();
        let shown = localized_display(datetime!(2025-07-01 16:30 UTC), tz);
        assert_eq!(shown, "2025-07-01 18:30 CEST");
    }
}
