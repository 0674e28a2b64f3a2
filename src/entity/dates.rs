//! Date parsing shared by the entity serde impls and the importer.
//!
//! Calendar-day fields are written as `YYYY-MM-DD`. Older data and hand-made
//! bundles often carry full timestamps (`2024-06-01T00:00:00.000Z`) in those
//! fields, so reading accepts both. Those timestamps were local midnights, so
//! the day is taken in the local zone, not in UTC.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar day from either `YYYY-MM-DD` or a timestamp.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    parse_day_in(s, &Local)
}

/// Like [`parse_day`], reading timestamps in `tz`.
pub fn parse_day_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(day) = NaiveDate::parse_from_str(s, DAY_FORMAT) {
        return Some(day);
    }
    parse_timestamp(s).map(|ts| day_in(ts, tz))
}

/// The calendar day `ts` falls on in `tz`.
pub fn day_in<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    ts.with_timezone(tz).date_naive()
}

/// Parse a timestamp from RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS]` (taken as
/// UTC), or a bare calendar day (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, DAY_FORMAT)
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde adapter for calendar-day fields.
pub mod calendar_day {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&day.format(super::DAY_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_day(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid calendar day: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    #[test]
    fn test_parse_day_plain() {
        assert_eq!(
            parse_day("2024-06-01"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
    }

    #[test]
    fn test_parse_day_from_timestamp() {
        assert_eq!(
            parse_day_in("2024-06-01T00:00:00.000Z", &Utc),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
    }

    #[test]
    fn test_local_midnight_east_of_utc_keeps_its_day() {
        let budapest_summer = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            parse_day_in("2024-06-01T22:00:00+00:00", &budapest_summer),
            NaiveDate::from_ymd_opt(2024, 6, 2)
        );
        assert_eq!(
            parse_day_in("2024-06-01T22:00:00.000Z", &budapest_summer),
            NaiveDate::from_ymd_opt(2024, 6, 2)
        );
    }

    #[test]
    fn test_plain_day_ignores_zone() {
        let west = FixedOffset::west_opt(8 * 3600).unwrap();
        assert_eq!(
            parse_day_in("2024-06-01", &west),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        assert_eq!(parse_day("next tuesday"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let ts = parse_timestamp("2024-06-01T09:30:00+02:00").unwrap();
        assert_eq!(ts.hour(), 7);

        let naive = parse_timestamp("2024-06-01T09:30").unwrap();
        assert_eq!(naive.hour(), 9);
        assert_eq!(naive.minute(), 30);

        let midnight = parse_timestamp("2024-06-01").unwrap();
        assert_eq!(midnight.hour(), 0);
    }
}
