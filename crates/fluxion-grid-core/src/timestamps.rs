// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Zone-aware timestamp construction
//!
//! Every record leaves the pipeline with an IANA zone attached. Naive local
//! times get the source's zone, never the machine's.

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike,
};
use chrono_tz::Tz;
use fluxion_grid_types::GridError;

const ISO_LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const LOOSE_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m.%d.%Y %H:%M",
    "%b %d, %Y %I:%M %p",
    "%a, %b %d, %Y %I:%M %p",
    "%B %d, %Y %I:%M %p",
];

/// Zone abbreviations sources append to local times
const ZONE_SUFFIXES: &[&str] = &["EPT", "EST", "EDT", "ET"];

/// Duration of one period index in period-based feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodLength {
    /// Day-ahead price feeds
    Hour,
    /// Intraday flow feeds
    FiveMinutes,
}

impl PeriodLength {
    pub fn delta(self) -> TimeDelta {
        match self {
            Self::Hour => TimeDelta::hours(1),
            Self::FiveMinutes => TimeDelta::minutes(5),
        }
    }
}

/// Attach `tz` to a naive local time
///
/// On a DST fold the earlier instant wins. A time inside a DST gap does not
/// exist and is an error.
pub fn attach_zone(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, GridError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(GridError::malformed(format!(
            "local time {naive} does not exist in {}",
            tz.name()
        ))),
    }
}

/// Parse an ISO-8601 timestamp emitted in the source's local time
///
/// Strings that carry an offset are converted into `tz`, the rest get `tz`
/// attached. A bare date means local midnight.
pub fn parse_local_iso(raw: &str, tz: Tz) -> Result<DateTime<Tz>, GridError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&tz));
    }
    if let Some(naive) = ISO_LOCAL_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
    {
        return attach_zone(naive, tz);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return attach_zone(date.and_time(NaiveTime::MIN), tz);
    }
    Err(GridError::malformed(format!("unparseable timestamp '{raw}'")))
}

/// Parse an ISO-8601 UTC timestamp; naive values are taken as UTC
pub fn parse_utc_iso(raw: &str) -> Result<DateTime<Tz>, GridError> {
    parse_local_iso(raw, Tz::UTC)
}

/// `reference + period * length`; an index outside the calendar is `Malformed`
pub fn period_start(
    reference: DateTime<Tz>,
    period: i64,
    length: PeriodLength,
) -> Result<DateTime<Tz>, GridError> {
    i32::try_from(period)
        .ok()
        .and_then(|p| length.delta().checked_mul(p))
        .and_then(|offset| reference.checked_add_signed(offset))
        .ok_or_else(|| {
            GridError::malformed(format!("period {period} out of range from {reference}"))
        })
}

/// A wall-clock label such as "1:05 PM" on `date` in `tz`
pub fn clock_time_on(date: NaiveDate, raw: &str, tz: Tz) -> Result<DateTime<Tz>, GridError> {
    let raw = raw.trim();
    let time = NaiveTime::parse_from_str(raw, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| GridError::malformed(format!("unparseable clock time '{raw}'")))?;
    attach_zone(date.and_time(time), tz)
}

/// Best-effort parse of a free-text page timestamp
///
/// Trailing zone abbreviations and leading labels ("Last updated: ...") are
/// dropped. An explicit offset is honoured, otherwise `default_tz` applies.
pub fn parse_loose_timestamp(raw: &str, default_tz: Tz) -> Result<DateTime<Tz>, GridError> {
    let mut text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    for suffix in ZONE_SUFFIXES {
        if let Some(stripped) = text.strip_suffix(suffix) {
            text = stripped.trim_end().to_owned();
            break;
        }
    }

    let mut candidates = vec![text.clone()];
    if let Some(idx) = text.find(|c: char| c.is_ascii_digit())
        && idx > 0
    {
        candidates.push(text.split_at(idx).1.to_owned());
    }
    if let Some((_, rest)) = text.split_once(": ") {
        candidates.push(rest.trim().to_owned());
    }

    for candidate in &candidates {
        if let Ok(dt) = DateTime::parse_from_rfc3339(candidate) {
            return Ok(dt.with_timezone(&default_tz));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(candidate) {
            return Ok(dt.with_timezone(&default_tz));
        }
        if let Some(naive) = LOOSE_FORMATS
            .iter()
            .chain(ISO_LOCAL_FORMATS)
            .find_map(|f| NaiveDateTime::parse_from_str(candidate, f).ok())
        {
            return attach_zone(naive, default_tz);
        }
    }

    Err(GridError::malformed(format!("unparseable timestamp '{raw}'")))
}

/// Drop sub-second precision
pub fn truncate_to_second(dt: DateTime<Tz>) -> DateTime<Tz> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Start of the hour containing `dt`
pub fn truncate_to_hour(dt: DateTime<Tz>) -> DateTime<Tz> {
    let truncated = truncate_to_second(dt);
    truncated
        .with_minute(0)
        .and_then(|d| d.with_second(0))
        .unwrap_or(truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{America, Atlantic, Europe};

    #[test]
    fn test_local_iso_gets_source_zone() {
        let dt = parse_local_iso("2024-01-15T12:34:56", Atlantic::Faroe).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T12:34:56+00:00");

        let dt = parse_local_iso("2024-07-15T12:34:56.250", Atlantic::Faroe).unwrap();
        assert_eq!(dt.format("%H:%M:%S%:z").to_string(), "12:34:56+01:00");
    }

    #[test]
    fn test_offset_is_converted_not_replaced() {
        let dt = parse_local_iso("2024-07-15T10:00:00Z", Europe::Paris).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-07-15T12:00:00+02:00");
    }

    #[test]
    fn test_bare_date_is_local_midnight() {
        let dt = parse_local_iso("2024-03-10", America::New_York).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-10T00:00:00-05:00");
    }

    #[test]
    fn test_ambiguous_time_takes_earliest() {
        let naive = NaiveDate::from_ymd_opt(2024, 11, 3)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let dt = attach_zone(naive, America::New_York).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-11-03T01:30:00-04:00");
    }

    #[test]
    fn test_gap_time_is_an_error() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert!(attach_zone(naive, America::New_York).is_err());
    }

    #[test]
    fn test_period_start() {
        let start = parse_local_iso("2024-01-15", Europe::Paris).unwrap();
        let dt = period_start(start, 13, PeriodLength::Hour).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T13:00:00+01:00");

        let dt = period_start(start, 3, PeriodLength::FiveMinutes).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T00:15:00+01:00");
    }

    #[test]
    fn test_period_start_out_of_range() {
        let start = parse_local_iso("2024-01-15", Europe::Paris).unwrap();
        assert!(matches!(
            period_start(start, -3_000_000_000, PeriodLength::Hour),
            Err(GridError::Malformed(_))
        ));
        assert!(period_start(start, i64::from(i32::MAX), PeriodLength::Hour).is_err());
    }

    #[test]
    fn test_clock_time_on() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let dt = clock_time_on(day, "1:05 PM", America::New_York).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T13:05:00-05:00");

        let dt = clock_time_on(day, "12:00 AM", America::New_York).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T00:00:00-05:00");

        assert!(clock_time_on(day, "noon", America::New_York).is_err());
    }

    #[test]
    fn test_loose_timestamp_with_label_and_zone_suffix() {
        let dt = parse_loose_timestamp(
            "  Last Updated:\n 01/15/2024 10:25 AM EPT ",
            America::New_York,
        )
        .unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T10:25:00-05:00");
    }

    #[test]
    fn test_loose_timestamp_keeps_explicit_offset() {
        let dt = parse_loose_timestamp("2024-01-15T15:25:00+00:00", America::New_York).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T10:25:00-05:00");
    }

    #[test]
    fn test_loose_timestamp_garbage() {
        assert!(parse_loose_timestamp("soon", America::New_York).is_err());
    }

    #[test]
    fn test_truncate_to_hour() {
        let dt = parse_local_iso("2024-01-15T10:25:13.5", America::New_York).unwrap();
        assert_eq!(truncate_to_hour(dt).to_rfc3339(), "2024-01-15T10:00:00-05:00");
        assert_eq!(truncate_to_second(dt).to_rfc3339(), "2024-01-15T10:25:13-05:00");
    }
}
