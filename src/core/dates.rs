//! Date-granularity classification and the event parse cascade.
//!
//! The classifier is a one-time, load-time decision that gates every
//! downstream date computation: calendar math for `days`/`years` data,
//! plain numeric subtraction for `epochs` data.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::constants::{EPOCH_YEAR_MAX, EPOCH_YEAR_MIN};
use crate::state::{DateGranularity, RawDate, RawEvent, TimeValue};

/// Inspect the raw date range and decide how dates are handled.
///
/// Numeric start dates below -9999 or numeric start/end dates above 10000
/// mean the span is outside a representable calendar range (geological or
/// cosmological time) and all dates stay raw numbers.
pub fn classify(raw: &[RawEvent]) -> DateGranularity {
    let mut earliest: Option<f64> = None;
    let mut latest: Option<f64> = None;

    for event in raw {
        if let Some(n) = event.start_date.as_ref().and_then(RawDate::as_number) {
            earliest = Some(earliest.map_or(n, |e: f64| e.min(n)));
            latest = Some(latest.map_or(n, |l: f64| l.max(n)));
        }
        if let Some(n) = event.end_date.as_ref().and_then(RawDate::as_number) {
            latest = Some(latest.map_or(n, |l: f64| l.max(n)));
        }
    }

    match (earliest, latest) {
        (Some(min), Some(max)) if min < EPOCH_YEAR_MIN || max > EPOCH_YEAR_MAX => {
            DateGranularity::Epochs
        }
        _ => DateGranularity::Years,
    }
}

/// Result of resolving one event's raw dates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedDates {
    pub start: TimeValue,
    pub end: TimeValue,
    /// True when either raw value was a full date string rather than a bare
    /// year; flips the dataset granularity to `Days`.
    pub day_based: bool,
}

/// Resolve an event's start and end dates through the fallback cascade:
/// start falls back to the end date, then to `now`; end falls back to the
/// resolved start. Bare numeric years span to the end of the end year;
/// everything else is floored/ceiled to the hour.
pub fn parse_start_and_end(raw: &RawEvent, now: NaiveDateTime) -> ParsedDates {
    let start_parsed = raw.start_date.as_ref().and_then(parse_raw_date);
    let end_parsed = raw.end_date.as_ref().and_then(parse_raw_date);

    let start = start_parsed.or(end_parsed).unwrap_or(now);
    let end = end_parsed.unwrap_or(start);

    let year_based = raw
        .start_date
        .as_ref()
        .and_then(RawDate::as_number)
        .is_some()
        || raw.end_date.as_ref().and_then(RawDate::as_number).is_some();

    if year_based {
        ParsedDates {
            start: TimeValue::Date(start),
            end: TimeValue::Date(end_of_year(end)),
            day_based: false,
        }
    } else {
        ParsedDates {
            start: TimeValue::Date(floor_hour(start)),
            end: TimeValue::Date(end_of_hour(end)),
            day_based: true,
        }
    }
}

/// Resolve an event's dates in epochs mode: raw numbers pass through, a
/// missing end defaults to the start, a missing start to zero.
pub fn parse_epoch_dates(raw: &RawEvent) -> (TimeValue, TimeValue) {
    let start = raw
        .start_date
        .as_ref()
        .and_then(RawDate::as_number)
        .unwrap_or(0.0);
    let end = raw
        .end_date
        .as_ref()
        .and_then(RawDate::as_number)
        .unwrap_or(start);
    (TimeValue::Epoch(start), TimeValue::Epoch(end))
}

/// Event duration in the units of the dataset granularity: whole days for
/// day data, calendar years for year data, raw difference for epochs.
pub fn event_duration(start: &TimeValue, end: &TimeValue, granularity: DateGranularity) -> f64 {
    match granularity {
        DateGranularity::Days => match (start.date(), end.date()) {
            (Some(s), Some(e)) => (e.date() - s.date()).num_days() as f64,
            _ => 0.0,
        },
        DateGranularity::Years => (end.year() - start.year()) as f64,
        DateGranularity::Epochs => end.numeric() - start.numeric(),
    }
}

fn parse_raw_date(raw: &RawDate) -> Option<NaiveDateTime> {
    if let Some(n) = raw.as_number() {
        // A bare number is a year.
        return NaiveDate::from_ymd_opt(n as i32, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    let text = match raw {
        RawDate::Text(s) => s.trim(),
        RawDate::Number(_) => return None,
    };
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Floor to the start of the hour.
pub fn floor_hour(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_minute(0)
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// The last second of the hour.
pub fn end_of_hour(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_minute(59)
        .and_then(|d| d.with_second(59))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// The last second of the year.
pub fn end_of_year(dt: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(dt.year(), 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap_or(dt)
}
