//! Event types
//!
//! Raw ingestion records as they appear in imported data, and the resolved
//! timeline events the layout engines operate on.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the dataset's dates are interpreted. Decided once at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateGranularity {
    /// Initial placeholder; events carry bare year numbers.
    #[default]
    Years,
    /// At least one event carried a full calendar date string.
    Days,
    /// Numeric dates outside the representable calendar range; all date
    /// math degrades to plain numeric subtraction.
    Epochs,
}

/// A raw date value as it appears in imported data: a number (a bare year,
/// or an epoch value) or a date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Number(f64),
    Text(String),
}

impl RawDate {
    /// The numeric value, if this is a number or a numeric string.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawDate::Number(n) => Some(*n),
            RawDate::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl fmt::Display for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDate::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            RawDate::Number(n) => write!(f, "{}", n),
            RawDate::Text(s) => write!(f, "{}", s),
        }
    }
}

/// An event record as imported. All fields are optional; the load-time
/// parse cascade fills in whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub start_date: Option<RawDate>,
    #[serde(default)]
    pub end_date: Option<RawDate>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub facet: Option<String>,
    #[serde(default)]
    pub content_text: Option<String>,
}

impl RawEvent {
    /// Uniqueness key used to collapse duplicate records on load.
    pub fn dedupe_key(&self) -> String {
        fn date(d: &Option<RawDate>) -> String {
            d.as_ref().map(|d| d.to_string()).unwrap_or_default()
        }
        format!(
            "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
            self.content_text.as_deref().unwrap_or_default(),
            date(&self.start_date),
            date(&self.end_date),
            self.category.as_deref().unwrap_or_default(),
            self.facet.as_deref().unwrap_or_default(),
        )
    }
}

/// A resolved point in time: a calendar date, or a raw epoch number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeValue {
    Date(NaiveDateTime),
    Epoch(f64),
}

impl TimeValue {
    /// A totally ordered numeric view: epoch milliseconds for calendar
    /// dates, the raw value for epochs.
    pub fn numeric(&self) -> f64 {
        match self {
            TimeValue::Date(d) => d.and_utc().timestamp_millis() as f64,
            TimeValue::Epoch(n) => *n,
        }
    }

    /// The calendar date, when this is one.
    pub fn date(&self) -> Option<NaiveDateTime> {
        match self {
            TimeValue::Date(d) => Some(*d),
            TimeValue::Epoch(_) => None,
        }
    }

    /// The calendar year, or the truncated epoch value.
    pub fn year(&self) -> i32 {
        match self {
            TimeValue::Date(d) => d.year(),
            TimeValue::Epoch(n) => *n as i32,
        }
    }
}

/// A fully resolved event, carrying both its identity and the outputs of
/// the layout engines (track, rank, segment, spiral/curve coordinates).
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    /// Dense id assigned in data order on load; scenes reference events by it.
    pub event_id: usize,
    pub start: TimeValue,
    pub end: TimeValue,
    pub category: String,
    pub facet: String,
    pub content_text: String,
    /// Duration in the units of the dataset's date granularity
    /// (days, years, or raw epoch units).
    pub duration: f64,

    /// Lane index preventing temporal overlap in chronological views.
    pub track: usize,
    /// Dense rank in ordinal views.
    pub seq_index: usize,
    /// Calendar bucket label under the current segment granularity.
    pub segment: String,
    pub spiral_x: f64,
    pub spiral_y: f64,
    pub curve_x: f64,
    pub curve_y: f64,
    /// Offset from the facet baseline, for the relative scale.
    pub start_age: f64,
    pub end_age: f64,

    pub annotation_count: usize,
    pub selected: bool,
}

impl TimelineEvent {
    pub fn new(event_id: usize, start: TimeValue, end: TimeValue) -> Self {
        Self {
            event_id,
            start,
            end,
            category: String::new(),
            facet: String::new(),
            content_text: String::new(),
            duration: 0.0,
            track: 0,
            seq_index: 0,
            segment: String::new(),
            spiral_x: 0.0,
            spiral_y: 0.0,
            curve_x: 0.0,
            curve_y: 0.0,
            start_age: 0.0,
            end_age: 0.0,
            annotation_count: 0,
            selected: false,
        }
    }

    /// Check if this event overlaps a numeric time range.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.start.numeric() < end && self.end.numeric() > start
    }
}
