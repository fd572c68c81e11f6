//! Segment granularity resolution, bucket labels, and bucket enumeration.
//!
//! Granularity is chosen so the segment count stays visually tractable
//! regardless of input span, from single days to cosmological epochs.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::{DateGranularity, TimeValue};

/// Calendar unit events are bucketed into for the segmented layout.
/// Declaration order is fineness order: `Days` is the finest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentGranularity {
    Days,
    Weeks,
    Months,
    #[default]
    Years,
    Decades,
    Centuries,
    Millennia,
    Epochs,
}

impl fmt::Display for SegmentGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SegmentGranularity::Days => "days",
            SegmentGranularity::Weeks => "weeks",
            SegmentGranularity::Months => "months",
            SegmentGranularity::Years => "years",
            SegmentGranularity::Decades => "decades",
            SegmentGranularity::Centuries => "centuries",
            SegmentGranularity::Millennia => "millennia",
            SegmentGranularity::Epochs => "epochs",
        };
        write!(f, "{}", name)
    }
}

/// Pick the segmentation unit for a date range, keeping the bucket count
/// bounded (~20).
pub fn resolve(
    min: &TimeValue,
    max: &TimeValue,
    date_granularity: DateGranularity,
) -> SegmentGranularity {
    if date_granularity == DateGranularity::Epochs {
        return SegmentGranularity::Epochs;
    }

    if date_granularity == DateGranularity::Days {
        if let (Some(min_date), Some(max_date)) = (min.date(), max.date()) {
            let range_days = (max_date.date() - min_date.date()).num_days();
            if range_days <= 7 {
                return SegmentGranularity::Days;
            } else if range_days <= 42 {
                return SegmentGranularity::Weeks;
            } else if range_days <= 732 {
                return SegmentGranularity::Months;
            }
        }
        // wider than two years: fall through to the year-based rules
    }

    let range_years = (max.year() - min.year()) as i64;
    if range_years <= 10 {
        SegmentGranularity::Years
    } else if range_years <= 100 {
        SegmentGranularity::Decades
    } else if range_years <= 1000 {
        SegmentGranularity::Centuries
    } else {
        SegmentGranularity::Millennia
    }
}

/// The bucket label for a point in time. Epoch values are unsegmented and
/// label as the empty string.
pub fn segment_label(value: &TimeValue, granularity: SegmentGranularity) -> String {
    match value.date() {
        Some(dt) => date_label(dt.date(), granularity),
        None => String::new(),
    }
}

/// The bucket label for a calendar date.
pub fn date_label(date: NaiveDate, granularity: SegmentGranularity) -> String {
    let year = date.year();
    match granularity {
        SegmentGranularity::Days => {
            format!("{} {}{}", month_abbr(date.month()), date.day(), ordinal_suffix(date.day()))
        }
        SegmentGranularity::Weeks => {
            let iso = date.iso_week();
            format!("{:02} / {:02}", iso.week(), iso.year().rem_euclid(100))
        }
        SegmentGranularity::Months => format!(
            "{:02}-{:02} ({})",
            date.month(),
            year.rem_euclid(100),
            month_abbr(date.month())
        ),
        SegmentGranularity::Years => year.to_string(),
        SegmentGranularity::Decades => format!("{}s", year.div_euclid(10) * 10),
        SegmentGranularity::Centuries => format!("{}s", year.div_euclid(100) * 100),
        SegmentGranularity::Millennia => {
            let floor = year.div_euclid(1000) * 1000;
            let ceil = (((year + 1) as f64) / 1000.0).ceil() as i32 * 1000;
            format!("{} - {}", floor, ceil)
        }
        SegmentGranularity::Epochs => String::new(),
    }
}

/// Every bucket label between start and end inclusive, aligned to natural
/// calendar boundaries (decade buckets start on multiples of ten, not on
/// the start date). Fully recomputed on each filter change or reload.
pub fn enumerate(
    min: &TimeValue,
    max: &TimeValue,
    granularity: SegmentGranularity,
) -> Vec<String> {
    if granularity == SegmentGranularity::Epochs {
        return vec![String::new()];
    }
    let (Some(min_dt), Some(max_dt)) = (min.date(), max.date()) else {
        return vec![String::new()];
    };
    let min_date = min_dt.date();
    let max_date = max_dt.date();

    let mut labels = Vec::new();
    match granularity {
        SegmentGranularity::Days => {
            let mut d = min_date;
            while d <= max_date {
                labels.push(date_label(d, granularity));
                d += Duration::days(1);
            }
        }
        SegmentGranularity::Weeks => {
            let mut d = floor_week(min_date);
            let last = floor_week(max_date);
            while d <= last {
                labels.push(date_label(d, granularity));
                d += Duration::weeks(1);
            }
        }
        SegmentGranularity::Months => {
            let (mut y, mut m) = (min_date.year(), min_date.month());
            let (last_y, last_m) = (max_date.year(), max_date.month());
            while (y, m) <= (last_y, last_m) {
                if let Some(d) = NaiveDate::from_ymd_opt(y, m, 1) {
                    labels.push(date_label(d, granularity));
                }
                m += 1;
                if m > 12 {
                    m = 1;
                    y += 1;
                }
            }
        }
        SegmentGranularity::Years => {
            push_year_steps(&mut labels, min_date.year(), max_date.year(), 1, granularity);
        }
        SegmentGranularity::Decades => {
            push_year_steps(&mut labels, min_date.year(), max_date.year(), 10, granularity);
        }
        SegmentGranularity::Centuries => {
            push_year_steps(&mut labels, min_date.year(), max_date.year(), 100, granularity);
        }
        SegmentGranularity::Millennia => {
            push_year_steps(&mut labels, min_date.year(), max_date.year(), 1000, granularity);
        }
        SegmentGranularity::Epochs => unreachable!(),
    }
    labels
}

fn push_year_steps(
    labels: &mut Vec<String>,
    min_year: i32,
    max_year: i32,
    step: i32,
    granularity: SegmentGranularity,
) {
    let mut y = min_year.div_euclid(step) * step;
    while y <= max_year {
        if let Some(d) = NaiveDate::from_ymd_opt(y, 1, 1) {
            labels.push(date_label(d, granularity));
        }
        y += step;
    }
}

/// Floor to the ISO week start (Monday).
fn floor_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn month_abbr(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}
