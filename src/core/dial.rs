//! Dial kinds and how each one reads the clock.
//!
//! For every kind this module derives two separate values from the same
//! calendar field: the zero-based index that drives rotation and the label
//! text shown on the ring. Numeric dials show `"07"` while rotating to index
//! `7`; the two are never mixed.

use chrono::{DateTime, Datelike, Locale, NaiveDate, TimeZone, Timelike};
use std::fmt;
use std::str::FromStr;

use crate::common::constants::{MAXIMUM_DIVISIONS, YEAR_DIAL_BASE};
use crate::config::{DialSpec, Marker};
use crate::core::locale;

/// Problems with a single declared dial. None of them are fatal: the dial is
/// skipped and every other dial keeps running.
#[derive(Debug, Clone, PartialEq)]
pub enum DialError {
    /// The `kind` marker names no known dial.
    UnrecognizedKind(String),
    /// A `[[dial]]` entry without a `kind` marker.
    MissingKind,
    /// The `divisions` marker is not a count that can hold the labels of its kind.
    InvalidDivisions {
        dial_id: String,
        marker: String,
        required: u32,
    },
    /// A marker of the wrong shape, such as a numeric `id` or a negative `radius`.
    InvalidMarker { field: &'static str, marker: String },
}

impl fmt::Display for DialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialError::UnrecognizedKind(kind) => write!(f, "Unknown dial type: {kind}"),
            DialError::MissingKind => write!(f, "Dial entry has no kind"),
            DialError::InvalidDivisions {
                dial_id,
                marker,
                required,
            } => write!(
                f,
                "Dial '{dial_id}' has divisions '{marker}' but needs a count between {required} and {MAXIMUM_DIVISIONS}"
            ),
            DialError::InvalidMarker { field, marker } => {
                write!(f, "Dial has an unusable {field} '{marker}'")
            }
        }
    }
}

impl std::error::Error for DialError {}

/// The calendar field a dial represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialKind {
    Seconds,
    Minutes,
    Hours,
    DayOfMonth,
    Month,
    Year,
    Weekday,
}

impl DialKind {
    pub const ALL: [DialKind; 7] = [
        DialKind::Seconds,
        DialKind::Minutes,
        DialKind::Hours,
        DialKind::DayOfMonth,
        DialKind::Month,
        DialKind::Year,
        DialKind::Weekday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DialKind::Seconds => "seconds",
            DialKind::Minutes => "minutes",
            DialKind::Hours => "hours",
            DialKind::DayOfMonth => "day-of-month",
            DialKind::Month => "month",
            DialKind::Year => "year",
            DialKind::Weekday => "weekday",
        }
    }

    /// Number of positions the kind uses when no `divisions` marker is given.
    pub fn natural_divisions(&self, fields: &ClockFields) -> u32 {
        match self {
            DialKind::Seconds | DialKind::Minutes => 60,
            DialKind::Hours => 24,
            DialKind::DayOfMonth => fields.days_in_month,
            DialKind::Month => 12,
            DialKind::Year => 101,
            DialKind::Weekday => 7,
        }
    }

    /// Fewest divisions that fit every label this kind can ever show.
    pub fn required_divisions(&self) -> u32 {
        match self {
            DialKind::DayOfMonth => 31,
            DialKind::Seconds | DialKind::Minutes => 60,
            DialKind::Hours => 24,
            DialKind::Month => 12,
            DialKind::Year => 101,
            DialKind::Weekday => 7,
        }
    }

    /// Zero-based rotation index of the current value.
    pub fn value(&self, fields: &ClockFields) -> u32 {
        match self {
            DialKind::Seconds => fields.second,
            DialKind::Minutes => fields.minute,
            DialKind::Hours => fields.hour,
            DialKind::DayOfMonth => fields.day.saturating_sub(1),
            DialKind::Month => fields.month0,
            DialKind::Year => (fields.year - YEAR_DIAL_BASE).clamp(0, 100) as u32,
            DialKind::Weekday => fields.weekday_from_sunday,
        }
    }

    /// The only field the labels depend on: the month length for the
    /// day-of-month dial, nothing for the others.
    pub fn label_key(&self, fields: &ClockFields) -> u32 {
        match self {
            DialKind::DayOfMonth => fields.days_in_month,
            _ => 0,
        }
    }

    /// Ordered label texts for the ring.
    pub fn labels(&self, fields: &ClockFields, locale: Locale) -> Vec<String> {
        match self {
            DialKind::Seconds | DialKind::Minutes => padded_range(60),
            DialKind::Hours => padded_range(24),
            DialKind::DayOfMonth => (1..=fields.days_in_month).map(|d| d.to_string()).collect(),
            DialKind::Month => locale::month_names(locale),
            DialKind::Year => (YEAR_DIAL_BASE..=YEAR_DIAL_BASE + 100)
                .map(|y| y.to_string())
                .collect(),
            DialKind::Weekday => locale::weekday_names(locale),
        }
    }
}

impl fmt::Display for DialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DialKind {
    type Err = DialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seconds" => Ok(DialKind::Seconds),
            "minutes" => Ok(DialKind::Minutes),
            "hours" => Ok(DialKind::Hours),
            "day-of-month" | "days" => Ok(DialKind::DayOfMonth),
            "month" | "months" => Ok(DialKind::Month),
            "year" | "years" => Ok(DialKind::Year),
            "weekday" | "day-names" => Ok(DialKind::Weekday),
            _ => Err(DialError::UnrecognizedKind(s.to_string())),
        }
    }
}

fn padded_range(count: u32) -> Vec<String> {
    (0..count).map(|i| format!("{i:02}")).collect()
}

/// Snapshot of the calendar fields the dials read, taken once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFields {
    pub second: u32,
    pub minute: u32,
    pub hour: u32,
    /// Day of month, 1-based.
    pub day: u32,
    /// Month, 0-based.
    pub month0: u32,
    pub year: i32,
    /// 0 = Sunday.
    pub weekday_from_sunday: u32,
    pub days_in_month: u32,
}

impl ClockFields {
    pub fn from_datetime<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self {
            // Leap seconds show up as second 59
            second: now.second().min(59),
            minute: now.minute(),
            hour: now.hour(),
            day: now.day(),
            month0: now.month0(),
            year: now.year(),
            weekday_from_sunday: now.weekday().num_days_from_sunday(),
            days_in_month: days_in_month(now.year(), now.month()),
        }
    }
}

/// Number of days in `month` (1-based) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        _ => 31,
    }
}

fn invalid_marker(field: &'static str, marker: &Marker) -> DialError {
    DialError::InvalidMarker {
        field,
        marker: marker.to_string(),
    }
}

/// One ring resolved from a `[[dial]]` marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Dial {
    pub id: String,
    pub kind: DialKind,
    /// Divisions declared by the marker, if any.
    declared_divisions: Option<u32>,
    /// Ring radius override in terminal cells.
    pub radius: Option<u16>,
}

impl Dial {
    /// Resolve a marker. Unknown kinds and mistyped or out-of-range fields are errors
    /// the caller reports and skips.
    pub fn from_spec(spec: &DialSpec) -> Result<Self, DialError> {
        let kind_marker = spec.kind.as_ref().ok_or(DialError::MissingKind)?;
        let kind_name = kind_marker
            .text()
            .ok_or_else(|| DialError::UnrecognizedKind(kind_marker.to_string()))?;
        let kind: DialKind = kind_name.parse()?;

        let id = match &spec.id {
            None => None,
            Some(Marker::Text(id)) => Some(id.trim()).filter(|id| !id.is_empty()),
            Some(other) => return Err(invalid_marker("id", other)),
        }
        .unwrap_or(kind_name.trim())
        .to_string();

        let radius = match &spec.radius {
            None => None,
            Some(marker) => match marker.count().and_then(|r| u16::try_from(r).ok()) {
                Some(radius) if radius > 0 => Some(radius),
                _ => return Err(invalid_marker("radius", marker)),
            },
        };

        let declared_divisions = match &spec.divisions {
            None => None,
            Some(marker) => {
                let required = kind.required_divisions();
                match marker.count() {
                    Some(count) if (required..=MAXIMUM_DIVISIONS).contains(&count) => Some(count),
                    _ => {
                        return Err(DialError::InvalidDivisions {
                            dial_id: id,
                            marker: marker.to_string(),
                            required,
                        });
                    }
                }
            }
        };

        Ok(Self {
            id,
            kind,
            declared_divisions,
            radius,
        })
    }

    pub fn new(id: impl Into<String>, kind: DialKind) -> Self {
        Self {
            id: id.into(),
            kind,
            declared_divisions: None,
            radius: None,
        }
    }

    /// Position count used for both layout and rotation at this moment.
    pub fn divisions(&self, fields: &ClockFields) -> u32 {
        self.declared_divisions
            .unwrap_or_else(|| self.kind.natural_divisions(fields))
    }

    pub fn value(&self, fields: &ClockFields) -> u32 {
        self.kind.value(fields)
    }

    pub fn labels(&self, fields: &ClockFields, locale: Locale) -> Vec<String> {
        self.kind.labels(fields, locale)
    }

    pub fn label_key(&self, fields: &ClockFields) -> u32 {
        self.kind.label_key(fields)
    }
}
