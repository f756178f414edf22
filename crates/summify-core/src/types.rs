use serde::{Serialize, Serializer};
use time::{Date, Month};

/// Number of days covered by the activity window, anchor included.
pub const WINDOW_DAYS: usize = 365;

/// Cells per calendar column. Columns start on Sunday.
pub const DAYS_PER_WEEK: usize = 7;

/// Smallest count rendered in the low tier.
pub const LOW_THRESHOLD: usize = 1;

/// Smallest count rendered in the high tier.
pub const HIGH_THRESHOLD: usize = 5;

/// Serialize a date in its `yyyy-MM-dd` key form.
pub(crate) fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(date)
}

/// Errors raised by the calendar model.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("invalid date `{input}` (expected YYYY-MM-DD)")]
    InvalidDate { input: String },
    #[error("anchor date {anchor} leaves no room for a 365-day window")]
    AnchorOutOfRange { anchor: Date },
    #[error("no Sunday on or before {date} to start its week")]
    WeekStartOutOfRange { date: Date },
}

/// Parse a `yyyy-MM-dd` date string, the form the backend keys records by.
/// The match is exact: surrounding whitespace is rejected.
pub fn parse_date(input: &str) -> Result<Date, CalendarError> {
    Date::parse(
        input,
        time::macros::format_description!("[year]-[month]-[day]"),
    )
    .map_err(|_| CalendarError::InvalidDate {
        input: input.to_string(),
    })
}

/// Three-letter month name used for axis labels.
pub fn short_month_name(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// One day of the activity window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyActivity {
    #[serde(serialize_with = "serialize_date")]
    pub date: Date,
    pub contributions: usize,
    pub highlight: bool,
}

impl DailyActivity {
    pub fn empty(date: Date) -> Self {
        Self {
            date,
            contributions: 0,
            highlight: false,
        }
    }
}

/// A slot in the week grid: either a real day or a leading placeholder that
/// aligns the first column to Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    Padding {
        #[serde(serialize_with = "serialize_date")]
        date: Date,
    },
    Day(DailyActivity),
}

impl CalendarCell {
    pub fn date(&self) -> Date {
        match self {
            CalendarCell::Padding { date } => *date,
            CalendarCell::Day(day) => day.date,
        }
    }

    pub fn contributions(&self) -> usize {
        match self {
            CalendarCell::Padding { .. } => 0,
            CalendarCell::Day(day) => day.contributions,
        }
    }

    pub fn highlight(&self) -> bool {
        matches!(self, CalendarCell::Day(day) if day.highlight)
    }

    pub fn is_padding(&self) -> bool {
        matches!(self, CalendarCell::Padding { .. })
    }

    pub fn as_day(&self) -> Option<&DailyActivity> {
        match self {
            CalendarCell::Padding { .. } => None,
            CalendarCell::Day(day) => Some(day),
        }
    }
}

/// One column of the grid, Sunday first. Only the last week may hold fewer
/// than seven cells.
pub type Week = Vec<CalendarCell>;

/// Axis label placed above the column where a month starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub label: &'static str,
    pub week_index: usize,
}

impl MonthLabel {
    /// Horizontal position as a fraction of the grid width.
    pub fn offset(&self, total_weeks: usize) -> f64 {
        if total_weeks == 0 {
            return 0.0;
        }
        self.week_index as f64 / total_weeks as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parse_date_accepts_iso_form() {
        assert_eq!(parse_date("2024-01-10").unwrap(), date!(2024 - 01 - 10));
        assert_eq!(parse_date("2023-12-31").unwrap(), date!(2023 - 12 - 31));
    }

    #[test]
    fn parse_date_is_exact() {
        for input in [" 2024-01-10", "2024-01-10 ", "\t2024-01-10\n"] {
            assert!(parse_date(input).is_err(), "{input:?} accepted");
        }
    }

    #[test]
    fn parse_date_rejects_garbage() {
        for input in ["", "2024-13-01", "2024/01/10", "10-01-2024", "yesterday"] {
            let err = parse_date(input).unwrap_err();
            assert_eq!(
                err,
                CalendarError::InvalidDate {
                    input: input.to_string()
                }
            );
        }
    }

    #[test]
    fn date_display_is_canonical_key() {
        assert_eq!(date!(2024 - 01 - 05).to_string(), "2024-01-05");
    }

    #[test]
    fn short_month_names() {
        assert_eq!(short_month_name(Month::January), "Jan");
        assert_eq!(short_month_name(Month::September), "Sep");
        assert_eq!(short_month_name(Month::December), "Dec");
    }

    #[test]
    fn padding_cell_has_no_activity() {
        let cell = CalendarCell::Padding {
            date: date!(2024 - 01 - 07),
        };
        assert!(cell.is_padding());
        assert_eq!(cell.contributions(), 0);
        assert!(!cell.highlight());
        assert!(cell.as_day().is_none());
    }

    #[test]
    fn label_offset_is_fraction_of_weeks() {
        let label = MonthLabel {
            label: "Mar",
            week_index: 13,
        };
        assert!((label.offset(52) - 0.25).abs() < f64::EPSILON);
        assert_eq!(label.offset(0), 0.0);
    }

    #[test]
    fn cell_serializes_with_kind_tag() {
        let cell = CalendarCell::Day(DailyActivity {
            date: date!(2024 - 01 - 10),
            contributions: 2,
            highlight: true,
        });
        let json = serde_json::to_value(cell).unwrap();
        assert_eq!(json["kind"], "day");
        assert_eq!(json["date"], "2024-01-10");
        assert_eq!(json["contributions"], 2);
        assert_eq!(json["highlight"], true);
    }
}
