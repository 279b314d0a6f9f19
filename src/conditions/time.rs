//! date-time parsing for ordering comparisons on strings
//!
//! layouts use chrono's strftime syntax, e.g. "%Y-%m-%d %H:%M:%S".
//! parsing is tolerant of layouts that only carry part of an instant;
//! missing fields take their lowest value:
//! - no time, or a partial one ("%H"): minutes and hours default to 0
//! - no day or month ("%Y-%m", "%Y"): the first of the month / year
//! - no year ("%m-%d", "%H:%M"): a fixed leap year
//! - with an offset ("%z"): normalized to UTC

use std::fmt::{Display, Write};

use chrono::format::{self, Item, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use log::debug;

/// year used for layouts without one; a leap year so "02-29" parses
const FALLBACK_YEAR: i64 = 2000;

/// a validated date-time layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    layout: String,
}

impl DateTimeFormat {
    /// validate a layout by round-tripping the current instant through it
    ///
    /// the current time is formatted, parsed back, and formatted again; the
    /// layout is rejected (None) unless both renderings agree. layouts with
    /// bad specifiers or no fields at all are rejected too.
    pub fn new(layout: &str) -> Option<Self> {
        let items: Vec<Item> = StrftimeItems::new(layout).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return None;
        }
        if !items
            .iter()
            .any(|item| matches!(item, Item::Numeric(..) | Item::Fixed(..)))
        {
            return None;
        }

        let rendered = render(&Local::now(), layout)?;
        let format = Self {
            layout: layout.to_string(),
        };
        let reparsed = render(&format.parse_with_offset(&rendered)?, layout)?;
        if reparsed != rendered {
            debug!(
                "date-time layout '{}' is lossy: '{}' came back as '{}'",
                layout,
                rendered,
                reparsed
            );
            return None;
        }
        Some(format)
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// parse a string under this layout into a comparable instant (UTC)
    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        self.parse_with_offset(s).map(|dt| dt.naive_utc())
    }

    fn parse_with_offset(&self, s: &str) -> Option<DateTime<FixedOffset>> {
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, s, StrftimeItems::new(&self.layout)).ok()?;
        instant(&parsed)
    }
}

fn render<Tz>(dt: &DateTime<Tz>, layout: &str) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    write!(out, "{}", dt.format_with_items(StrftimeItems::new(layout))).ok()?;
    Some(out)
}

/// date fields to default, fewest first
const DATE_FILLS: [(bool, bool, bool); 6] = [
    (false, false, false),
    (false, false, true),
    (false, true, true),
    (true, false, false),
    (true, false, true),
    (true, true, true),
];

/// time fields to default, fewest first
const TIME_FILLS: [(bool, bool); 3] = [(false, false), (false, true), (true, true)];

/// resolve parsed fields into an instant, defaulting the fields the layout lacks
///
/// a setter only takes effect when its field is still empty, so parsed
/// values are never overwritten.
fn instant(parsed: &Parsed) -> Option<DateTime<FixedOffset>> {
    for (year, month, day) in DATE_FILLS {
        for (hour, minute) in TIME_FILLS {
            let mut filled = parsed.clone();
            if year {
                let _ = filled.set_year(FALLBACK_YEAR);
            }
            if month {
                let _ = filled.set_month(1);
            }
            if day {
                let _ = filled.set_day(1);
            }
            if hour {
                let _ = filled.set_hour(0);
            }
            if minute {
                let _ = filled.set_minute(0);
            }

            if let Ok(dt) = filled.to_datetime() {
                return Some(dt);
            }
            if let Ok(naive) = filled.to_naive_datetime_with_offset(0) {
                return FixedOffset::east_opt(0).map(|utc| utc.from_utc_datetime(&naive));
            }
        }
    }
    None
}
