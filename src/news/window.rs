use chrono::{Days, NaiveDate};

/// Days searched on either side of the requested date.
const WINDOW_RADIUS_DAYS: u64 = 1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Could not parse date '{0}': expected YYYY-MM-DD")]
pub struct InvalidDate(pub String);

/// Inclusive range of calendar days attached to a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// `None` when either edge falls outside the representable calendar.
    pub fn around(date: NaiveDate) -> Option<Self> {
        let radius = Days::new(WINDOW_RADIUS_DAYS);
        Some(Self {
            from: date.checked_sub_days(radius)?,
            to: date.checked_add_days(radius)?,
        })
    }

    pub fn parse(value: &str) -> Result<Self, InvalidDate> {
        let date = parse_date(value)?;
        Self::around(date).ok_or_else(|| InvalidDate(value.to_string()))
    }
}

/// Parse a `YYYY-MM-DD` date, discarding any time suffix such as
/// `T10:00:00Z` or ` 10:00`.
pub fn parse_date(value: &str) -> Result<NaiveDate, InvalidDate> {
    let invalid = || InvalidDate(value.to_string());
    let day = value
        .trim()
        .split(['T', ' '])
        .next()
        .filter(|day| is_iso_day(day))
        .ok_or_else(invalid)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| invalid())
}

// chrono's %Y accepts signs and extra digits, so check the shape first.
fn is_iso_day(day: &str) -> bool {
    let bytes = day.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
