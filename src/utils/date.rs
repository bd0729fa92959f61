use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid ISO date regex"));
static DOTTED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("valid dotted date regex")
});
static SLASHED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid slashed date regex")
});

/// Formats tried after the three canonical shapes.
const FALLBACK_DATE_FORMATS: [&str; 5] = ["%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];
const FALLBACK_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Canonicalize a user supplied date to `YYYY-MM-DD`.
///
/// - `YYYY-MM-DD` is kept as is
/// - `D.M.YYYY` and `D/M/YYYY` are reordered and zero-padded (day first)
/// - anything else goes through a list of common date/datetime formats
/// - if nothing matches, the original string is returned verbatim
pub fn normalize_date(raw: &str) -> String {
    let s = raw.trim();

    if ISO_DATE.is_match(s) {
        return s.to_string();
    }

    for re in [&*DOTTED_DATE, &*SLASHED_DATE] {
        if let Some(caps) = re.captures(s) {
            return format!("{}-{:0>2}-{:0>2}", &caps[3], &caps[2], &caps[1]);
        }
    }

    parse_loose(s)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_loose(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in FALLBACK_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Hours between two `HH:MM` clock times; an end before the start wraps past
/// midnight.
pub fn hours_between(start: &str, end: &str) -> Option<f64> {
    let s = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
    let e = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;

    let mut minutes = (e - s).num_minutes();
    if minutes < 0 {
        minutes += 24 * 60;
    }
    Some(minutes as f64 / 60.0)
}

/// `YYYY-MM` stamp used for the monthly data file.
pub fn month_stamp(d: NaiveDate) -> String {
    format!("{:04}-{:02}", d.year(), d.month())
}

/// `MM-YYYY` stamp used for export file names.
pub fn export_stamp(d: NaiveDate) -> String {
    format!("{:02}-{:04}", d.month(), d.year())
}
