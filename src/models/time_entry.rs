use crate::errors::AppError;
use crate::utils::date::normalize_date;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator of the composite entry key; never allowed inside a key part.
pub const KEY_SEPARATOR: char = '|';

/// A logged work interval, as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: i64,
    pub project: String,
    pub date: String,       // YYYY-MM-DD once normalized
    pub start_time: String, // free-form display string
    pub end_time: String,   // free-form display string
    pub duration: f64,      // hours
    pub hourly_rate: f64,
    pub cost: f64,
}

impl TimeEntry {
    /// Structural identity of the entry.
    pub fn key(&self) -> EntryKey {
        EntryKey {
            project: self.project.clone(),
            date: self.date.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }
}

/// Input for appending an entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeEntry {
    pub project: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: f64,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryUpdate {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration: Option<f64>,
}

impl EntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.duration.is_none()
    }
}

/// Composite key `project|date|start|end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub project: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.project,
            self.date,
            self.start_time,
            self.end_time,
            sep = KEY_SEPARATOR
        )
    }
}

impl FromStr for EntryKey {
    type Err = AppError;

    /// The date part is normalized so `20.11.2025` and `2025-11-20` address
    /// the same row.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(KEY_SEPARATOR).collect();
        let [project, date, start, end] = parts.as_slice() else {
            return Err(AppError::Validation(format!("Invalid entry ID: {s}")));
        };

        if project.is_empty() || date.is_empty() {
            return Err(AppError::Validation(format!("Invalid entry ID: {s}")));
        }

        Ok(Self {
            project: project.to_string(),
            date: normalize_date(date),
            start_time: start.to_string(),
            end_time: end.to_string(),
        })
    }
}

/// How a caller addresses an existing entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryRef {
    Id(i64),
    Key(EntryKey),
}

impl EntryRef {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::Validation("Entry ID required".into()));
        }

        if !raw.contains(KEY_SEPARATOR) {
            return raw
                .parse::<i64>()
                .map(EntryRef::Id)
                .map_err(|_| AppError::Validation(format!("Invalid entry ID: {raw}")));
        }

        raw.parse::<EntryKey>().map(EntryRef::Key)
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryRef::Id(id) => write!(f, "#{id}"),
            EntryRef::Key(key) => write!(f, "{key}"),
        }
    }
}
