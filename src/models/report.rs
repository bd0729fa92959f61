//! Read models of the derived aggregation tables.

use serde::Serialize;

/// Date x project hour matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    /// Column order of `LedgerRow::hours`.
    pub projects: Vec<String>,
    pub rows: Vec<LedgerRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRow {
    pub date: String,
    pub hours: Vec<f64>,
    /// Sum across the row's project cells.
    pub total: f64,
}

impl Ledger {
    pub fn hours_for(&self, date: &str, project: &str) -> Option<f64> {
        let col = self.projects.iter().position(|p| p == project)?;
        self.rows
            .iter()
            .find(|r| r.date == date)
            .map(|r| r.hours[col])
    }
}

/// Per-project rollup plus totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub rows: Vec<AnalyticsRow>,
    pub total: AnalyticsRow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRow {
    pub project: String,
    pub hours: f64,
    pub rate: f64,
    pub cost: f64,
    /// Fractions in `0.0..=1.0`.
    pub pct_hours: f64,
    pub pct_cost: f64,
}

impl Analytics {
    pub fn row(&self, project: &str) -> Option<&AnalyticsRow> {
        self.rows.iter().find(|r| r.project == project)
    }
}
