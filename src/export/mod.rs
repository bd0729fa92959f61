// src/export/mod.rs

mod all;
mod formats;
mod fs_utils;
pub mod logic;
mod project;
pub mod sheet_names;

pub use all::OVERVIEW_SHEET;
pub use logic::{ExportLogic, ExportedWorkbook};
pub use project::{ANALYTICS_SHEET, ENTRIES_SHEET, SUMMARY_SHEET};

use crate::ui::messages::success;
use crate::utils::date::export_stamp;
use crate::utils::path::file_name_safe;
use chrono::NaiveDate;
use std::path::Path;

/// Common completion message for exports.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

/// What goes into a workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    Project(String),
    All,
}

/// `MM-YYYY-<project|all-projects>.xlsx`
pub fn file_name(target: &ExportTarget, date: NaiveDate) -> String {
    let suffix = match target {
        ExportTarget::Project(name) => file_name_safe(name),
        ExportTarget::All => "all-projects".to_string(),
    };
    format!("{}-{}.xlsx", export_stamp(date), suffix)
}
