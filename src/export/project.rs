//! Per-project workbook: entries, summary and per-date analytics.

use crate::errors::AppResult;
use crate::export::formats::Styles;
use crate::export::sheet_names::sheet_ref;
use crate::models::{Project, TimeEntry};
use crate::utils::round2;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::{BTreeMap, BTreeSet};

pub const ENTRIES_SHEET: &str = "Time Entries";
pub const SUMMARY_SHEET: &str = "Summary";
pub const ANALYTICS_SHEET: &str = "Analytics by Date";

pub(crate) fn write_header(
    ws: &mut Worksheet,
    row: u32,
    headers: &[&str],
    fmt: &Format,
) -> AppResult<()> {
    for (col, h) in headers.iter().enumerate() {
        ws.write_string_with_format(row, col as u16, *h, fmt)?;
    }
    Ok(())
}

pub(crate) fn set_widths(ws: &mut Worksheet, widths: &[f64]) -> AppResult<()> {
    for (col, w) in widths.iter().enumerate() {
        ws.set_column_width(col as u16, *w)?;
    }
    Ok(())
}

/// Entry table of one project with a per-row cost formula and a totals row.
///
/// Layout: header on row 1, entries on rows `2..=n+1`, totals on `n+2`
/// (spreadsheet numbering). Returns the sheet and the totals row number.
pub(crate) fn entries_sheet(
    name: &str,
    entries: &[TimeEntry],
    currency: &str,
    styles: &Styles,
) -> AppResult<(Worksheet, u32)> {
    let mut ws = Worksheet::new();
    ws.set_name(name)?;

    let rate_h = format!("Rate ({currency}/h)");
    let cost_h = format!("Cost ({currency})");
    write_header(
        &mut ws,
        0,
        &["Date", "Start", "End", "Duration (h)", &rate_h, &cost_h],
        &styles.header,
    )?;

    for (i, e) in entries.iter().enumerate() {
        let row = (i + 1) as u32;
        let n = row + 1;
        ws.write_string_with_format(row, 0, &e.date, &styles.text)?;
        ws.write_string_with_format(row, 1, &e.start_time, &styles.text)?;
        ws.write_string_with_format(row, 2, &e.end_time, &styles.text)?;
        ws.write_number_with_format(row, 3, e.duration, &styles.hours)?;
        ws.write_number_with_format(row, 4, e.hourly_rate, &styles.money)?;
        ws.write_formula_with_format(row, 5, format!("=ROUND(D{n}*E{n},2)").as_str(), &styles.money)?;
    }

    let last = entries.len() as u32 + 1;
    let total_idx = entries.len() as u32 + 1;
    ws.write_string_with_format(total_idx, 0, "Total", &styles.total_label)?;
    for col in 1..=2u16 {
        ws.write_blank(total_idx, col, &styles.total_label)?;
    }
    ws.write_formula_with_format(total_idx, 3, format!("=SUM(D2:D{last})").as_str(), &styles.total_hours)?;
    ws.write_blank(total_idx, 4, &styles.total_label)?;
    ws.write_formula_with_format(total_idx, 5, format!("=SUM(F2:F{last})").as_str(), &styles.total_money)?;

    ws.autofilter(0, 0, last - 1, 5)?;
    ws.set_freeze_panes(1, 0)?;
    set_widths(&mut ws, &[12.0, 10.0, 10.0, 14.0, 14.0, 14.0])?;

    Ok((ws, total_idx + 1))
}

/// Descriptive statistics; totals reference the entries sheet.
fn summary_sheet(
    project: &Project,
    entries: &[TimeEntry],
    totals_row: u32,
    currency: &str,
    styles: &Styles,
) -> AppResult<Worksheet> {
    let mut ws = Worksheet::new();
    ws.set_name(SUMMARY_SHEET)?;

    let src = sheet_ref(ENTRIES_SHEET);
    let last = entries.len() as u32 + 1;

    let dates: BTreeSet<&str> = entries.iter().map(|e| e.date.as_str()).collect();
    let first_day = dates.first().copied().unwrap_or("-");
    let last_day = dates.last().copied().unwrap_or("-");

    ws.write_string_with_format(0, 0, "Project summary", &styles.title)?;
    write_header(&mut ws, 2, &["Metric", "Value"], &styles.header)?;

    ws.write_string_with_format(3, 0, "Project", &styles.text)?;
    ws.write_string_with_format(3, 1, &project.name, &styles.text)?;
    ws.write_string_with_format(4, 0, &format!("Hourly rate ({currency}/h)"), &styles.text)?;
    ws.write_number_with_format(4, 1, project.hourly_rate, &styles.money)?;

    ws.write_string_with_format(6, 0, "Entries", &styles.text)?;
    ws.write_formula_with_format(6, 1, format!("=COUNT({src}!D2:D{last})").as_str(), &styles.integer)?;
    ws.write_string_with_format(7, 0, "Total hours", &styles.text)?;
    ws.write_formula_with_format(7, 1, format!("={src}!D{totals_row}").as_str(), &styles.hours)?;
    ws.write_string_with_format(8, 0, &format!("Total cost ({currency})"), &styles.text)?;
    ws.write_formula_with_format(8, 1, format!("={src}!F{totals_row}").as_str(), &styles.money)?;

    ws.write_string_with_format(10, 0, "Period", &styles.title)?;
    ws.write_string_with_format(11, 0, "First day", &styles.text)?;
    ws.write_string_with_format(11, 1, first_day, &styles.text)?;
    ws.write_string_with_format(12, 0, "Last day", &styles.text)?;
    ws.write_string_with_format(12, 1, last_day, &styles.text)?;
    ws.write_string_with_format(13, 0, "Days worked", &styles.text)?;
    ws.write_number_with_format(13, 1, dates.len() as f64, &styles.integer)?;

    ws.write_string_with_format(15, 0, "Statistics", &styles.title)?;
    ws.write_string_with_format(16, 0, "Average hours/day", &styles.text)?;
    ws.write_formula_with_format(16, 1, "=IF(B14=0,0,B8/B14)", &styles.hours)?;
    ws.write_string_with_format(17, 0, "Shortest entry (h)", &styles.text)?;
    ws.write_formula_with_format(17, 1, format!("=MIN({src}!D2:D{last})").as_str(), &styles.hours)?;
    ws.write_string_with_format(18, 0, "Longest entry (h)", &styles.text)?;
    ws.write_formula_with_format(18, 1, format!("=MAX({src}!D2:D{last})").as_str(), &styles.hours)?;

    set_widths(&mut ws, &[26.0, 22.0])?;
    Ok(ws)
}

#[derive(Default)]
struct DayTotals {
    entries: u32,
    hours: f64,
    cost: f64,
}

/// One row per date, newest first, with zero-guarded shares of the total.
fn analytics_sheet(entries: &[TimeEntry], currency: &str, styles: &Styles) -> AppResult<Worksheet> {
    let mut ws = Worksheet::new();
    ws.set_name(ANALYTICS_SHEET)?;

    let mut by_date: BTreeMap<&str, DayTotals> = BTreeMap::new();
    for e in entries {
        let d = by_date.entry(e.date.as_str()).or_default();
        d.entries += 1;
        d.hours += e.duration;
        d.cost += e.cost;
    }

    let cost_h = format!("Cost ({currency})");
    write_header(
        &mut ws,
        0,
        &["Date", "Entries", "Hours", &cost_h, "% of hours", "% of cost"],
        &styles.header,
    )?;

    let last = by_date.len() as u32 + 1;
    let tot = last + 1;

    for (i, (date, d)) in by_date.iter().rev().enumerate() {
        let row = (i + 1) as u32;
        let n = row + 1;
        ws.write_string_with_format(row, 0, *date, &styles.text)?;
        ws.write_number_with_format(row, 1, d.entries as f64, &styles.integer)?;
        ws.write_number_with_format(row, 2, d.hours, &styles.hours)?;
        ws.write_number_with_format(row, 3, round2(d.cost), &styles.money)?;
        ws.write_formula_with_format(
            row,
            4,
            format!("=IF($C${tot}=0,0,C{n}/$C${tot})").as_str(),
            &styles.percent,
        )?;
        ws.write_formula_with_format(
            row,
            5,
            format!("=IF($D${tot}=0,0,D{n}/$D${tot})").as_str(),
            &styles.percent,
        )?;
    }

    let t = tot - 1;
    ws.write_string_with_format(t, 0, "Total", &styles.total_label)?;
    ws.write_formula_with_format(t, 1, format!("=SUM(B2:B{last})").as_str(), &styles.total_integer)?;
    ws.write_formula_with_format(t, 2, format!("=SUM(C2:C{last})").as_str(), &styles.total_hours)?;
    ws.write_formula_with_format(t, 3, format!("=SUM(D2:D{last})").as_str(), &styles.total_money)?;
    ws.write_formula_with_format(t, 4, format!("=SUM(E2:E{last})").as_str(), &styles.total_percent)?;
    ws.write_formula_with_format(t, 5, format!("=SUM(F2:F{last})").as_str(), &styles.total_percent)?;

    ws.autofilter(0, 0, last - 1, 5)?;
    ws.set_freeze_panes(1, 0)?;
    set_widths(&mut ws, &[12.0, 10.0, 10.0, 14.0, 14.0, 14.0])?;
    Ok(ws)
}

/// Build the three-sheet workbook of one project. Callers guarantee
/// `entries` is not empty.
pub(crate) fn build_project_workbook(
    project: &Project,
    entries: &[TimeEntry],
    currency: &str,
) -> AppResult<Vec<u8>> {
    let styles = Styles::new();
    let mut workbook = Workbook::new();

    let (entries_ws, totals_row) = entries_sheet(ENTRIES_SHEET, entries, currency, &styles)?;
    let summary_ws = summary_sheet(project, entries, totals_row, currency, &styles)?;
    let analytics_ws = analytics_sheet(entries, currency, &styles)?;

    workbook.push_worksheet(entries_ws);
    workbook.push_worksheet(summary_ws);
    workbook.push_worksheet(analytics_ws);

    Ok(workbook.save_to_buffer()?)
}
