//! All-projects workbook: an overview plus one sheet per non-empty project.

use crate::errors::AppResult;
use crate::export::formats::Styles;
use crate::export::project::{entries_sheet, set_widths, write_header};
use crate::export::sheet_names::SheetNamer;
use crate::models::{Project, TimeEntry};
use crate::utils::round2;
use rust_xlsxwriter::{Workbook, Worksheet};

pub const OVERVIEW_SHEET: &str = "All Projects";

fn overview_sheet(
    name: &str,
    data: &[(Project, Vec<TimeEntry>)],
    currency: &str,
    styles: &Styles,
) -> AppResult<Worksheet> {
    let mut ws = Worksheet::new();
    ws.set_name(name)?;

    let rate_h = format!("Rate ({currency}/h)");
    let cost_h = format!("Cost ({currency})");
    write_header(
        &mut ws,
        0,
        &["Project", &rate_h, "Hours", &cost_h, "Entries", "% of hours", "% of cost"],
        &styles.header,
    )?;

    let last = data.len() as u32 + 1;
    let tot = last + 1;

    for (i, (project, entries)) in data.iter().enumerate() {
        let row = (i + 1) as u32;
        let n = row + 1;
        let hours: f64 = entries.iter().map(|e| e.duration).sum();
        let cost = round2(entries.iter().map(|e| e.cost).sum());

        ws.write_string_with_format(row, 0, &project.name, &styles.text)?;
        ws.write_number_with_format(row, 1, project.hourly_rate, &styles.money)?;
        ws.write_number_with_format(row, 2, hours, &styles.hours)?;
        ws.write_number_with_format(row, 3, cost, &styles.money)?;
        ws.write_number_with_format(row, 4, entries.len() as f64, &styles.integer)?;
        ws.write_formula_with_format(
            row,
            5,
            format!("=IF($C${tot}=0,0,C{n}/$C${tot})").as_str(),
            &styles.percent,
        )?;
        ws.write_formula_with_format(
            row,
            6,
            format!("=IF($D${tot}=0,0,D{n}/$D${tot})").as_str(),
            &styles.percent,
        )?;
    }

    let t = tot - 1;
    ws.write_string_with_format(t, 0, "Total", &styles.total_label)?;
    ws.write_blank(t, 1, &styles.total_label)?;
    ws.write_formula_with_format(t, 2, format!("=SUM(C2:C{last})").as_str(), &styles.total_hours)?;
    ws.write_formula_with_format(t, 3, format!("=SUM(D2:D{last})").as_str(), &styles.total_money)?;
    ws.write_formula_with_format(t, 4, format!("=SUM(E2:E{last})").as_str(), &styles.total_integer)?;
    ws.write_formula_with_format(t, 5, format!("=SUM(F2:F{last})").as_str(), &styles.total_percent)?;
    ws.write_formula_with_format(t, 6, format!("=SUM(G2:G{last})").as_str(), &styles.total_percent)?;

    ws.autofilter(0, 0, last - 1, 6)?;
    ws.set_freeze_panes(1, 0)?;
    set_widths(&mut ws, &[26.0, 14.0, 12.0, 16.0, 10.0, 14.0, 14.0])?;
    Ok(ws)
}

/// `data` holds every project with its entries; empty projects appear in
/// the overview but get no sheet of their own.
pub(crate) fn build_all_workbook(
    data: &[(Project, Vec<TimeEntry>)],
    currency: &str,
) -> AppResult<Vec<u8>> {
    let styles = Styles::new();
    let mut namer = SheetNamer::new();
    let mut workbook = Workbook::new();

    let overview_name = namer.claim(OVERVIEW_SHEET);
    workbook.push_worksheet(overview_sheet(&overview_name, data, currency, &styles)?);

    for (project, entries) in data {
        if entries.is_empty() {
            continue;
        }
        let label = namer.claim(&project.name);
        let (ws, _) = entries_sheet(&label, entries, currency, &styles)?;
        workbook.push_worksheet(ws);
    }

    Ok(workbook.save_to_buffer()?)
}
