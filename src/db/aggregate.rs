//! Derived views, deleted and refilled after every mutation that touches
//! entries or rates. Both tables live in the same transaction as the
//! mutation that triggered the rebuild.

use crate::db::{entries, projects};
use crate::errors::AppResult;
use crate::models::{Analytics, AnalyticsRow, Ledger, LedgerRow};
use crate::utils::{ratio, round2};
use rusqlite::{Connection, params};
use std::collections::BTreeMap;

/// Label of the analytics totals row.
pub const TOTAL_LABEL: &str = "Total";

pub fn rebuild(conn: &Connection) -> AppResult<()> {
    rebuild_ledger(conn)?;
    rebuild_analytics(conn)?;
    Ok(())
}

fn rebuild_ledger(conn: &Connection) -> AppResult<()> {
    // Keyed on the normalized date so legacy rows with other date shapes land
    // in the same cell as new ones.
    let mut cells: BTreeMap<(String, String), f64> = BTreeMap::new();
    for e in entries::list_all(conn)? {
        *cells.entry((e.date, e.project)).or_insert(0.0) += e.duration;
    }

    conn.execute("DELETE FROM ledger", [])?;
    let mut stmt = conn.prepare_cached("INSERT INTO ledger (date, project, hours) VALUES (?1, ?2, ?3)")?;
    for ((date, project), hours) in &cells {
        stmt.execute(params![date, project, hours])?;
    }
    Ok(())
}

fn rebuild_analytics(conn: &Connection) -> AppResult<()> {
    let mut hours_by_project: BTreeMap<String, f64> = BTreeMap::new();
    for e in entries::list_all(conn)? {
        *hours_by_project.entry(e.project).or_insert(0.0) += e.duration;
    }

    // First pass: absolute figures per project.
    let mut rows: Vec<AnalyticsRow> = Vec::new();
    for p in projects::list(conn)? {
        let hours = hours_by_project.get(&p.name).copied().unwrap_or(0.0);
        rows.push(AnalyticsRow {
            cost: round2(hours * p.hourly_rate),
            project: p.name,
            hours,
            rate: p.hourly_rate,
            pct_hours: 0.0,
            pct_cost: 0.0,
        });
    }

    let total_hours: f64 = rows.iter().map(|r| r.hours).sum();
    let total_cost = round2(rows.iter().map(|r| r.cost).sum());

    // Second pass: shares, now that the totals are known.
    for r in &mut rows {
        r.pct_hours = ratio(r.hours, total_hours);
        r.pct_cost = ratio(r.cost, total_cost);
    }

    let total = AnalyticsRow {
        project: TOTAL_LABEL.to_string(),
        hours: total_hours,
        rate: 0.0,
        cost: total_cost,
        pct_hours: if total_hours == 0.0 { 0.0 } else { 1.0 },
        pct_cost: if total_cost == 0.0 { 0.0 } else { 1.0 },
    };

    conn.execute("DELETE FROM analytics", [])?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO analytics (position, project, hours, rate, cost, pct_hours, pct_cost, is_total)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    let n = rows.len();
    for (i, r) in rows.iter().chain(std::iter::once(&total)).enumerate() {
        stmt.execute(params![
            i as i64,
            r.project,
            r.hours,
            r.rate,
            r.cost,
            r.pct_hours,
            r.pct_cost,
            i == n
        ])?;
    }
    Ok(())
}

/// Date x project matrix. Every project is a column, even without hours.
pub fn load_ledger(conn: &Connection) -> AppResult<Ledger> {
    let names: Vec<String> = projects::list(conn)?.into_iter().map(|p| p.name).collect();

    let mut by_date: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    {
        let mut stmt = conn.prepare("SELECT date, project, hours FROM ledger ORDER BY date ASC")?;
        let cells = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;

        for c in cells {
            let (date, project, hours) = c?;
            let Some(col) = names.iter().position(|n| *n == project) else {
                continue;
            };
            by_date.entry(date).or_insert_with(|| vec![0.0; names.len()])[col] += hours;
        }
    }

    let rows = by_date
        .into_iter()
        .map(|(date, hours)| LedgerRow {
            total: hours.iter().sum(),
            date,
            hours,
        })
        .collect();

    Ok(Ledger {
        projects: names,
        rows,
    })
}

pub fn load_analytics(conn: &Connection) -> AppResult<Analytics> {
    let mut stmt = conn.prepare(
        "SELECT project, hours, rate, cost, pct_hours, pct_cost, is_total
         FROM analytics ORDER BY position ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            AnalyticsRow {
                project: row.get(0)?,
                hours: row.get(1)?,
                rate: row.get(2)?,
                cost: row.get(3)?,
                pct_hours: row.get(4)?,
                pct_cost: row.get(5)?,
            },
            row.get::<_, bool>(6)?,
        ))
    })?;

    let mut out = Vec::new();
    let mut total = None;
    for r in rows {
        let (row, is_total) = r?;
        if is_total {
            total = Some(row);
        } else {
            out.push(row);
        }
    }

    Ok(Analytics {
        rows: out,
        total: total.unwrap_or_else(|| AnalyticsRow {
            project: TOTAL_LABEL.to_string(),
            hours: 0.0,
            rate: 0.0,
            cost: 0.0,
            pct_hours: 0.0,
            pct_cost: 0.0,
        }),
    })
}
