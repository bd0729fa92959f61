use crate::db::settings;
use crate::errors::AppResult;
use crate::models::{EntryKey, TimeEntry};
use crate::utils::date::normalize_date;
use crate::utils::round2;
use rusqlite::{Connection, Row, params};
use std::collections::HashMap;

const SELECT_ENTRIES: &str = "
    SELECT te.id, p.name, te.date, te.start_time, te.end_time, te.duration,
           te.hourly_rate, te.cost
    FROM time_entries te
    JOIN projects p ON te.project_id = p.id";

/// Row as stored; rate and cost are NULL for entries saved before they
/// were pinned at save time.
struct StoredEntry {
    id: i64,
    project: String,
    date: String,
    start_time: String,
    end_time: String,
    duration: f64,
    hourly_rate: Option<f64>,
    cost: Option<f64>,
}

fn map_row(row: &Row) -> rusqlite::Result<StoredEntry> {
    Ok(StoredEntry {
        id: row.get(0)?,
        project: row.get(1)?,
        date: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        duration: row.get(5)?,
        hourly_rate: row.get(6)?,
        cost: row.get(7)?,
    })
}

/// Resolve pricing: the values pinned at save time win, otherwise the
/// project's current rate applies.
fn price(conn: &Connection, stored: Vec<StoredEntry>) -> AppResult<Vec<TimeEntry>> {
    let mut current_rates: HashMap<String, f64> = HashMap::new();
    let mut out = Vec::with_capacity(stored.len());

    for e in stored {
        let rate = match e.hourly_rate {
            Some(r) => r,
            None => match current_rates.get(&e.project) {
                Some(r) => *r,
                None => {
                    let r = settings::rate_of(conn, &e.project)?;
                    current_rates.insert(e.project.clone(), r);
                    r
                }
            },
        };
        let cost = e.cost.unwrap_or_else(|| round2(e.duration * rate));

        out.push(TimeEntry {
            id: e.id,
            project: e.project,
            date: normalize_date(&e.date),
            start_time: e.start_time,
            end_time: e.end_time,
            duration: e.duration,
            hourly_rate: rate,
            cost,
        });
    }
    Ok(out)
}

fn query(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<TimeEntry>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, map_row)?;

    let mut stored = Vec::new();
    for r in rows {
        stored.push(r?);
    }
    price(conn, stored)
}

pub fn insert(
    conn: &Connection,
    project_id: i64,
    date: &str,
    start_time: &str,
    end_time: &str,
    duration: f64,
    hourly_rate: f64,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO time_entries (project_id, date, start_time, end_time, duration, hourly_rate, cost, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, '')",
        params![
            project_id,
            date,
            start_time,
            end_time,
            duration,
            hourly_rate,
            round2(duration * hourly_rate)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, id: i64) -> AppResult<Option<TimeEntry>> {
    let sql = format!("{SELECT_ENTRIES} WHERE te.id = ?1");
    Ok(query(conn, &sql, &[&id])?.into_iter().next())
}

/// Entries of one project, newest first.
pub fn list_by_project(conn: &Connection, project: &str) -> AppResult<Vec<TimeEntry>> {
    let sql = format!(
        "{SELECT_ENTRIES} WHERE p.name = ?1 ORDER BY te.date DESC, te.start_time DESC, te.id ASC"
    );
    query(conn, &sql, &[&project])
}

pub fn list_all(conn: &Connection) -> AppResult<Vec<TimeEntry>> {
    let sql = format!("{SELECT_ENTRIES} ORDER BY te.date DESC, te.start_time DESC, te.id ASC");
    query(conn, &sql, &[])
}

/// Ids of every entry matching the composite key, lowest id first.
/// Dates are compared after normalization, so rows written with a
/// non-canonical date still match.
pub fn ids_by_key(conn: &Connection, key: &EntryKey) -> AppResult<Vec<i64>> {
    let mut ids: Vec<i64> = list_by_project(conn, &key.project)?
        .into_iter()
        .filter(|e| {
            e.date == key.date && e.start_time == key.start_time && e.end_time == key.end_time
        })
        .map(|e| e.id)
        .collect();
    ids.sort_unstable();
    Ok(ids)
}

pub fn update(
    conn: &Connection,
    id: i64,
    date: &str,
    start_time: &str,
    end_time: &str,
    duration: f64,
    hourly_rate: f64,
) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE time_entries
         SET date = ?1, start_time = ?2, end_time = ?3, duration = ?4,
             hourly_rate = ?5, cost = ?6
         WHERE id = ?7",
        params![
            date,
            start_time,
            end_time,
            duration,
            hourly_rate,
            round2(duration * hourly_rate),
            id
        ],
    )?)
}

pub fn delete(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM time_entries WHERE id = ?1", [id])?)
}
