//! Generic key-value settings; today it only holds per-project hourly rates.

use crate::errors::AppResult;
use rusqlite::{Connection, OptionalExtension, params};

/// Settings key holding a project's hourly rate.
pub fn rate_key(project: &str) -> String {
    format!("project:{project}:hourlyRateEUR")
}

pub fn get(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let mut stmt = conn.prepare_cached("SELECT value FROM settings WHERE key = ?1")?;
    Ok(stmt.query_row([key], |row| row.get(0)).optional()?)
}

/// Insert or replace the value stored under `key`.
pub fn set(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )?;
    stmt.execute(params![key, value])?;
    Ok(())
}

/// Current hourly rate of a project; 0 when absent or unparsable.
pub fn rate_of(conn: &Connection, project: &str) -> AppResult<f64> {
    Ok(get(conn, &rate_key(project))?
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|r| r.is_finite())
        .unwrap_or(0.0))
}

pub fn set_rate(conn: &Connection, project: &str, rate: f64) -> AppResult<()> {
    set(conn, &rate_key(project), &rate.to_string())
}
