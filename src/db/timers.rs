use crate::errors::AppResult;
use crate::models::Timer;
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

const SELECT_TIMERS: &str = "
    SELECT t.timer_id, p.name, t.start_time, t.elapsed_time, t.is_running
    FROM timers t
    JOIN projects p ON t.project_id = p.id";

fn map_row(row: &Row) -> rusqlite::Result<Timer> {
    Ok(Timer {
        timer_id: row.get(0)?,
        project: row.get(1)?,
        start_time: row.get(2)?,
        elapsed_time: row.get(3)?,
        is_running: row.get::<_, i64>(4)? != 0,
    })
}

pub fn get(conn: &Connection, timer_id: &str) -> AppResult<Option<Timer>> {
    let sql = format!("{SELECT_TIMERS} WHERE t.timer_id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([timer_id], map_row).optional()?)
}

/// Timers ordered by start time, oldest first.
pub fn list(conn: &Connection) -> AppResult<Vec<Timer>> {
    let sql = format!("{SELECT_TIMERS} ORDER BY t.start_time ASC, t.timer_id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// (Re)start a timer: start time reset to now, elapsed to 0, running.
pub fn upsert_start(conn: &Connection, timer_id: &str, project_id: i64) -> AppResult<()> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    conn.execute(
        "INSERT INTO timers (timer_id, project_id, start_time, elapsed_time, is_running)
         VALUES (?1, ?2, ?3, 0, 1)
         ON CONFLICT(timer_id) DO UPDATE SET
             project_id = excluded.project_id,
             start_time = excluded.start_time,
             elapsed_time = 0,
             is_running = 1",
        params![timer_id, project_id, now],
    )?;
    Ok(())
}

/// Returns the number of rows touched (0 when the timer is gone).
pub fn set_elapsed(conn: &Connection, timer_id: &str, elapsed: f64) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE timers SET elapsed_time = ?1 WHERE timer_id = ?2",
        params![elapsed, timer_id],
    )?)
}

pub fn stop(conn: &Connection, timer_id: &str) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE timers SET is_running = 0 WHERE timer_id = ?1",
        [timer_id],
    )?)
}

pub fn delete(conn: &Connection, timer_id: &str) -> AppResult<bool> {
    Ok(conn.execute("DELETE FROM timers WHERE timer_id = ?1", [timer_id])? > 0)
}
