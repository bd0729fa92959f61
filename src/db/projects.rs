use crate::db::settings;
use crate::errors::AppResult;
use crate::models::Project;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

pub fn project_id(conn: &Connection, name: &str) -> AppResult<Option<i64>> {
    let mut stmt = conn.prepare_cached("SELECT id FROM projects WHERE name = ?1")?;
    Ok(stmt.query_row([name], |row| row.get(0)).optional()?)
}

/// All projects sorted by name, with rates resolved from settings.
pub fn list(conn: &Connection) -> AppResult<Vec<Project>> {
    let names: Vec<String> = {
        let mut stmt = conn.prepare("SELECT name FROM projects ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut v = Vec::new();
        for r in rows {
            v.push(r?);
        }
        v
    };

    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let rate = settings::rate_of(conn, &name)?;
        out.push(Project::new(name, rate));
    }
    Ok(out)
}

pub fn find(conn: &Connection, name: &str) -> AppResult<Option<Project>> {
    match project_id(conn, name)? {
        Some(_) => Ok(Some(Project::new(name, settings::rate_of(conn, name)?))),
        None => Ok(None),
    }
}

/// Insert the project row. Callers check uniqueness and validate the name.
pub fn insert(conn: &Connection, name: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO projects (name, created_at) VALUES (?1, ?2)",
        params![name, Local::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}
