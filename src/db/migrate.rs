use crate::db::aggregate;
use crate::db::log::ttlog;
use crate::db::settings::rate_key;
use crate::errors::{AppError, AppResult};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LEGACY_RATES_VERSION: &str = "20250301_0001_project_rates_to_settings";

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([table], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn migration_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    if !table_exists(conn, "log")? {
        return Ok(false);
    }
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Create every table of the current layout that does not exist yet.
fn create_baseline_tables(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT UNIQUE NOT NULL,
            created_at  TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS time_entries (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id   INTEGER NOT NULL,
            date         TEXT NOT NULL,
            start_time   TEXT NOT NULL,
            end_time     TEXT NOT NULL,
            duration     REAL NOT NULL,
            hourly_rate  REAL,
            cost         REAL,
            description  TEXT DEFAULT '',
            FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS timers (
            timer_id      TEXT PRIMARY KEY,
            project_id    INTEGER NOT NULL,
            start_time    TEXT NOT NULL,
            elapsed_time  REAL DEFAULT 0,
            is_running    INTEGER DEFAULT 1,
            FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS settings (
            key    TEXT PRIMARY KEY,
            value  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS ledger (
            date     TEXT NOT NULL,
            project  TEXT NOT NULL,
            hours    REAL NOT NULL,
            PRIMARY KEY (date, project)
        );

        CREATE TABLE IF NOT EXISTS analytics (
            position   INTEGER PRIMARY KEY,
            project    TEXT NOT NULL,
            hours      REAL NOT NULL,
            rate       REAL NOT NULL,
            cost       REAL NOT NULL,
            pct_hours  REAL NOT NULL,
            pct_cost   REAL NOT NULL,
            is_total   INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )?;
    Ok(())
}

fn create_indices(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_time_entries_project_date ON time_entries(project_id, date);
        CREATE INDEX IF NOT EXISTS idx_time_entries_date ON time_entries(date);
        CREATE INDEX IF NOT EXISTS idx_timers_project ON timers(project_id);
        "#,
    )?;
    Ok(())
}

/// Older files lack the columns that pin rate and cost at save time.
/// Historical rows keep NULL and are priced at read time.
fn migrate_entry_pricing_columns(conn: &Connection) -> AppResult<()> {
    if !column_exists(conn, "time_entries", "hourly_rate")? {
        conn.execute("ALTER TABLE time_entries ADD COLUMN hourly_rate REAL", [])?;
        tracing::info!("added time_entries.hourly_rate column");
    }
    if !column_exists(conn, "time_entries", "cost")? {
        conn.execute("ALTER TABLE time_entries ADD COLUMN cost REAL", [])?;
        tracing::info!("added time_entries.cost column");
    }
    if !column_exists(conn, "projects", "created_at")? {
        conn.execute(
            "ALTER TABLE projects ADD COLUMN created_at TEXT NOT NULL DEFAULT ''",
            [],
        )?;
    }
    Ok(())
}

fn backup_before_migration(conn: &Connection) -> AppResult<()> {
    let db_path: String = conn
        .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
        .unwrap_or_default();
    if db_path.is_empty() {
        tracing::warn!("could not determine data file path, backup skipped");
        return Ok(());
    }
    let db_path = db_path.as_str();

    let backup_name = format!(
        "{}-backup_before_rate_migration.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let backup_path = Path::new(db_path)
        .parent()
        .map(|p| p.join(&backup_name))
        .ok_or_else(|| AppError::Migration(format!("no parent directory for {db_path}")))?;

    let file = File::create(&backup_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    let entry_name = Path::new(db_path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "database.sqlite".to_string());

    zip.start_file(entry_name, options)
        .map_err(|e| AppError::Migration(format!("Backup failed (start_file): {e}")))?;

    let db_content = fs::read(db_path)?;
    zip.write_all(&db_content)?;

    zip.finish()
        .map_err(|e| AppError::Migration(format!("Backup failed (finish): {e}")))?;

    tracing::info!(backup = %backup_path.display(), "backup written before migration");
    Ok(())
}

/// Rates used to live in `projects.hourly_rate`. They are copied into the
/// settings table once, and only while the settings table is still empty so
/// values set by hand are never overwritten.
fn legacy_rates_pending(conn: &Connection) -> AppResult<bool> {
    if !table_exists(conn, "projects")? || !column_exists(conn, "projects", "hourly_rate")? {
        return Ok(false);
    }
    if migration_applied(conn, LEGACY_RATES_VERSION)? {
        return Ok(false);
    }
    if !table_exists(conn, "settings")? {
        return Ok(true);
    }
    let settings_count: i64 = conn.query_row("SELECT COUNT(*) FROM settings", [], |r| r.get(0))?;
    Ok(settings_count == 0)
}

/// Copy the legacy rates. Returns whether anything was copied.
fn migrate_legacy_project_rates(conn: &Connection) -> AppResult<bool> {
    if !legacy_rates_pending(conn)? {
        return Ok(false);
    }

    tracing::warn!("legacy rate layout detected, migrating rates to settings");

    let rates: Vec<(String, f64)> = {
        let mut stmt = conn.prepare("SELECT name, COALESCE(hourly_rate, 0) FROM projects")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut v = Vec::new();
        for r in rows {
            v.push(r?);
        }
        v
    };

    for (name, rate) in &rates {
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![rate_key(name), rate.to_string()],
        )?;
    }

    ttlog(
        conn,
        "migration_applied",
        LEGACY_RATES_VERSION,
        &format!("Copied {} project rates into settings", rates.len()),
    )?;

    Ok(true)
}

const REQUIRED_TABLES: [&str; 7] = [
    "log",
    "projects",
    "time_entries",
    "timers",
    "settings",
    "ledger",
    "analytics",
];

/// True when the file already has the current layout and nothing is left to
/// migrate. Only reads, so it never contends for the write lock.
fn schema_is_current(conn: &Connection) -> AppResult<bool> {
    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Ok(false);
        }
    }
    Ok(column_exists(conn, "time_entries", "hourly_rate")?
        && column_exists(conn, "time_entries", "cost")?
        && column_exists(conn, "projects", "created_at")?
        && !legacy_rates_pending(conn)?)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db() when a data file is first opened.
/// Pending work runs in one IMMEDIATE transaction: the file either reaches
/// the current layout or stays as it was. The backup is taken before that.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    if schema_is_current(conn)? {
        return Ok(());
    }

    if legacy_rates_pending(conn)? {
        backup_before_migration(conn)?;
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    ensure_log_table(&tx)?;

    let fresh = !table_exists(&tx, "projects")?;

    create_baseline_tables(&tx)?;

    create_indices(&tx)?;

    if !fresh {
        migrate_entry_pricing_columns(&tx)?;
        if migrate_legacy_project_rates(&tx)? {
            // derived tables of an old file start empty
            aggregate::rebuild(&tx)?;
        }
    }

    tx.commit()?;
    Ok(())
}
