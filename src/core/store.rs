//! The store object every command and request handler goes through.
//!
//! A `Store` knows where the data file lives and which policy applies to
//! unknown projects. It keeps one connection per data file and every
//! mutation runs as one IMMEDIATE transaction that also rebuilds the derived
//! views, so either the whole change lands or nothing does.

use crate::config::Config;
use crate::core::validate::{
    require, require_key_part, validate_duration, validate_elapsed, validate_project_name,
    validate_rate,
};
use crate::db::log::{LogRow, load_log, ttlog};
use crate::db::{DbPool, OpenMode, aggregate, entries, projects, settings, timers};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Analytics, EntryRef, EntryUpdate, Ledger, NewTimeEntry, Project, TimeEntry, Timer,
};
use crate::utils::date::{month_stamp, normalize_date, today};
use crate::utils::path::expand_tilde;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::instrument;

/// Where the data file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A single file, whatever the date.
    Fixed(PathBuf),
    /// `<dir>/<prefix>-YYYY-MM.sqlite` for the current month.
    Monthly { dir: PathBuf, prefix: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorePolicy {
    /// Create a project (rate 0) the first time an entry or timer names it.
    pub auto_create_project: bool,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            auto_create_project: true,
        }
    }
}

/// Connection to the current data file, opened and migrated on first use.
/// Shared by every clone of a store.
type SharedPool = Arc<Mutex<Option<DbPool>>>;

#[derive(Debug, Clone)]
pub struct Store {
    location: StoreLocation,
    policy: StorePolicy,
    pool: SharedPool,
}

impl Store {
    pub fn new(location: StoreLocation, policy: StorePolicy) -> Self {
        Self {
            location,
            policy,
            pool: SharedPool::default(),
        }
    }

    /// A fixed `database` in the config bypasses the monthly layout.
    pub fn from_config(cfg: &Config) -> Self {
        let location = match &cfg.database {
            Some(db) if !db.trim().is_empty() => StoreLocation::Fixed(expand_tilde(db)),
            _ => StoreLocation::Monthly {
                dir: cfg.data_dir_path(),
                prefix: cfg.file_prefix.clone(),
            },
        };

        Self::new(
            location,
            StorePolicy {
                auto_create_project: cfg.auto_create_project,
            },
        )
    }

    pub fn policy(&self) -> StorePolicy {
        self.policy
    }

    /// Data file for the current call.
    pub fn path(&self) -> PathBuf {
        match &self.location {
            StoreLocation::Fixed(p) => p.clone(),
            StoreLocation::Monthly { dir, prefix } => {
                dir.join(format!("{}-{}.sqlite", prefix, month_stamp(today())))
            }
        }
    }

    /// Create the data file with the baseline schema (or upgrade an old one).
    pub fn init(&self) -> AppResult<PathBuf> {
        let path = self.path();
        self.write(|conn| {
            ttlog(conn, "init", "", &format!("Data file initialized at {}", path.display()))
        })?;
        Ok(path)
    }

    // ---------------------------------------------------------------------
    // Plumbing
    // ---------------------------------------------------------------------

    /// Run `f` on the connection of the current data file.
    ///
    /// Calls from this process are serialized on one connection, so a
    /// `FileLocked` error can only come from another program. The connection
    /// is reopened when the resolved path changes (new month) or the file
    /// has disappeared.
    fn with_pool<T>(
        &self,
        mode: OpenMode,
        f: impl FnOnce(&mut DbPool) -> AppResult<T>,
    ) -> AppResult<T> {
        // a panic mid-call leaves no open transaction behind; the connection stays usable
        let mut slot = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.path();

        let reusable = slot
            .as_ref()
            .is_some_and(|p| p.path == path && path.exists());
        if !reusable {
            *slot = None;
            *slot = Some(DbPool::open(&path, mode)?);
        }

        match slot.as_mut() {
            Some(pool) => f(pool),
            None => Err(AppError::Other("data file connection missing".into())),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Connection) -> AppResult<T>) -> AppResult<T> {
        self.with_pool(OpenMode::CreateIfMissing, |pool| f(&pool.conn))
    }

    /// Read path for callers that expect data to exist already.
    pub fn read_existing<T>(&self, f: impl FnOnce(&Connection) -> AppResult<T>) -> AppResult<T> {
        self.with_pool(OpenMode::ExistingOnly, |pool| f(&pool.conn))
    }

    fn write<T>(&self, f: impl FnOnce(&Connection) -> AppResult<T>) -> AppResult<T> {
        self.with_pool(OpenMode::CreateIfMissing, |pool| {
            let tx = pool.write_tx()?;
            let out = f(&tx)?;
            tx.commit()?;
            tracing::debug!(path = %pool.path.display(), "changes committed");
            Ok(out)
        })
    }

    /// Id of `name`, creating the project when the policy allows it.
    /// The flag tells whether a project was created.
    fn ensure_project(&self, conn: &Connection, name: &str) -> AppResult<(i64, bool)> {
        if let Some(id) = projects::project_id(conn, name)? {
            return Ok((id, false));
        }
        if !self.policy.auto_create_project {
            return Err(AppError::NotFound(format!("project '{name}'")));
        }

        let name = validate_project_name(name)?;
        let id = projects::insert(conn, &name)?;
        settings::set_rate(conn, &name, 0.0)?;
        ttlog(conn, "add", &format!("project:{name}"), "Project auto-created with rate 0")?;
        tracing::info!(project = %name, "project auto-created");
        Ok((id, true))
    }

    fn resolve_entry(conn: &Connection, r: &EntryRef) -> AppResult<TimeEntry> {
        match r {
            EntryRef::Id(id) => {
                entries::get(conn, *id)?.ok_or_else(|| AppError::NotFound(format!("entry {r}")))
            }
            EntryRef::Key(key) => {
                let ids = entries::ids_by_key(conn, key)?;
                let Some(first) = ids.first() else {
                    return Err(AppError::NotFound(format!("entry {r}")));
                };
                if ids.len() > 1 {
                    tracing::warn!(
                        key = %key,
                        matches = ids.len(),
                        chosen = first,
                        "entry key is ambiguous, using the first match"
                    );
                }
                entries::get(conn, *first)?.ok_or_else(|| AppError::NotFound(format!("entry {r}")))
            }
        }
    }

    // ---------------------------------------------------------------------
    // Projects and settings
    // ---------------------------------------------------------------------

    pub fn list_projects(&self) -> AppResult<Vec<Project>> {
        self.read(projects::list)
    }

    pub fn find_project(&self, name: &str) -> AppResult<Option<Project>> {
        self.read(|conn| projects::find(conn, name.trim()))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_project(&self, name: &str, rate: Option<f64>) -> AppResult<Project> {
        let name = validate_project_name(name)?;
        let rate = validate_rate(rate.unwrap_or(0.0))?;

        self.write(|conn| {
            if projects::project_id(conn, &name)?.is_some() {
                return Err(AppError::Conflict(format!("project '{name}'")));
            }
            projects::insert(conn, &name)?;
            settings::set_rate(conn, &name, rate)?;
            aggregate::rebuild(conn)?;
            ttlog(conn, "add", &format!("project:{name}"), &format!("Project added with rate {rate}"))?;
            Ok(Project::new(name.clone(), rate))
        })
    }

    /// Upserts the rate whether or not the project exists.
    #[instrument(level = "debug", skip(self))]
    pub fn update_rate(&self, name: &str, rate: f64) -> AppResult<Project> {
        let name = require("projectName", name)?.to_string();
        let rate = validate_rate(rate)?;

        self.write(|conn| {
            settings::set_rate(conn, &name, rate)?;
            aggregate::rebuild(conn)?;
            ttlog(conn, "edit", &format!("project:{name}"), &format!("Hourly rate set to {rate}"))?;
            Ok(Project::new(name.clone(), rate))
        })
    }

    pub fn setting(&self, key: &str) -> AppResult<Option<String>> {
        self.read(|conn| settings::get(conn, key))
    }

    pub fn set_setting(&self, key: &str, value: &str) -> AppResult<()> {
        self.write(|conn| {
            settings::set(conn, key, value)?;
            aggregate::rebuild(conn)
        })
    }

    // ---------------------------------------------------------------------
    // Time entries
    // ---------------------------------------------------------------------

    /// Append an entry priced at the project's current rate.
    #[instrument(level = "debug", skip(self))]
    pub fn save_entry(&self, new: &NewTimeEntry) -> AppResult<TimeEntry> {
        let project = require("project", &new.project)?.to_string();
        let date = normalize_date(require_key_part("date", &new.date)?);
        let start = require_key_part("startTime", &new.start_time)?.to_string();
        let end = require_key_part("endTime", &new.end_time)?.to_string();
        let duration = validate_duration(new.duration)?;

        self.write(|conn| {
            let (project_id, _) = self.ensure_project(conn, &project)?;
            let rate = settings::rate_of(conn, &project)?;
            let id = entries::insert(conn, project_id, &date, &start, &end, duration, rate)?;

            aggregate::rebuild(conn)?;
            ttlog(
                conn,
                "add",
                &format!("entry:{id}"),
                &format!("{project} {date} {start}-{end} ({duration}h)"),
            )?;

            entries::get(conn, id)?.ok_or_else(|| AppError::Other(format!("entry {id} vanished")))
        })
    }

    pub fn project_entries(&self, project: &str) -> AppResult<Vec<TimeEntry>> {
        self.read(|conn| entries::list_by_project(conn, project.trim()))
    }

    pub fn all_entries(&self) -> AppResult<Vec<TimeEntry>> {
        self.read(entries::list_all)
    }

    /// Apply the given fields; cost is recomputed at the current rate.
    #[instrument(level = "debug", skip(self))]
    pub fn update_entry(&self, r: &EntryRef, upd: &EntryUpdate) -> AppResult<TimeEntry> {
        if let Some(d) = upd.duration {
            validate_duration(d)?;
        }

        self.write(|conn| {
            let current = Self::resolve_entry(conn, r)?;

            let date = match &upd.date {
                Some(d) => normalize_date(require_key_part("date", d)?),
                None => current.date.clone(),
            };
            let start = match &upd.start_time {
                Some(s) => require_key_part("startTime", s)?.to_string(),
                None => current.start_time.clone(),
            };
            let end = match &upd.end_time {
                Some(e) => require_key_part("endTime", e)?.to_string(),
                None => current.end_time.clone(),
            };
            let duration = upd.duration.unwrap_or(current.duration);
            let rate = settings::rate_of(conn, &current.project)?;

            entries::update(conn, current.id, &date, &start, &end, duration, rate)?;
            aggregate::rebuild(conn)?;
            ttlog(
                conn,
                "edit",
                &format!("entry:{}", current.id),
                &format!("{} {date} {start}-{end} ({duration}h)", current.project),
            )?;

            entries::get(conn, current.id)?
                .ok_or_else(|| AppError::Other(format!("entry {} vanished", current.id)))
        })
    }

    /// Remove an entry and return it as it was.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_entry(&self, r: &EntryRef) -> AppResult<TimeEntry> {
        self.write(|conn| {
            let current = Self::resolve_entry(conn, r)?;
            entries::delete(conn, current.id)?;
            aggregate::rebuild(conn)?;
            ttlog(conn, "del", &format!("entry:{}", current.id), &current.key().to_string())?;
            Ok(current)
        })
    }

    // ---------------------------------------------------------------------
    // Derived views
    // ---------------------------------------------------------------------

    pub fn ledger(&self) -> AppResult<Ledger> {
        self.read(aggregate::load_ledger)
    }

    pub fn analytics(&self) -> AppResult<Analytics> {
        self.read(aggregate::load_analytics)
    }

    /// Recompute both derived tables without any other change.
    #[instrument(level = "debug", skip(self))]
    pub fn rebuild_aggregates(&self) -> AppResult<()> {
        self.write(aggregate::rebuild)
    }

    // ---------------------------------------------------------------------
    // Timers
    // ---------------------------------------------------------------------

    /// Start (or restart) a timer for `project`.
    #[instrument(level = "debug", skip(self))]
    pub fn start_timer(&self, timer_id: &str, project: &str) -> AppResult<Timer> {
        let timer_id = require("timerId", timer_id)?.to_string();
        let project = require("project", project)?.to_string();

        self.write(|conn| {
            let (project_id, created) = self.ensure_project(conn, &project)?;
            if created {
                aggregate::rebuild(conn)?;
            }
            timers::upsert_start(conn, &timer_id, project_id)?;
            ttlog(conn, "start", &format!("timer:{timer_id}"), &format!("Timer started on {project}"))?;
            timers::get(conn, &timer_id)?
                .ok_or_else(|| AppError::Other(format!("timer {timer_id} vanished")))
        })
    }

    /// `None` when the timer does not exist (e.g. deleted meanwhile).
    #[instrument(level = "debug", skip(self))]
    pub fn update_timer(&self, timer_id: &str, elapsed_secs: f64) -> AppResult<Option<Timer>> {
        let elapsed = validate_elapsed(elapsed_secs)?;

        self.write(|conn| {
            if timers::set_elapsed(conn, timer_id, elapsed)? == 0 {
                return Ok(None);
            }
            timers::get(conn, timer_id)
        })
    }

    /// Marks the timer stopped; it stays listed until deleted.
    #[instrument(level = "debug", skip(self))]
    pub fn stop_timer(&self, timer_id: &str) -> AppResult<Option<Timer>> {
        self.write(|conn| {
            if timers::stop(conn, timer_id)? == 0 {
                return Ok(None);
            }
            ttlog(conn, "stop", &format!("timer:{timer_id}"), "Timer stopped")?;
            timers::get(conn, timer_id)
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_timer(&self, timer_id: &str) -> AppResult<bool> {
        self.write(|conn| {
            let removed = timers::delete(conn, timer_id)?;
            if removed {
                ttlog(conn, "del", &format!("timer:{timer_id}"), "Timer deleted")?;
            }
            Ok(removed)
        })
    }

    pub fn timers(&self) -> AppResult<Vec<Timer>> {
        self.read(timers::list)
    }

    // ---------------------------------------------------------------------
    // Audit log
    // ---------------------------------------------------------------------

    pub fn audit_log(&self) -> AppResult<Vec<LogRow>> {
        self.read(load_log)
    }
}
