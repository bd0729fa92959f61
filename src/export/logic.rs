use crate::core::store::Store;
use crate::db::{entries, projects};
use crate::errors::{AppError, AppResult};
use crate::export::all::build_all_workbook;
use crate::export::fs_utils::ensure_writable;
use crate::export::project::build_project_workbook;
use crate::export::{ExportTarget, file_name, notify_export_success};
use crate::ui::messages::info;
use crate::utils::date::today;
use std::fs;
use std::path::{Path, PathBuf};

/// A finished workbook, not yet written anywhere.
#[derive(Debug)]
pub struct ExportedWorkbook {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// High level export: read from the store, build the workbook in memory.
/// The data file is only ever read.
pub struct ExportLogic;

impl ExportLogic {
    pub fn build(store: &Store, target: &ExportTarget, currency: &str) -> AppResult<ExportedWorkbook> {
        let bytes = match target {
            ExportTarget::Project(name) => store.read_existing(|conn| {
                let project = projects::find(conn, name)?
                    .ok_or_else(|| AppError::NotFound(format!("project '{name}'")))?;
                let list = entries::list_by_project(conn, name)?;
                if list.is_empty() {
                    return Err(AppError::EmptyProject(name.clone()));
                }
                build_project_workbook(&project, &list, currency)
            })?,
            ExportTarget::All => store.read_existing(|conn| {
                let mut data = Vec::new();
                for p in projects::list(conn)? {
                    let list = entries::list_by_project(conn, &p.name)?;
                    data.push((p, list));
                }
                build_all_workbook(&data, currency)
            })?,
        };

        Ok(ExportedWorkbook {
            file_name: file_name(target, today()),
            bytes,
        })
    }

    /// Build and write the workbook. Without `file` it lands next to the
    /// data file under its default name.
    pub fn export_to_file(
        store: &Store,
        target: &ExportTarget,
        currency: &str,
        file: Option<&str>,
        force: bool,
    ) -> AppResult<PathBuf> {
        let workbook = Self::build(store, target, currency)?;

        let path = match file {
            Some(f) => PathBuf::from(f),
            None => store
                .path()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
                .join(&workbook.file_name),
        };

        ensure_writable(&path, force)?;

        info(format!("Exporting to XLSX: {}", path.display()));
        fs::write(&path, &workbook.bytes)?;
        notify_export_success("XLSX", &path);

        Ok(path)
    }
}
