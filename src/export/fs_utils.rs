// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Check that `path` may be created or replaced.
///
/// - missing file, or `force` → Ok
/// - existing file → ask on stdin; anything but `y`/`yes` cancels
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));
    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    confirm_overwrite(io::stdin().lock())
}

fn confirm_overwrite(mut input: impl BufRead) -> AppResult<()> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;

    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => {
            info("Existing file will be overwritten.");
            Ok(())
        }
        _ => Err(AppError::Export(
            "cancelled, existing file not overwritten".into(),
        )),
    }
}
