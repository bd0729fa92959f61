use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Store;
use crate::errors::AppResult;
use crate::export::{ExportLogic, ExportTarget};

pub fn handle(cmd: &Commands, cfg: &Config, store: &Store) -> AppResult<()> {
    if let Commands::Export {
        project,
        all: _,
        file,
        force,
    } = cmd
    {
        let target = match project {
            Some(name) => ExportTarget::Project(name.trim().to_string()),
            None => ExportTarget::All,
        };
        ExportLogic::export_to_file(store, &target, &cfg.currency, file.as_deref(), *force)?;
    }
    Ok(())
}
