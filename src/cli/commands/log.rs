use crate::cli::parser::Commands;
use crate::core::Store;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, store: &Store) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        LogLogic::print_log(store)?;
    }

    Ok(())
}
