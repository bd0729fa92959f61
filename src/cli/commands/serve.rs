use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Store;
use crate::errors::{AppError, AppResult};
use crate::server;

pub fn handle(cmd: &Commands, cfg: &Config, store: Store) -> AppResult<()> {
    let Commands::Serve { bind } = cmd else {
        return Ok(());
    };

    let addr = bind.clone().unwrap_or_else(|| cfg.bind_address.clone());
    let state = server::AppState::new(store, cfg.currency.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Other(format!("cannot start the async runtime: {e}")))?;

    runtime.block_on(server::serve(&addr, state))
}
