//! rTimeBilling library root.
//! Exposes the CLI parser, the store, the HTTP router and the high-level
//! run() function.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod server;
pub mod ui;
pub mod utils;

pub use crate::core::{Store, StoreLocation, StorePolicy};

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over `default_level`.
/// A second call is a no-op.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let store = Store::from_config(cfg);

    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Project { .. } => cli::commands::project::handle(&cli.command, cfg, &store),
        Commands::Entry { .. } => cli::commands::entry::handle(&cli.command, cfg, &store),
        Commands::Timer { .. } => cli::commands::timer::handle(&cli.command, &store),
        Commands::Ledger => cli::commands::report::handle_ledger(&store),
        Commands::Analytics { .. } => {
            cli::commands::report::handle_analytics(&cli.command, cfg, &store)
        }
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg, &store),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, &store),
        Commands::Serve { .. } => cli::commands::serve::handle(&cli.command, cfg, store),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let default_level = if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    init_tracing(default_level);

    // config is loaded once; --db overrides the data file
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = Some(custom_db.clone());
    }

    dispatch(&cli, &cfg)
}
