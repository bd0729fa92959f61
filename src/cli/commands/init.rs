use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::Store;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the data directory
///  - the current data file with all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let store = Store::from_config(&cfg);

    println!("⚙️  Initializing rTimeBilling…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Data file   : {}", store.path().display());

    let path = store.init()?;

    println!("✅ Data file initialized at {}", path.display());
    println!("🎉 rTimeBilling initialization completed!");
    Ok(())
}
