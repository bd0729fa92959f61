use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::{migrate_file, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, info, success, warning};
use std::fs;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
            println!("📄 Current configuration:\n");
            println!("{yaml}");
        }

        if *check {
            if !path.exists() {
                warning(format!("No configuration file at {}", path.display()));
            } else {
                let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
                let missing = missing_keys(&content)?;
                if missing.is_empty() {
                    success("Configuration file is complete.");
                } else {
                    warning(format!(
                        "Missing fields: {} (run `config --migrate`)",
                        missing.join(", ")
                    ));
                }
            }
        }

        if *migrate {
            if !path.exists() {
                cfg.save()?;
                success(format!("Configuration written to {}", path.display()));
            } else {
                let added = migrate_file(&path)?;
                if added.is_empty() {
                    info("Configuration already up to date.");
                } else {
                    success(format!("Added fields: {}", added.join(", ")));
                }
            }
        }

        if *edit_config {
            let default_editor = std::env::var("EDITOR")
                .or_else(|_| std::env::var("VISUAL"))
                .unwrap_or_else(|_| {
                    if cfg!(target_os = "windows") {
                        "notepad".to_string()
                    } else {
                        "nano".to_string()
                    }
                });
            let editor_to_use = editor.clone().unwrap_or_else(|| default_editor.clone());

            match Command::new(&editor_to_use).arg(&path).status() {
                Ok(s) if s.success() => {
                    success(format!("Configuration file edited using '{editor_to_use}'"));
                }
                _ => {
                    warning(format!(
                        "Editor '{editor_to_use}' not available, falling back to '{default_editor}'"
                    ));
                    match Command::new(&default_editor).arg(&path).status() {
                        Ok(s) if s.success() => {
                            success(format!(
                                "Configuration file edited using fallback '{default_editor}'"
                            ));
                        }
                        _ => error(format!(
                            "Failed to edit configuration file using fallback '{default_editor}'"
                        )),
                    }
                }
            }
        }
    }

    Ok(())
}
