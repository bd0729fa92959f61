use crate::cli::parser::{Commands, ProjectAction};
use crate::config::Config;
use crate::core::Store;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::formatting::money;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config, store: &Store) -> AppResult<()> {
    let Commands::Project { action } = cmd else {
        return Ok(());
    };

    match action {
        ProjectAction::List => {
            let projects = store.list_projects()?;
            if projects.is_empty() {
                info("No projects yet.");
                return Ok(());
            }

            let mut table = Table::new(vec![Column::left("Project"), Column::right("Rate/h")]);
            for p in &projects {
                table.add_row(vec![p.name.clone(), money(p.hourly_rate, &cfg.currency)]);
            }
            print!("{}", table.render());
        }
        ProjectAction::Add { name, rate } => {
            let p = store.add_project(name, Some(*rate))?;
            success(format!(
                "Project '{}' added ({}/h)",
                p.name,
                money(p.hourly_rate, &cfg.currency)
            ));
        }
        ProjectAction::Rate { name, rate } => {
            let name = name.trim();
            if store.find_project(name)?.is_none() {
                return Err(AppError::NotFound(format!("project '{name}'")));
            }
            let p = store.update_rate(name, *rate)?;
            success(format!(
                "Rate of '{}' set to {}/h",
                p.name,
                money(p.hourly_rate, &cfg.currency)
            ));
        }
    }

    Ok(())
}
