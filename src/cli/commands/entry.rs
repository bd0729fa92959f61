use crate::cli::parser::{Commands, EntryAction, EntryFields};
use crate::config::Config;
use crate::core::Store;
use crate::errors::{AppError, AppResult};
use crate::models::{EntryRef, EntryUpdate, NewTimeEntry, TimeEntry};
use crate::ui::messages::{info, success};
use crate::utils::date::{hours_between, today};
use crate::utils::formatting::{hours, money};
use crate::utils::round2;
use crate::utils::table::{Column, Table};

fn build_new_entry(project: &str, f: &EntryFields) -> AppResult<NewTimeEntry> {
    let start = f
        .start
        .clone()
        .ok_or_else(|| AppError::Validation("Missing --start".into()))?;
    let end = f
        .end
        .clone()
        .ok_or_else(|| AppError::Validation("Missing --end".into()))?;

    // an explicit --duration is stored as given
    let duration = match f.duration {
        Some(d) => d,
        None => hours_between(&start, &end).map(round2).ok_or_else(|| {
            AppError::Validation(format!(
                "Cannot derive the duration from '{start}'-'{end}'; pass --duration"
            ))
        })?,
    };

    Ok(NewTimeEntry {
        project: project.to_string(),
        date: f
            .date
            .clone()
            .unwrap_or_else(|| today().format("%Y-%m-%d").to_string()),
        start_time: start,
        end_time: end,
        duration,
    })
}

fn print_entries(entries: &[TimeEntry], currency: &str) {
    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::left("Project"),
        Column::left("Date"),
        Column::left("Start"),
        Column::left("End"),
        Column::right("Hours"),
        Column::right("Rate/h"),
        Column::right("Cost"),
    ]);

    for e in entries {
        table.add_row(vec![
            e.id.to_string(),
            e.project.clone(),
            e.date.clone(),
            e.start_time.clone(),
            e.end_time.clone(),
            hours(e.duration),
            money(e.hourly_rate, currency),
            money(e.cost, currency),
        ]);
    }

    let total_hours: f64 = entries.iter().map(|e| e.duration).sum();
    let total_cost = round2(entries.iter().map(|e| e.cost).sum());
    table.add_row(vec![
        String::new(),
        "Total".into(),
        String::new(),
        String::new(),
        String::new(),
        hours(total_hours),
        String::new(),
        money(total_cost, currency),
    ]);

    print!("{}", table.render());
}

pub fn handle(cmd: &Commands, cfg: &Config, store: &Store) -> AppResult<()> {
    let Commands::Entry { action } = cmd else {
        return Ok(());
    };

    match action {
        EntryAction::Add { project, fields } => {
            let new = build_new_entry(project, fields)?;
            let e = store.save_entry(&new)?;
            success(format!(
                "Entry #{} saved: {} {} {}-{} ({}h, {})",
                e.id,
                e.project,
                e.date,
                e.start_time,
                e.end_time,
                hours(e.duration),
                money(e.cost, &cfg.currency)
            ));
        }
        EntryAction::List { project } => {
            let entries = match project {
                Some(p) => store.project_entries(p)?,
                None => store.all_entries()?,
            };
            if entries.is_empty() {
                info("No entries found.");
            } else {
                print_entries(&entries, &cfg.currency);
            }
        }
        EntryAction::Update { id, fields } => {
            let r = EntryRef::parse(id)?;
            let upd = EntryUpdate {
                date: fields.date.clone(),
                start_time: fields.start.clone(),
                end_time: fields.end.clone(),
                duration: fields.duration,
            };
            if upd.is_empty() {
                return Err(AppError::Validation(
                    "Nothing to update: pass --date, --start, --end or --duration".into(),
                ));
            }
            let e = store.update_entry(&r, &upd)?;
            success(format!(
                "Entry #{} updated: {} {}-{} ({}h, {})",
                e.id,
                e.date,
                e.start_time,
                e.end_time,
                hours(e.duration),
                money(e.cost, &cfg.currency)
            ));
        }
        EntryAction::Del { id } => {
            let r = EntryRef::parse(id)?;
            let e = store.delete_entry(&r)?;
            success(format!("Entry #{} deleted ({})", e.id, e.key()));
        }
    }

    Ok(())
}
