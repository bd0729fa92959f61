use crate::cli::parser::{Commands, TimerAction};
use crate::core::Store;
use crate::errors::AppResult;
use crate::models::Timer;
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::secs2clock;
use crate::utils::table::{Column, Table};

fn describe(t: &Timer) -> String {
    format!(
        "{} [{}] {} ({})",
        t.timer_id,
        t.project,
        secs2clock(t.elapsed_time),
        if t.is_running { "running" } else { "stopped" }
    )
}

pub fn handle(cmd: &Commands, store: &Store) -> AppResult<()> {
    let Commands::Timer { action } = cmd else {
        return Ok(());
    };

    match action {
        TimerAction::Start { timer_id, project } => {
            let t = store.start_timer(timer_id, project)?;
            success(format!("Timer started: {}", describe(&t)));
        }
        TimerAction::Update { timer_id, elapsed } => match store.update_timer(timer_id, *elapsed)? {
            Some(t) => success(format!("Timer updated: {}", describe(&t))),
            None => warning(format!("Timer '{timer_id}' not found")),
        },
        TimerAction::Stop { timer_id } => match store.stop_timer(timer_id)? {
            Some(t) => success(format!("Timer stopped: {}", describe(&t))),
            None => warning(format!("Timer '{timer_id}' not found")),
        },
        TimerAction::Del { timer_id } => {
            if store.delete_timer(timer_id)? {
                success(format!("Timer '{timer_id}' deleted"));
            } else {
                warning(format!("Timer '{timer_id}' not found"));
            }
        }
        TimerAction::List => {
            let timers = store.timers()?;
            if timers.is_empty() {
                info("No timers.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::left("Timer"),
                Column::left("Project"),
                Column::left("Started (UTC)"),
                Column::right("Elapsed"),
                Column::left("State"),
            ]);
            for t in &timers {
                table.add_row(vec![
                    t.timer_id.clone(),
                    t.project.clone(),
                    t.start_time.clone(),
                    secs2clock(t.elapsed_time),
                    if t.is_running { "running" } else { "stopped" }.to_string(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
