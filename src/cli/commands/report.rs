use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Store;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::formatting::{hours, money, percent};
use crate::utils::table::{Column, Table};

/// `ledger`: one row per date, one column per project.
pub fn handle_ledger(store: &Store) -> AppResult<()> {
    let ledger = store.ledger()?;
    if ledger.rows.is_empty() {
        info("No hours logged in this data file.");
        return Ok(());
    }

    let mut columns = vec![Column::left("Date")];
    columns.extend(ledger.projects.iter().map(|p| Column::right(p)));
    columns.push(Column::right("Total"));

    let mut table = Table::new(columns);
    for r in &ledger.rows {
        let mut row = vec![r.date.clone()];
        row.extend(r.hours.iter().map(|h| hours(*h)));
        row.push(hours(r.total));
        table.add_row(row);
    }

    header("Ledger");
    print!("{}", table.render());
    Ok(())
}

/// `analytics`: per-project rollup plus totals.
pub fn handle_analytics(cmd: &Commands, cfg: &Config, store: &Store) -> AppResult<()> {
    if let Commands::Analytics { rebuild: true } = cmd {
        store.rebuild_aggregates()?;
    }

    let analytics = store.analytics()?;
    if analytics.rows.is_empty() {
        info("No projects yet.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::left("Project"),
        Column::right("Hours"),
        Column::right("Rate/h"),
        Column::right("Cost"),
        Column::right("% Hours"),
        Column::right("% Cost"),
    ]);

    for r in &analytics.rows {
        table.add_row(vec![
            r.project.clone(),
            hours(r.hours),
            money(r.rate, &cfg.currency),
            money(r.cost, &cfg.currency),
            percent(r.pct_hours),
            percent(r.pct_cost),
        ]);
    }
    let t = &analytics.total;
    table.add_row(vec![
        t.project.clone(),
        hours(t.hours),
        String::new(),
        money(t.cost, &cfg.currency),
        percent(t.pct_hours),
        percent(t.pct_cost),
    ]);

    header("Analytics");
    print!("{}", table.render());
    Ok(())
}
