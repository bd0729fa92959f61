mod export;
mod projects;
mod reports;
mod time_entries;
mod timers;

use super::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            get(projects::list_projects)
                .post(projects::add_project)
                .patch(projects::update_project),
        )
        .route(
            "/time-entries",
            get(time_entries::list_entries)
                .post(time_entries::create_entry)
                .put(time_entries::update_entry)
                .delete(time_entries::delete_entry),
        )
        .route("/timers", get(timers::list_timers).post(timers::timer_action))
        .route("/ledger", get(reports::ledger))
        .route("/analytics", get(reports::analytics))
        .route("/export", get(export::export))
}
