use crate::models::Timer;
use crate::server::{ApiError, AppState};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Serialize)]
pub struct TimersResponse {
    timers: Vec<Timer>,
}

#[derive(Serialize)]
pub struct TimerResponse {
    timer: Timer,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerPayload {
    action: Option<String>,
    timer_id: Option<String>,
    project: Option<String>,
    elapsed_time: Option<f64>,
}

#[instrument(name = "list_timers", skip(app_state))]
pub async fn list_timers(
    State(app_state): State<AppState>,
) -> Result<Json<TimersResponse>, ApiError> {
    let timers = app_state.run(|store| store.timers()).await?;
    Ok(Json(TimersResponse { timers }))
}

/// One endpoint, dispatched on `action`: start, update, stop or delete.
#[instrument(name = "timer_action", skip(app_state))]
pub async fn timer_action(
    State(app_state): State<AppState>,
    Json(body): Json<TimerPayload>,
) -> Result<Response, ApiError> {
    let action = body
        .action
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Action is required"))?;
    let timer_id = body
        .timer_id
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Timer ID is required"))?;

    match action.as_str() {
        "start" => {
            let project = body
                .project
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| ApiError::bad_request("Project is required to start a timer"))?;
            let timer = app_state
                .run(move |store| store.start_timer(&timer_id, &project))
                .await?;
            Ok(Json(TimerResponse { timer }).into_response())
        }
        "update" => {
            let elapsed = body
                .elapsed_time
                .ok_or_else(|| ApiError::bad_request("Elapsed time is required"))?;
            let timer = app_state
                .run(move |store| store.update_timer(&timer_id, elapsed))
                .await?
                .ok_or_else(|| ApiError::not_found("Timer not found"))?;
            Ok(Json(TimerResponse { timer }).into_response())
        }
        "stop" => {
            let timer = app_state
                .run(move |store| store.stop_timer(&timer_id))
                .await?
                .ok_or_else(|| ApiError::not_found("Timer not found"))?;
            Ok(Json(TimerResponse { timer }).into_response())
        }
        "delete" => {
            let success = app_state
                .run(move |store| store.delete_timer(&timer_id))
                .await?;
            Ok(Json(SuccessResponse { success }).into_response())
        }
        other => Err(ApiError::bad_request(format!("Unknown action: {other}"))),
    }
}
