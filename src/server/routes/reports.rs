use crate::models::{Analytics, Ledger};
use crate::server::{ApiError, AppState};
use axum::{extract::State, Json};
use tracing::instrument;

#[instrument(name = "ledger", skip(app_state))]
pub async fn ledger(State(app_state): State<AppState>) -> Result<Json<Ledger>, ApiError> {
    Ok(Json(app_state.run(|store| store.ledger()).await?))
}

#[instrument(name = "analytics", skip(app_state))]
pub async fn analytics(State(app_state): State<AppState>) -> Result<Json<Analytics>, ApiError> {
    Ok(Json(app_state.run(|store| store.analytics()).await?))
}
