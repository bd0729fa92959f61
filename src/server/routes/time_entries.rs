use crate::models::{EntryRef, EntryUpdate, NewTimeEntry, TimeEntry};
use crate::server::{ApiError, AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Wire shape of an entry: `id` is the composite key, `entryId` the row id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    id: String,
    entry_id: i64,
    project: String,
    date: String,
    start_time: String,
    end_time: String,
    duration: f64,
    hourly_rate: f64,
    cost: f64,
}

impl From<TimeEntry> for EntryResponse {
    fn from(e: TimeEntry) -> Self {
        Self {
            id: e.key().to_string(),
            entry_id: e.id,
            project: e.project,
            date: e.date,
            start_time: e.start_time,
            end_time: e.end_time,
            duration: e.duration,
            hourly_rate: e.hourly_rate,
            cost: e.cost,
        }
    }
}

#[derive(Serialize)]
pub struct EntriesResponse {
    entries: Vec<EntryResponse>,
}

#[derive(Serialize)]
pub struct SavedEntryResponse {
    success: bool,
    entry: EntryResponse,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    success: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    project: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayload {
    project: Option<String>,
    date: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    duration: Option<f64>,
}

/// Entry ids arrive either as the composite key string or as the row id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(i64),
    Text(String),
}

impl IdValue {
    fn to_ref(&self) -> Result<EntryRef, ApiError> {
        match self {
            IdValue::Number(n) => Ok(EntryRef::Id(*n)),
            IdValue::Text(s) => Ok(EntryRef::parse(s)?),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    id: Option<IdValue>,
    #[serde(flatten)]
    updates: EntryUpdate,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    id: Option<String>,
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

#[instrument(name = "list_entries", skip(app_state))]
pub async fn list_entries(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<EntriesResponse>, ApiError> {
    let entries = app_state
        .run(move |store| match query.project.as_deref() {
            Some(p) if !p.trim().is_empty() => store.project_entries(p),
            _ => store.all_entries(),
        })
        .await?;

    Ok(Json(EntriesResponse {
        entries: entries.into_iter().map(EntryResponse::from).collect(),
    }))
}

#[instrument(name = "create_entry", skip(app_state))]
pub async fn create_entry(
    State(app_state): State<AppState>,
    Json(body): Json<CreatePayload>,
) -> Result<Json<SavedEntryResponse>, ApiError> {
    let (Some(project), Some(date), Some(start_time), Some(end_time), Some(duration)) = (
        required(body.project),
        required(body.date),
        required(body.start_time),
        required(body.end_time),
        body.duration,
    ) else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    let new = NewTimeEntry {
        project,
        date,
        start_time,
        end_time,
        duration,
    };
    let entry = app_state.run(move |store| store.save_entry(&new)).await?;

    Ok(Json(SavedEntryResponse {
        success: true,
        entry: entry.into(),
    }))
}

#[instrument(name = "update_entry", skip(app_state))]
pub async fn update_entry(
    State(app_state): State<AppState>,
    Json(body): Json<UpdatePayload>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let r = body
        .id
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("Entry ID required"))?
        .to_ref()?;
    let updates = body.updates;

    app_state
        .run(move |store| store.update_entry(&r, &updates))
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

#[instrument(name = "delete_entry", skip(app_state))]
pub async fn delete_entry(
    State(app_state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let raw = required(query.id).ok_or_else(|| ApiError::bad_request("Entry ID required"))?;
    let r = EntryRef::parse(&raw)?;

    app_state.run(move |store| store.delete_entry(&r)).await?;

    Ok(Json(SuccessResponse { success: true }))
}
