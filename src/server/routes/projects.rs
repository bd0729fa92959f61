use crate::core::validate::validate_rate;
use crate::models::Project;
use crate::server::{ApiError, AppState};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Serialize)]
pub struct ProjectsResponse {
    projects: Vec<Project>,
}

#[derive(Serialize)]
pub struct ProjectResponse {
    success: bool,
    project: Project,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    project_name: Option<String>,
    hourly_rate: Option<f64>,
}

fn project_name(body: &ProjectPayload) -> Result<String, ApiError> {
    match body.project_name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => Ok(n.to_string()),
        _ => Err(ApiError::bad_request("Project name is required")),
    }
}

#[instrument(name = "list_projects", skip(app_state))]
pub async fn list_projects(
    State(app_state): State<AppState>,
) -> Result<Json<ProjectsResponse>, ApiError> {
    let projects = app_state.run(|store| store.list_projects()).await?;
    Ok(Json(ProjectsResponse { projects }))
}

#[instrument(name = "add_project", skip(app_state))]
pub async fn add_project(
    State(app_state): State<AppState>,
    Json(body): Json<ProjectPayload>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let name = project_name(&body)?;
    let rate = body.hourly_rate;

    let project = app_state
        .run(move |store| store.add_project(&name, rate))
        .await?;

    Ok(Json(ProjectResponse {
        success: true,
        project,
    }))
}

#[instrument(name = "update_project", skip(app_state))]
pub async fn update_project(
    State(app_state): State<AppState>,
    Json(body): Json<ProjectPayload>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let name = project_name(&body)?;
    let rate = body
        .hourly_rate
        .ok_or_else(|| ApiError::bad_request("Hourly rate is required"))?;
    validate_rate(rate)?;

    let project = app_state
        .run(move |store| {
            if store.find_project(&name)?.is_none() {
                return Err(crate::errors::AppError::NotFound(format!("project '{name}'")));
            }
            store.update_rate(&name, rate)
        })
        .await?;

    Ok(Json(ProjectResponse {
        success: true,
        project,
    }))
}
