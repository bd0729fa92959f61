use crate::export::{ExportLogic, ExportTarget};
use crate::server::{ApiError, AppState};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    project: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// `type` defaults to `single` when a project is given, `all` otherwise.
fn target(query: &ExportQuery) -> Result<ExportTarget, ApiError> {
    let project = query
        .project
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let kind = match query.kind.as_deref() {
        Some(k) => k,
        None if project.is_some() => "single",
        None => "all",
    };

    match (kind, project) {
        ("all", _) => Ok(ExportTarget::All),
        ("single", Some(p)) => Ok(ExportTarget::Project(p.to_string())),
        ("single", None) => Err(ApiError::bad_request("Project is required for a single export")),
        (other, _) => Err(ApiError::bad_request(format!("Unknown export type: {other}"))),
    }
}

#[instrument(name = "export", skip(app_state))]
pub async fn export(
    State(app_state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let target = target(&query)?;
    let currency = app_state.currency().to_string();

    let workbook = app_state
        .run(move |store| ExportLogic::build(store, &target, &currency))
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", workbook.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        workbook.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(project: Option<&str>, kind: Option<&str>) -> ExportQuery {
        ExportQuery {
            project: project.map(String::from),
            kind: kind.map(String::from),
        }
    }

    #[test]
    fn type_defaults_follow_project_presence() {
        assert_eq!(
            target(&q(Some("Acme"), None)).unwrap(),
            ExportTarget::Project("Acme".into())
        );
        assert_eq!(target(&q(None, None)).unwrap(), ExportTarget::All);
        assert_eq!(target(&q(Some("Acme"), Some("all"))).unwrap(), ExportTarget::All);
    }

    #[test]
    fn single_without_project_is_rejected() {
        assert!(target(&q(None, Some("single"))).is_err());
        assert!(target(&q(Some("Acme"), Some("pdf"))).is_err());
    }
}
