use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Local, Utc};
use tracing::{error, info, instrument};
use validator::Validate;

use dialysis_portal_domain::entities::{HistoryExport, HistoryView};
use dialysis_portal_domain::services::export::{export_filename, export_to_json};
use dialysis_portal_domain::services::HistoryServiceTrait;

use crate::api::auth::BearerToken;
use crate::api::state::AppState;
use crate::entities::{ErrorResponse, HistoryQuery};

/// Validate the query string and pick the window
pub(crate) fn history_query(
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<HistoryQuery, ErrorResponse> {
    let Query(query) = query.map_err(|e| ErrorResponse::bad_request(e.body_text()))?;
    query.validate()?;
    Ok(query)
}

/// Get the dialysis history for a trailing window
#[utoipa::path(
    get,
    path = "/api/v1/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History loaded", body = HistoryView),
        (status = 400, description = "Invalid period", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
        (status = 502, description = "Portal API failure", body = ErrorResponse),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "history"
)]
#[instrument(skip(state, token))]
pub async fn get_history(
    State(state): State<AppState>,
    token: BearerToken,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryView>, ErrorResponse> {
    let window = history_query(query)?.window();
    let today = Local::now().date_naive();

    let view = state
        .history_service(&token.0)
        .load_history(window, today)
        .await
        .map_err(|e| {
            error!("Failed to load history: {}", e);
            ErrorResponse::from(e)
        })?;

    info!(
        "History loaded: {} sessions, {} symptoms over {} days",
        view.sessions.len(),
        view.symptoms.len(),
        view.period.days
    );
    Ok(Json(view))
}

/// Download the history for a trailing window as a JSON file
#[utoipa::path(
    get,
    path = "/api/v1/history/export",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History export attachment", body = HistoryExport, content_type = "application/json"),
        (status = 400, description = "Invalid period", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
        (status = 502, description = "Portal API failure", body = ErrorResponse),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "history"
)]
#[instrument(skip(state, token))]
pub async fn export_history(
    State(state): State<AppState>,
    token: BearerToken,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let window = history_query(query)?.window();
    let today = Local::now().date_naive();

    let export = state
        .history_service(&token.0)
        .export_history(window, today, Utc::now())
        .await
        .map_err(|e| {
            error!("Failed to export history: {}", e);
            ErrorResponse::from(e)
        })?;

    let body = export_to_json(&export).map_err(|e| {
        error!("Failed to serialize history export: {}", e);
        ErrorResponse::internal_error()
    })?;
    let filename = export_filename(today);

    info!("History exported as {}", filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    ))
}
