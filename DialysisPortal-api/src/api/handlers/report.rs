use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use chrono::Local;
use tracing::{error, info, instrument};
use validator::Validate;

use dialysis_portal_domain::entities::DateRange;
use dialysis_portal_domain::services::HistoryServiceTrait;

use crate::api::auth::BearerToken;
use crate::api::state::AppState;
use crate::entities::{ErrorResponse, ReportQuery};

/// Portal identifiers are opaque but must stay one URL path segment
pub(crate) fn is_valid_patient_id(patient_id: &str) -> bool {
    !patient_id.is_empty()
        && !patient_id.contains("..")
        && !patient_id.contains(['/', '\\', '?', '#'])
}

/// Generate a patient's dialysis report as a PDF download
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/report",
    params(
        ("patient_id" = String, Path, description = "Patient identifier in the portal"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "PDF report attachment", content_type = "application/pdf"),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 502, description = "Portal API failure", body = ErrorResponse),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "report"
)]
#[instrument(skip(state, token, query))]
pub async fn get_patient_report(
    State(state): State<AppState>,
    token: BearerToken,
    Path(patient_id): Path<String>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Query(query) = query.map_err(|e| ErrorResponse::bad_request(e.body_text()))?;
    query.validate()?;

    let patient_id = patient_id.trim();
    if !is_valid_patient_id(patient_id) {
        return Err(ErrorResponse::bad_request("patient_id must be a single, non-empty identifier"));
    }

    let period = DateRange::new(query.start_date, query.end_date);
    let file = state
        .history_service(&token.0)
        .render_report_pdf(patient_id, period, Local::now().naive_local())
        .await
        .map_err(|e| {
            error!("Failed to generate report for patient {}: {}", patient_id, e);
            ErrorResponse::from(e)
        })?;

    info!(
        "Report {} generated: {} pages, {} bytes",
        file.filename,
        file.page_count,
        file.bytes.len()
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.bytes,
    ))
}
