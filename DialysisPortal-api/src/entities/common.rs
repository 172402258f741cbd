use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use dialysis_portal_domain::entities::PeriodWindow;
use dialysis_portal_domain::services::HistoryServiceError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Missing or rejected credentials
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("unauthorized", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn validation_error(message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            details,
            ..Self::new("validation_error", message)
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    /// The portal API could not be reached or answered with an error
    pub fn upstream_error(message: impl Into<String>) -> Self {
        Self::new("upstream_error", message)
    }

    pub fn internal_error() -> Self {
        Self::new("internal_error", "An unexpected error occurred")
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error.as_str() {
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<HistoryServiceError> for ErrorResponse {
    fn from(err: HistoryServiceError) -> Self {
        match err {
            HistoryServiceError::InvalidPeriod(_) | HistoryServiceError::InvalidDateRange(_) => {
                Self::validation_error(err.to_string(), None)
            }
            HistoryServiceError::Unauthorized(_) => Self::unauthorized(err.to_string()),
            HistoryServiceError::NotFound(_) => Self::not_found(err.to_string()),
            HistoryServiceError::Fetch(_) => Self::upstream_error(err.to_string()),
            HistoryServiceError::Render(_) => Self::internal_error(),
        }
    }
}

impl From<ValidationErrors> for ErrorResponse {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).ok();
        Self::validation_error("Invalid query parameters", details)
    }
}

/// Query parameters selecting the history window
#[derive(Debug, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[validate(schema(function = "validate_history_query"))]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Window length in days: 7, 30, 90 or 365 (default: 30)
    pub period: Option<u32>,
}

impl HistoryQuery {
    /// Selected window, falling back to the default one
    pub fn window(&self) -> PeriodWindow {
        self.period
            .and_then(|days| PeriodWindow::try_from(days).ok())
            .unwrap_or_default()
    }
}

fn validate_history_query(query: &HistoryQuery) -> Result<(), ValidationError> {
    match query.period {
        Some(days) if !PeriodWindow::ALLOWED_DAYS.contains(&days) => {
            let mut error = ValidationError::new("period");
            error.message = Some(format!("period must be one of {:?}", PeriodWindow::ALLOWED_DAYS).into());
            Err(error)
        }
        _ => Ok(()),
    }
}

/// Query parameters for a patient report
#[derive(Debug, Deserialize, Validate, IntoParams, ToSchema)]
#[validate(schema(function = "validate_report_query"))]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// First day of the report period (YYYY-MM-DD)
    pub start_date: chrono::NaiveDate,

    /// Last day of the report period (YYYY-MM-DD)
    pub end_date: chrono::NaiveDate,
}

fn validate_report_query(query: &ReportQuery) -> Result<(), ValidationError> {
    if query.start_date > query.end_date {
        let mut error = ValidationError::new("date_range");
        error.message = Some("start_date must not be after end_date".into());
        return Err(error);
    }
    Ok(())
}
