use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use dialysis_portal_data::models::{DialysisSessionRecord, PeriodStatistics, ReportPayload, SymptomRecord};
use dialysis_portal_data::repository::{ApiError, PortalApiTrait};

use crate::entities::conversions::{
    convert_to_domain_averages, convert_to_domain_medication, convert_to_domain_patient,
    convert_to_domain_session, convert_to_domain_symptom,
};
use crate::entities::{
    DateRange, DialysisSession, HistoryExport, HistoryPeriod, HistoryView, PeriodWindow, PrecomputedAverages,
    ReportData, Symptom,
};
use crate::report::{generate_report, render_pdf, report_filename, FinishedReport};
use crate::services::export::build_export;
use crate::services::normalizer::{normalize_sessions, normalize_symptoms};
use crate::services::statistics::{aggregate_statistics, summarize_symptoms};
use crate::services::window::{filter_between, filter_window};

/// History service errors
#[derive(Debug, Error)]
pub enum HistoryServiceError {
    /// Period outside the accepted set of windows
    #[error("Invalid period: {0} days (accepted: 7, 30, 90, 365)")]
    InvalidPeriod(u32),

    /// Start date after end date
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// The portal rejected the caller's credentials
    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    /// Requested patient or report does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Fetching from the portal failed
    #[error("Failed to fetch data: {0}")]
    Fetch(String),

    /// Rendering the report failed
    #[error("Failed to render report: {0}")]
    Render(String),
}

/// Parse a period in days into one of the accepted windows
pub fn parse_period(days: u32) -> Result<PeriodWindow, HistoryServiceError> {
    PeriodWindow::try_from(days).map_err(HistoryServiceError::InvalidPeriod)
}

/// Fetch sizes used against the portal API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryServiceConfig {
    /// Most recent sessions fetched before windowing
    pub session_fetch_limit: usize,

    /// Symptom history page size
    pub symptom_page_size: usize,

    /// Hard stop on symptom pages fetched per request
    pub max_symptom_pages: usize,
}

impl Default for HistoryServiceConfig {
    fn default() -> Self {
        Self {
            session_fetch_limit: 500,
            symptom_page_size: 100,
            max_symptom_pages: 50,
        }
    }
}

/// Rendered report ready for download
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Trait for history service operations
#[async_trait]
pub trait HistoryServiceTrait: Send + Sync {
    /// Load the filtered, normalized history for a trailing window
    async fn load_history(&self, window: PeriodWindow, today: NaiveDate) -> Result<HistoryView, HistoryServiceError>;

    /// Load the history and wrap it as a JSON export snapshot
    ///
    /// The window ends on `today`, the same calendar day the dashboard uses;
    /// `exported_at` is only stamped on the snapshot.
    async fn export_history(
        &self,
        window: PeriodWindow,
        today: NaiveDate,
        exported_at: DateTime<Utc>,
    ) -> Result<HistoryExport, HistoryServiceError>;

    /// Fetch a patient's report payload and lay it out
    async fn build_report(
        &self,
        patient_id: &str,
        period: DateRange,
        generated_at: NaiveDateTime,
    ) -> Result<FinishedReport, HistoryServiceError>;

    /// Build a report and render it to PDF
    async fn render_report_pdf(
        &self,
        patient_id: &str,
        period: DateRange,
        generated_at: NaiveDateTime,
    ) -> Result<ReportFile, HistoryServiceError>;
}

/// History service over a portal API handle
pub struct HistoryService<A: PortalApiTrait> {
    api: A,
    config: HistoryServiceConfig,
}

impl<A: PortalApiTrait> HistoryService<A> {
    /// Create a new history service
    pub fn new(api: A, config: HistoryServiceConfig) -> Self {
        Self { api, config }
    }

    /// Map portal errors to service errors
    fn map_api_error(&self, err: ApiError) -> HistoryServiceError {
        if err.is_auth_failure() {
            return HistoryServiceError::Unauthorized(err.to_string());
        }
        match err {
            ApiError::NotFound(msg) => HistoryServiceError::NotFound(msg),
            other => HistoryServiceError::Fetch(other.to_string()),
        }
    }

    /// Walk the paginated symptom history until a short page
    async fn fetch_all_symptoms(&self) -> Result<Vec<SymptomRecord>, ApiError> {
        let page_size = self.config.symptom_page_size.max(1);
        let mut symptoms = Vec::new();

        for page in 0..self.config.max_symptom_pages {
            let batch = self.api.fetch_symptom_page(page_size, page * page_size).await?;
            let last_page = batch.len() < page_size;
            symptoms.extend(batch);
            if last_page {
                return Ok(symptoms);
            }
        }

        warn!(
            "Stopped symptom pagination after {} pages ({} records)",
            self.config.max_symptom_pages,
            symptoms.len()
        );
        Ok(symptoms)
    }

    /// Fetch payload and lay out the report; nothing is laid out when the fetch fails
    async fn prepare_report(
        &self,
        patient_id: &str,
        period: DateRange,
        generated_at: NaiveDateTime,
    ) -> Result<(ReportData, FinishedReport), HistoryServiceError> {
        if period.start > period.end {
            return Err(HistoryServiceError::InvalidDateRange(format!(
                "start date {} is after end date {}",
                period.start, period.end
            )));
        }

        let payload = self
            .api
            .fetch_report_payload(patient_id, period.start, period.end)
            .await
            .map_err(|e| {
                error!("Failed to fetch report payload for patient {}: {}", patient_id, e);
                self.map_api_error(e)
            })?;

        let data = assemble_report_data(payload, period);
        let report = generate_report(&data, generated_at);
        info!(
            "Built report for patient {}: {} sessions, {} pages",
            patient_id,
            data.sessions.len(),
            report.page_count()
        );
        Ok((data, report))
    }
}

#[async_trait]
impl<A: PortalApiTrait> HistoryServiceTrait for HistoryService<A> {
    #[instrument(skip(self))]
    async fn load_history(&self, window: PeriodWindow, today: NaiveDate) -> Result<HistoryView, HistoryServiceError> {
        let (sessions, symptoms, statistics) = futures::try_join!(
            self.api.fetch_recent_sessions(self.config.session_fetch_limit),
            self.fetch_all_symptoms(),
            self.api.fetch_period_statistics(window.days()),
        )
        .map_err(|e| {
            error!("Failed to load history: {}", e);
            self.map_api_error(e)
        })?;

        debug!(
            "Fetched {} sessions and {} symptoms",
            sessions.len(),
            symptoms.len()
        );
        Ok(assemble_history(window, today, sessions, symptoms, &statistics))
    }

    #[instrument(skip(self))]
    async fn export_history(
        &self,
        window: PeriodWindow,
        today: NaiveDate,
        exported_at: DateTime<Utc>,
    ) -> Result<HistoryExport, HistoryServiceError> {
        let view = self.load_history(window, today).await?;
        Ok(build_export(&view, exported_at))
    }

    #[instrument(skip(self))]
    async fn build_report(
        &self,
        patient_id: &str,
        period: DateRange,
        generated_at: NaiveDateTime,
    ) -> Result<FinishedReport, HistoryServiceError> {
        let (_, report) = self.prepare_report(patient_id, period, generated_at).await?;
        Ok(report)
    }

    #[instrument(skip(self))]
    async fn render_report_pdf(
        &self,
        patient_id: &str,
        period: DateRange,
        generated_at: NaiveDateTime,
    ) -> Result<ReportFile, HistoryServiceError> {
        let (data, report) = self.prepare_report(patient_id, period, generated_at).await?;

        let bytes = render_pdf(&report).map_err(|e| {
            error!("Failed to render report for patient {}: {}", patient_id, e);
            HistoryServiceError::Render(e.to_string())
        })?;

        Ok(ReportFile {
            filename: report_filename(&data.patient.name, generated_at.date()),
            bytes,
            page_count: report.page_count(),
        })
    }
}

/// Filter, normalize and aggregate fetched history records
pub fn assemble_history(
    window: PeriodWindow,
    today: NaiveDate,
    sessions: Vec<DialysisSessionRecord>,
    symptoms: Vec<SymptomRecord>,
    statistics: &PeriodStatistics,
) -> HistoryView {
    let period = HistoryPeriod::new(window, today);

    let sessions: Vec<DialysisSession> = sessions.into_iter().map(convert_to_domain_session).collect();
    let symptoms: Vec<Symptom> = symptoms.into_iter().map(convert_to_domain_symptom).collect();

    let sessions = normalize_sessions(&filter_window(sessions, window, today));
    let symptoms = normalize_symptoms(&filter_window(symptoms, window, today));

    HistoryView {
        statistics: aggregate_statistics(&sessions, period.range(), convert_to_domain_averages(statistics)),
        symptom_summary: summarize_symptoms(&symptoms),
        period,
        sessions,
        symptoms,
    }
}

/// Convert a report payload into the data the composer lays out
pub fn assemble_report_data(payload: ReportPayload, period: DateRange) -> ReportData {
    let sessions: Vec<DialysisSession> = payload.registros.into_iter().map(convert_to_domain_session).collect();
    let sessions = normalize_sessions(&filter_between(sessions, period));

    let precomputed = payload
        .estatisticas
        .as_ref()
        .map(convert_to_domain_averages)
        .unwrap_or_else(PrecomputedAverages::default);

    ReportData {
        statistics: aggregate_statistics(&sessions, period, precomputed),
        patient: convert_to_domain_patient(payload.paciente),
        period,
        sessions,
        medications: payload
            .medicamentos
            .into_iter()
            .filter_map(convert_to_domain_medication)
            .collect(),
    }
}

/// Factory function to create a history service over a shared API handle
pub fn create_history_service(
    api: std::sync::Arc<dyn PortalApiTrait>,
    config: HistoryServiceConfig,
) -> HistoryService<std::sync::Arc<dyn PortalApiTrait>> {
    HistoryService::new(api, config)
}
