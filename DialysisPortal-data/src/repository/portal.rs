use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::models::{DialysisSessionRecord, PeriodStatistics, ReportPayload, SymptomRecord};
use super::credentials::{clear_on_auth_failure, CredentialProvider};
use super::errors::ApiError;

/// Operations consumed from the portal REST API
#[async_trait]
pub trait PortalApiTrait: Send + Sync {
    /// Fetch the `limit` most recent dialysis sessions of the authenticated patient
    async fn fetch_recent_sessions(&self, limit: usize) -> Result<Vec<DialysisSessionRecord>, ApiError>;

    /// Fetch one page of the symptom history
    async fn fetch_symptom_page(&self, limit: usize, offset: usize) -> Result<Vec<SymptomRecord>, ApiError>;

    /// Fetch pre-aggregated statistics for the trailing `days` window
    async fn fetch_period_statistics(&self, days: u32) -> Result<PeriodStatistics, ApiError>;

    /// Fetch the full report payload of a patient for an explicit date range
    async fn fetch_report_payload(
        &self,
        patient_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ReportPayload, ApiError>;
}

#[async_trait]
impl<T: PortalApiTrait + ?Sized> PortalApiTrait for Arc<T> {
    async fn fetch_recent_sessions(&self, limit: usize) -> Result<Vec<DialysisSessionRecord>, ApiError> {
        (**self).fetch_recent_sessions(limit).await
    }

    async fn fetch_symptom_page(&self, limit: usize, offset: usize) -> Result<Vec<SymptomRecord>, ApiError> {
        (**self).fetch_symptom_page(limit, offset).await
    }

    async fn fetch_period_statistics(&self, days: u32) -> Result<PeriodStatistics, ApiError> {
        (**self).fetch_period_statistics(days).await
    }

    async fn fetch_report_payload(
        &self,
        patient_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ReportPayload, ApiError> {
        (**self).fetch_report_payload(patient_id, start, end).await
    }
}

/// Builds a portal API handle bound to one caller's credentials
pub trait PortalConnector: Send + Sync {
    fn connect(&self, credentials: Arc<dyn CredentialProvider>) -> Arc<dyn PortalApiTrait>;
}

/// Connection settings for the portal API
#[derive(Debug, Clone)]
pub struct PortalApiConfig {
    /// Base URL, e.g. `https://portal.example.org/api`
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl PortalApiConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

/// API responses are either bare or wrapped in `{ "data": ... }`
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

/// Decode a response body, unwrapping the optional `data` envelope
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull a human-readable message out of an error body
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "mensagem", "erro", "error", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// HTTP client for the portal API
#[derive(Debug, Clone)]
pub struct PortalApiClient {
    config: PortalApiConfig,
    http: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl PortalApiClient {
    /// Create a client with its own connection pool
    pub fn new(config: PortalApiConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self::with_http_client(config, http, credentials))
    }

    /// Create a client sharing an existing connection pool
    pub fn with_http_client(
        config: PortalApiConfig,
        http: reqwest::Client,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            config,
            http,
            credentials,
        }
    }

    /// Base URL followed by `segments`, each percent-encoded as a single path segment
    fn endpoint_url(&self, segments: &[&str]) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.config.base_url)
            .map_err(|e| ApiError::Transport(format!("invalid base URL {}: {}", self.config.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("base URL {} cannot carry a path", self.config.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<T, ApiError> {
        let url = self.endpoint_url(segments)?;
        let path = url.path().to_string();
        debug!("GET {}", url);

        let mut request = self.http.get(url).query(query);
        if let Some(token) = self.credentials.bearer_token() {
            request = request.bearer_auth(token);
        }

        let result = self.send(request).await;
        if let Err(e) = &result {
            if clear_on_auth_failure(self.credentials.as_ref(), e) {
                warn!("Portal API rejected credentials for {}", path);
            } else {
                error!("Portal API request to {} failed: {}", path, e);
            }
        }
        result
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        decode_body(&body)
    }
}

#[async_trait]
impl PortalApiTrait for PortalApiClient {
    async fn fetch_recent_sessions(&self, limit: usize) -> Result<Vec<DialysisSessionRecord>, ApiError> {
        self.get_json(&["dialise", "registros"], &[("limite", limit.to_string())])
            .await
    }

    async fn fetch_symptom_page(&self, limit: usize, offset: usize) -> Result<Vec<SymptomRecord>, ApiError> {
        self.get_json(
            &["sintomas", "historico"],
            &[("limite", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    async fn fetch_period_statistics(&self, days: u32) -> Result<PeriodStatistics, ApiError> {
        self.get_json(&["dialise", "estatisticas"], &[("dias", days.to_string())])
            .await
    }

    async fn fetch_report_payload(
        &self,
        patient_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ReportPayload, ApiError> {
        if matches!(patient_id.trim(), "" | "." | "..") {
            return Err(ApiError::NotFound(format!("Invalid patient id {:?}", patient_id)));
        }
        self.get_json(
            &["medico", "pacientes", patient_id, "relatorio"],
            &[
                ("data_inicio", start.format("%Y-%m-%d").to_string()),
                ("data_fim", end.format("%Y-%m-%d").to_string()),
            ],
        )
        .await
    }
}

/// Connector creating HTTP clients that share one connection pool
#[derive(Debug, Clone)]
pub struct HttpPortalConnector {
    config: PortalApiConfig,
    http: reqwest::Client,
}

impl HttpPortalConnector {
    pub fn new(config: PortalApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

impl PortalConnector for HttpPortalConnector {
    fn connect(&self, credentials: Arc<dyn CredentialProvider>) -> Arc<dyn PortalApiTrait> {
        Arc::new(PortalApiClient::with_http_client(
            self.config.clone(),
            self.http.clone(),
            credentials,
        ))
    }
}

/// Mock portal API for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory stand-in for the portal API
    #[derive(Debug, Clone, Default)]
    pub struct MockPortalApi {
        sessions: Vec<DialysisSessionRecord>,
        symptoms: Vec<SymptomRecord>,
        statistics: PeriodStatistics,
        report: Option<ReportPayload>,
        failure: Option<ApiError>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl MockPortalApi {
        /// Create an empty mock API
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_sessions(mut self, sessions: Vec<DialysisSessionRecord>) -> Self {
            self.sessions = sessions;
            self
        }

        pub fn with_symptoms(mut self, symptoms: Vec<SymptomRecord>) -> Self {
            self.symptoms = symptoms;
            self
        }

        pub fn with_statistics(mut self, statistics: PeriodStatistics) -> Self {
            self.statistics = statistics;
            self
        }

        pub fn with_report(mut self, report: ReportPayload) -> Self {
            self.report = Some(report);
            self
        }

        /// Make every call fail with the given error
        pub fn with_failure(mut self, failure: ApiError) -> Self {
            self.failure = Some(failure);
            self
        }

        /// Requests received so far, in call order
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }

        fn record(&self, request: String) -> Result<(), ApiError> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            match &self.failure {
                Some(failure) => Err(failure.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl PortalApiTrait for MockPortalApi {
        async fn fetch_recent_sessions(&self, limit: usize) -> Result<Vec<DialysisSessionRecord>, ApiError> {
            self.record(format!("sessions?limit={}", limit))?;
            Ok(self.sessions.iter().take(limit).cloned().collect())
        }

        async fn fetch_symptom_page(&self, limit: usize, offset: usize) -> Result<Vec<SymptomRecord>, ApiError> {
            self.record(format!("symptoms?limit={}&offset={}", limit, offset))?;
            Ok(self.symptoms.iter().skip(offset).take(limit).cloned().collect())
        }

        async fn fetch_period_statistics(&self, days: u32) -> Result<PeriodStatistics, ApiError> {
            self.record(format!("statistics?days={}", days))?;
            Ok(self.statistics.clone())
        }

        async fn fetch_report_payload(
            &self,
            patient_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<ReportPayload, ApiError> {
            self.record(format!("report/{}?start={}&end={}", patient_id, start, end))?;
            self.report
                .clone()
                .ok_or_else(|| ApiError::NotFound(format!("No report for patient {}", patient_id)))
        }
    }

    /// Connector handing out a shared mock API and recording caller tokens
    #[derive(Debug, Clone, Default)]
    pub struct MockPortalConnector {
        api: MockPortalApi,
        tokens: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl MockPortalConnector {
        pub fn new(api: MockPortalApi) -> Self {
            Self {
                api,
                tokens: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Bearer tokens seen by `connect`, in call order
        pub fn seen_tokens(&self) -> Vec<Option<String>> {
            self.tokens.lock().map(|t| t.clone()).unwrap_or_default()
        }

        pub fn api(&self) -> &MockPortalApi {
            &self.api
        }
    }

    impl PortalConnector for MockPortalConnector {
        fn connect(&self, credentials: Arc<dyn CredentialProvider>) -> Arc<dyn PortalApiTrait> {
            if let Ok(mut tokens) = self.tokens.lock() {
                tokens.push(credentials.bearer_token());
            }
            Arc::new(self.api.clone())
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::tests::{MockPortalApi, MockPortalConnector};
    use super::*;
    use crate::repository::credentials::StaticCredentials;

    #[test]
    fn test_decode_bare_and_wrapped_bodies() {
        let bare: Vec<SymptomRecord> = decode_body(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        let wrapped: Vec<SymptomRecord> =
            decode_body(r#"{"success": true, "data": [{"id": 1}, {"id": 2}]}"#).unwrap();

        assert_eq!(bare.len(), 2);
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn test_decode_bare_statistics_object() {
        let stats: PeriodStatistics = decode_body(r#"{"media_sistolica": 131.5}"#).unwrap();
        assert_eq!(stats.media_sistolica, Some(131.5));
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let result: Result<Vec<SymptomRecord>, _> = decode_body("<html>oops</html>");
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"erro": "Token expirado"}"#).as_deref(),
            Some("Token expirado")
        );
        assert_eq!(error_message("not json"), None);
    }

    #[test]
    fn test_endpoint_url_joins_slashes() {
        let client = PortalApiClient::new(
            PortalApiConfig::new("http://localhost:8080/api/", Duration::from_secs(5)),
            Arc::new(StaticCredentials::anonymous()),
        )
        .unwrap();

        assert_eq!(
            client.endpoint_url(&["dialise", "registros"]).unwrap().as_str(),
            "http://localhost:8080/api/dialise/registros"
        );
    }

    #[test]
    fn test_patient_id_stays_one_path_segment() {
        let client = PortalApiClient::new(
            PortalApiConfig::new("http://portal.local/api", Duration::from_secs(5)),
            Arc::new(StaticCredentials::anonymous()),
        )
        .unwrap();

        let url = client
            .endpoint_url(&["medico", "pacientes", "../../admin/usuarios?x=/", "relatorio"])
            .unwrap();

        assert_eq!(url.host_str(), Some("portal.local"));
        assert_eq!(url.query(), None);
        assert!(url.path().starts_with("/api/medico/pacientes/"));
        assert!(url.path().ends_with("/relatorio"));
        assert_eq!(url.path_segments().map(|s| s.count()), Some(5));
    }

    #[tokio::test]
    async fn test_dot_segment_patient_id_rejected() {
        let client = PortalApiClient::new(
            PortalApiConfig::new("http://portal.local/api", Duration::from_secs(5)),
            Arc::new(StaticCredentials::anonymous()),
        )
        .unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let result = client.fetch_report_payload("..", day, day).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mock_paginates_symptoms() {
        let symptoms = (0..5)
            .map(|i| SymptomRecord {
                id: i.to_string(),
                ..Default::default()
            })
            .collect();
        let api = MockPortalApi::new().with_symptoms(symptoms);

        let page = api.fetch_symptom_page(2, 4).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "4");
    }

    #[tokio::test]
    async fn test_arc_forwards_to_inner_api() {
        let api: Arc<dyn PortalApiTrait> = Arc::new(
            MockPortalApi::new().with_failure(ApiError::Transport("down".to_string())),
        );

        let result = api.fetch_period_statistics(30).await;
        assert_eq!(result, Err(ApiError::Transport("down".to_string())));
    }

    #[test]
    fn test_connector_records_tokens() {
        let connector = MockPortalConnector::new(MockPortalApi::new());
        connector.connect(Arc::new(StaticCredentials::new("abc")));
        connector.connect(Arc::new(StaticCredentials::anonymous()));

        assert_eq!(connector.seen_tokens(), vec![Some("abc".to_string()), None]);
    }
}
