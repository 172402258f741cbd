use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

/// Registers the bearer scheme referenced by the protected paths
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // History endpoints
        crate::api::handlers::history::get_history,
        crate::api::handlers::history::export_history,

        // Report endpoints
        crate::api::handlers::report::get_patient_report
    ),
    components(
        schemas(
            // Request and error entities
            crate::entities::common::ErrorResponse,
            crate::entities::common::HistoryQuery,
            crate::entities::common::ReportQuery,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // History views
            dialysis_portal_domain::entities::HistoryView,
            dialysis_portal_domain::entities::HistoryExport,
            dialysis_portal_domain::entities::HistoryPeriod,
            dialysis_portal_domain::entities::AggregatedStatistics,
            dialysis_portal_domain::entities::SymptomSummary,
            dialysis_portal_domain::entities::NormalizedSessionView,
            dialysis_portal_domain::entities::NormalizedSymptomView,
            dialysis_portal_domain::entities::SessionStatus,
            dialysis_portal_domain::entities::Severity,
            dialysis_portal_domain::entities::DisplayPriority,
            dialysis_portal_domain::entities::DateRange
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "history", description = "Dialysis history and JSON export"),
        (name = "report", description = "Patient PDF reports")
    ),
    info(
        title = "Dialysis Portal API",
        version = "0.1.0",
        description = "Clinical history aggregation and PDF reports for home peritoneal dialysis",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "Dialysis Portal API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().expect("tags defined");
        assert!(tags.iter().any(|tag| tag.name == "history"));
        assert!(tags.iter().any(|tag| tag.name == "report"));

        assert!(openapi.paths.paths.contains_key("/health"));
        assert!(openapi.paths.paths.contains_key("/api/v1/history"));
        assert!(openapi.paths.paths.contains_key("/api/v1/history/export"));
        assert!(openapi.paths.paths.contains_key("/api/v1/patients/{patient_id}/report"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components defined");

        assert!(components.security_schemes.contains_key("bearer"));
    }
}
