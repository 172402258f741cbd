// Handler tests driving the full router with a mock portal connector

mod history_test;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{Duration, Local, NaiveDate};

use dialysis_portal_domain::services::HistoryServiceConfig;
use dialysis_portal_domain::testing::{MockPortalApi, MockPortalConnector};

use crate::api::{create_app, AppState};

const TOKEN: &str = "token-123";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

/// Router backed by the given mock API, plus the connector for assertions
fn test_app(api: MockPortalApi) -> (Router, MockPortalConnector) {
    let connector = MockPortalConnector::new(api);
    let state = AppState::new(
        Arc::new(connector.clone()),
        HistoryServiceConfig::default(),
        "test",
    );
    (create_app(state), connector)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn header_value(response: &Response<Body>, name: header::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
