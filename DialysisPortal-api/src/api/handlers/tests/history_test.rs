use axum::http::{header, StatusCode};
use tower::ServiceExt;

use dialysis_portal_data::repository::ApiError;
use dialysis_portal_domain::testing::{session_record, symptom_record, MockPortalApi};

use super::{body_json, days_ago, get, header_value, test_app, today, TOKEN};

fn portal_with_history() -> MockPortalApi {
    MockPortalApi::new()
        .with_sessions(vec![
            session_record("1", days_ago(2), 150.0, 95.0),
            session_record("2", days_ago(5), 120.0, 80.0),
            session_record("3", days_ago(40), 118.0, 76.0),
        ])
        .with_symptoms(vec![
            symptom_record("10", days_ago(1), "Dor abdominal", "grave"),
            symptom_record("11", days_ago(60), "Cansaço", "leve"),
        ])
}

#[tokio::test]
async fn test_get_history_default_window() {
    let (app, connector) = test_app(portal_with_history());

    let response = app.oneshot(get("/api/v1/history", Some(TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(connector.seen_tokens(), vec![Some(TOKEN.to_string())]);

    let body = body_json(response).await;
    assert_eq!(body["period"]["days"], 30);

    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["id"], "1");
    assert_eq!(sessions[0]["status"], "attention");
    assert_eq!(sessions[1]["status"], "normal");
    assert_eq!(sessions[0]["ufDisplay"], "2.5");

    let symptoms = body["symptoms"].as_array().unwrap();
    assert_eq!(symptoms.len(), 1);
    assert_eq!(symptoms[0]["intensity"], 9);
    assert_eq!(body["statistics"]["totalRecords"], 2);
}

#[tokio::test]
async fn test_get_history_week_window() {
    let (app, connector) = test_app(portal_with_history());

    let response = app
        .oneshot(get("/api/v1/history?period=7", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["period"]["days"], 7);
    assert_eq!(body["sessions"].as_array().unwrap().len(), 2);
    assert!(connector
        .api()
        .requests()
        .contains(&"statistics?days=7".to_string()));
}

#[tokio::test]
async fn test_missing_token_rejected() {
    let (app, connector) = test_app(portal_with_history());

    let response = app.oneshot(get("/api/v1/history", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
    assert!(connector.seen_tokens().is_empty());
}

#[tokio::test]
async fn test_invalid_period_rejected() {
    let (app, connector) = test_app(portal_with_history());

    let response = app
        .oneshot(get("/api/v1/history?period=14", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert!(connector.api().requests().is_empty());
}

#[tokio::test]
async fn test_non_numeric_period_rejected() {
    let (app, _) = test_app(portal_with_history());

    let response = app
        .oneshot(get("/api/v1/history?period=month", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_portal_failure_maps_to_bad_gateway() {
    let api = MockPortalApi::new().with_failure(ApiError::Transport("connection refused".into()));
    let (app, _) = test_app(api);

    let response = app.oneshot(get("/api/v1/history", Some(TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "upstream_error");
}

#[tokio::test]
async fn test_rejected_token_maps_to_unauthorized() {
    let api = MockPortalApi::new().with_failure(ApiError::Unauthorized("token expirado".into()));
    let (app, _) = test_app(api);

    let response = app.oneshot(get("/api/v1/history", Some(TOKEN))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_export_history_attachment() {
    let (app, _) = test_app(portal_with_history());

    let response = app
        .oneshot(get("/api/v1/history/export?period=90", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_value(&response, header::CONTENT_DISPOSITION),
        format!(
            "attachment; filename=\"historico-dialise-{}.json\"",
            today().format("%Y-%m-%d")
        )
    );
    assert!(header_value(&response, header::CONTENT_TYPE).starts_with("application/json"));

    let body = body_json(response).await;
    assert_eq!(body["period"]["days"], 90);
    assert_eq!(body["period"]["end"], today().format("%Y-%m-%d").to_string());
    assert_eq!(body["dialysisRecords"].as_array().unwrap().len(), 3);
    assert_eq!(body["symptoms"].as_array().unwrap().len(), 2);
    assert!(body["exportTimestamp"].is_string());
}
