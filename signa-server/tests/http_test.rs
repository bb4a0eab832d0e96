// Status endpoint tests

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::*;
use serde_json::{json, Value};
use signa_core::ServerConfig;
use signa_eye::{ClassificationEngine, NullExtractor};
use signa_server::{create_router, AppState};
use std::sync::Arc;
use tower::ServiceExt;

async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
    let response = create_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_without_model() {
    let state = rule_based_state(Arc::new(NullExtractor), &ServerConfig::default());
    let (status, body) = get_json(state, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "model_loaded": false, "active_connections": 0})
    );
}

#[tokio::test]
async fn test_health_reports_model_and_sessions() {
    let engine = Arc::new(ClassificationEngine::with_model(Arc::new(FixedModel(vec![
        0.1, 0.2, 0.3, 0.2, 0.2,
    ]))));
    let state = AppState::new(engine, Arc::new(NullExtractor), &ServerConfig::default());
    state.sessions.register("a".to_string()).unwrap();
    state.sessions.register("b".to_string()).unwrap();

    let (_, body) = get_json(state.clone(), "/health").await;
    assert_eq!(body["model_loaded"], json!(true));
    assert_eq!(body["active_connections"], json!(2));

    state.sessions.deregister("a");
    let (_, body) = get_json(state, "/health").await;
    assert_eq!(body["active_connections"], json!(1));
}

#[tokio::test]
async fn test_root_descriptor() {
    let state = rule_based_state(Arc::new(NullExtractor), &ServerConfig::default());
    let (status, body) = get_json(state, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "ASL Translation Server",
            "endpoints": {"websocket": "/asl-ws", "health": "/health"}
        })
    );
}

#[tokio::test]
async fn test_cors_is_permissive() {
    let state = rule_based_state(Arc::new(NullExtractor), &ServerConfig::default());
    let response = create_router(state)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let state = rule_based_state(Arc::new(NullExtractor), &ServerConfig::default());
    let response = create_router(state)
        .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_websocket_route_requires_upgrade() {
    let state = rule_based_state(Arc::new(NullExtractor), &ServerConfig::default());
    let response = create_router(state)
        .oneshot(Request::builder().uri("/asl-ws").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
