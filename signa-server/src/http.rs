// HTTP routes: status endpoints and the streaming upgrade

use crate::pipeline::FramePipeline;
use crate::protocol::{HealthResponse, ServiceInfo};
use crate::session::SessionManager;
use crate::websocket::websocket_handler;
use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use signa_core::ServerConfig;
use signa_eye::{ClassificationEngine, LandmarkExtractor};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state. Built once at startup; only the session
/// registry changes afterwards.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ClassificationEngine>,
    pub pipeline: Arc<FramePipeline>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(
        engine: Arc<ClassificationEngine>,
        extractor: Arc<dyn LandmarkExtractor>,
        config: &ServerConfig,
    ) -> Self {
        let pipeline = FramePipeline::from_config(Arc::clone(&engine), extractor, config);
        Self {
            engine,
            pipeline: Arc::new(pipeline),
            sessions: Arc::new(SessionManager::new(config.max_sessions)),
        }
    }
}

/// Create HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/asl-ws", get(websocket_handler))
        .route("/ws", get(websocket_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Service descriptor
async fn root_handler() -> impl IntoResponse {
    Json(ServiceInfo::default())
}

/// Health check endpoint
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.engine.model_loaded(),
        active_connections: state.sessions.count(),
    })
}
