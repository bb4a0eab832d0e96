// Startup wiring: artifacts -> engine -> router -> listener

use crate::http::{create_router, AppState};
use signa_core::SignaConfig;
use signa_eye::{ClassificationEngine, ModelManager};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Resolve model artifacts and build the shared state. Missing artifacts
/// downgrade capabilities; they never fail startup.
pub fn build_state(config: &SignaConfig) -> AppState {
    let manager = ModelManager::new(Arc::new(config.models.clone()));
    if let Err(e) = manager.ensure_model_dir() {
        warn!("⚠️  Model directory unavailable: {}", e);
    }

    info!("🧠 Initializing classification engine...");
    let engine = Arc::new(ClassificationEngine::from_manager(&manager));

    info!("✋ Initializing landmark extractor...");
    let state = AppState::new(engine, manager.landmark_extractor(), &config.server);
    info!("✅ Landmark extractor ready ({})", state.pipeline.extractor_name());

    state
}

/// Serve until `shutdown` resolves. In-flight sessions are dropped on shutdown.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
