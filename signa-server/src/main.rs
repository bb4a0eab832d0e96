// Signa - real-time sign-language gesture server

use anyhow::Context;
use clap::Parser;
use signa_core::{LoggingConfig, SignaConfig};
use signa_server::startup::{build_state, serve};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "signa-server")]
#[command(about = "Real-time ASL gesture translation over WebSocket", long_about = None)]
#[command(version)]
struct Args {
    /// Configuration file (JSON, TOML or YAML)
    #[arg(long, short)]
    config: Option<String>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// HTTP port
    #[arg(long, short)]
    port: Option<u16>,

    /// Log filter, e.g. "info" or "signa_server=debug"
    #[arg(long)]
    log_level: Option<String>,

    /// Gesture classifier model (ONNX)
    #[arg(long)]
    classifier: Option<PathBuf>,

    /// Hand landmark model (ONNX)
    #[arg(long)]
    landmarker: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(&config.logging)?;

    info!("🚀 Starting ASL Translation Server...");
    info!(
        "📦 Models: classifier={:?}, landmarker={:?}",
        config.models.classifier_path, config.models.landmarker_path
    );

    let state = build_state(&config);
    let model_loaded = state.engine.model_loaded();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    let local = listener.local_addr()?;

    info!("✅ Server ready on http://{}", local);
    info!("   WebSocket: ws://{}/asl-ws", local);
    info!("   Health:    http://{}/health", local);
    info!(
        "🎯 Classifier: {}. Press Ctrl+C to stop.",
        if model_loaded { "learned model" } else { "rule-based" }
    );

    serve(listener, state, wait_for_shutdown()).await?;

    info!("👋 Signa server stopped. Goodbye!");
    Ok(())
}

/// File, then environment, then command line
fn load_config(args: &Args) -> anyhow::Result<SignaConfig> {
    let mut config = match &args.config {
        Some(path) => SignaConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => SignaConfig::default(),
    };

    config.apply_env();

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(path) = &args.classifier {
        config.models.classifier_path = path.clone();
    }
    if let Some(path) = &args.landmarker {
        config.models.landmarker_path = Some(path.clone());
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// RUST_LOG wins over the configured level
fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("invalid log level '{}'", logging.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let result = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}

/// Wait for shutdown signal
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
