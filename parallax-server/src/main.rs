// Parallax - monocular object distance estimation server
// Load the model once, then serve HTTP uploads and WebSocket frame streams.

use anyhow::Context;
use clap::Parser;
use parallax_server::config::ServerConfig;
use parallax_server::http::{create_router, AppState};
use parallax_vision::{FrameProcessor, ObjectDetector, YoloDetector};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "parallax-server", about = "Object distance estimation service")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the model weights path from the config
    #[arg(long)]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    info!("🚀 Starting parallax server...");

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.vision.model_path = model;
    }
    config.validate()?;

    let estimator = config.build_estimator()?;
    info!(
        "📏 Reference table ready: {} classes, focal length {}",
        estimator.table().len(),
        estimator.focal_length()
    );

    // Model loading is the slow part of startup; fail fast with context
    let vision_config = config.vision.clone();
    let detector = tokio::task::spawn_blocking(move || YoloDetector::new(&vision_config))
        .await
        .context("Model loading task failed")??;
    info!(
        "✅ Detector ready ({} labels)",
        detector.labels().len()
    );

    let processor = Arc::new(FrameProcessor::new(Box::new(detector), estimator)?);
    let state = AppState::new(processor, &config);
    let router = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🌐 Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
