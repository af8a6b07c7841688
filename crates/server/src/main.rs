mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shamrock_core::{
    load_config, validate_config, ArtifactStore, Config, CountryClient, HordeClient,
    ImageOrchestrator, PollConfig, SqliteArtifactStore,
};

use api::create_router;
use state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("SHAMROCK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; every setting has a default, so a missing file
    // just means defaults
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No configuration file at {:?}, using defaults", config_path);
        Config::default()
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Create SQLite image store
    let store: Arc<dyn ArtifactStore> = Arc::new(
        SqliteArtifactStore::new(&config.database.path).context("Failed to create image store")?,
    );
    info!("Image store initialized");

    // Country facts client
    let country = CountryClient::new();

    // Create orchestrator if enabled
    let orchestrator = if config.generation.enabled {
        info!(
            "Initializing image orchestrator (service: {})",
            config.generation.horde.url
        );
        let client = Arc::new(HordeClient::new(config.generation.horde.clone()));
        Some(Arc::new(ImageOrchestrator::new(
            client,
            Arc::clone(&store),
            PollConfig::from(&config.generation),
        )))
    } else {
        info!("Image generation disabled in config");
        None
    };

    // Kick off generation for any missing images; the server starts
    // serving while the pipelines run
    let generation_task = orchestrator.as_ref().map(|orchestrator| {
        let orchestrator = Arc::clone(orchestrator);
        tokio::spawn(async move {
            let report = orchestrator.ensure_images().await;
            if !report.all_succeeded() {
                error!(
                    failed = report.failed.len(),
                    "Startup image generation had failures"
                );
            }
        })
    });

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::clone(&store),
        country,
        orchestrator.clone(),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Wind down any in-flight pipelines
    if let Some(ref orchestrator) = orchestrator {
        info!("Stopping image orchestrator...");
        orchestrator.stop();
    }
    if let Some(task) = generation_task {
        let _ = task.await;
    }

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
