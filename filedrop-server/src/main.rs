use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use filedrop_blob::FsBlobStore;
use filedrop_lifecycle::{CleanupScheduler, LifecycleManager};
use filedrop_registry::MemoryRegistry;
use filedrop_server::api::AppState;
use filedrop_server::config::FiledropConfig;
use filedrop_server::ratelimit::RateLimiter;

/// Filedrop HTTP server.
#[derive(Parser, Debug)]
#[command(name = "filedrop-server", about = "File upload and download service")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "filedrop.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber from RUST_LOG or default to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config: FiledropConfig = if Path::new(&cli.config).exists() {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        info!(
            path = %cli.config,
            "config file not found, using defaults"
        );
        FiledropConfig::default()
    };

    // Wire up the lifecycle core: in-memory registry, filesystem blobs.
    let registry = Arc::new(MemoryRegistry::new());
    let blobs = Arc::new(FsBlobStore::new(&config.upload.dir));
    let lifecycle = Arc::new(LifecycleManager::new(
        registry,
        blobs,
        config.upload.limits(),
    ));
    info!(dir = %config.upload.dir, "blob store initialized");

    // Spawn the periodic cleanup sweep if enabled.
    let scheduler = if config.cleanup.enabled {
        Some(CleanupScheduler::spawn(
            Arc::clone(&lifecycle),
            Duration::from_secs(config.cleanup.interval_seconds),
        ))
    } else {
        None
    };

    // Build the upload rate limiter if enabled.
    let limiter = if config.rate_limit.enabled {
        info!(
            window_seconds = config.rate_limit.window_seconds,
            max_requests = config.rate_limit.max_requests,
            "upload rate limiter initialized"
        );
        Some(Arc::new(RateLimiter::new(&config.rate_limit)))
    } else {
        None
    };

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let external_url = config
        .server
        .external_url
        .unwrap_or_else(|| format!("http://{addr}"));

    let state = AppState {
        lifecycle,
        external_url: external_url.into(),
        default_retention: config.upload.default_retention,
    };
    let app = filedrop_server::api::router(state, limiter);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "filedrop-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the cleanup scheduler (with configurable timeout).
    if let Some(scheduler) = scheduler {
        let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
        if tokio::time::timeout(shutdown_timeout, scheduler.shutdown())
            .await
            .is_err()
        {
            tracing::warn!(
                timeout_secs = config.server.shutdown_timeout_seconds,
                "shutdown timeout exceeded while stopping the cleanup scheduler"
            );
        }
    }

    info!("filedrop-server shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
