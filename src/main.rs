use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use docbulk::{AppConfig, AppState, InMemoryDocumentStore, SnapshotManager, build_router};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docbulk")]
#[command(about = "Bulk document mutation service")]
struct Cli {
    /// Address to bind, overrides APP_HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides APP_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Snapshot file to load at startup and save on shutdown, overrides SNAPSHOT_PATH
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("failed to load application configuration")?;
    if let Some(host) = cli.host.as_deref() {
        config = config.host(host);
    }
    if let Some(port) = cli.port {
        config = config.port(port);
    }
    if let Some(path) = cli.snapshot {
        config = config.snapshot_path(path);
    }

    init_tracing(&config.log_filter);

    let snapshots = config.snapshot_path.as_ref().map(SnapshotManager::new);
    let store = match &snapshots {
        Some(manager) => match manager
            .load()
            .with_context(|| format!("failed to load snapshot {}", manager.path().display()))?
        {
            Some(snapshot) => {
                info!(
                    documents = snapshot.metadata.document_count,
                    path = %manager.path().display(),
                    "restored store from snapshot"
                );
                InMemoryDocumentStore::from_snapshot(snapshot)
            }
            None => InMemoryDocumentStore::new(),
        },
        None => InMemoryDocumentStore::new(),
    };
    let store = Arc::new(store);

    let app = build_router(AppState::new(store.clone()));

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "docbulk started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(manager) = snapshots {
        let snapshot = store.snapshot().await;
        let documents = snapshot.metadata.document_count;
        manager
            .save(&snapshot)
            .with_context(|| format!("failed to save snapshot {}", manager.path().display()))?;
        info!(documents, path = %manager.path().display(), "saved store snapshot");
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
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

    info!("shutdown signal received");
}
