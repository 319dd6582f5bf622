mod config;
mod errors;
mod export;
mod layout;
mod models;
mod presentation;
mod routes;
mod source;
mod state;
mod workflow;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::PrintPdfExporter;
use crate::layout::default_page_config;
use crate::presentation::LayoutPresenter;
use crate::routes::build_router;
use crate::source::{RandomUserSource, ResumeSource, SourceBackend, SyntheticSource};
use crate::state::AppState;
use crate::workflow::{NotificationLog, WorkflowController};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Generator API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize resume source
    let source = build_source(&config)?;
    let resume_source = source.backend_name();
    info!("Resume source initialized (backend: {resume_source})");

    // Initialize export directory
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create output dir {}", config.output_dir.display()))?;
    info!("Exporting PDFs to {}", config.output_dir.display());

    // Page config: US letter, 0.75" margins, Helvetica 10.5pt body
    let page_config = default_page_config();
    let presentation = Arc::new(LayoutPresenter::new(page_config.clone()));
    let exporter = Arc::new(PrintPdfExporter::new(config.output_dir.clone()));
    let notifications = Arc::new(NotificationLog::new(config.notification_history));

    let controller = WorkflowController::new(
        source,
        presentation,
        exporter,
        notifications.clone(),
        config.default_resume_count,
    );
    info!(
        "Workflow ready (default count: {})",
        controller.requested_count()
    );

    // Build app state
    let state = AppState {
        controller,
        notifications,
        page_config,
        resume_source,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the `ResumeSource` backend named by `RESUME_SOURCE`.
fn build_source(config: &Config) -> Result<Arc<dyn ResumeSource>> {
    let source: Arc<dyn ResumeSource> = match config.resume_source {
        SourceBackend::RandomUser => Arc::new(
            RandomUserSource::new(
                config.random_user_url.clone(),
                Duration::from_secs(config.http_timeout_secs),
            )
            .context("Failed to build random user HTTP client")?,
        ),
        SourceBackend::Synthetic => match config.synthetic_seed {
            Some(seed) => Arc::new(SyntheticSource::seeded(seed)),
            None => Arc::new(SyntheticSource::new()),
        },
    };
    Ok(source)
}
