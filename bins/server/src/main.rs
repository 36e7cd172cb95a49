//! Talent Portal Server
//!
//! Main entry point for the talent application backend.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use talent_api::{AppState, create_router};
use talent_core::{talent::TalentDispatcher, upload::UploadFilter};
use talent_shared::{AppConfig, SmtpRelay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "talent_api=debug,talent_core=debug,talent_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Mail relay, built once and shared by every request
    let relay = SmtpRelay::from_config(&config.email).context("Failed to configure mail relay")?;
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Mail relay configured"
    );
    if config.email.admin_email.is_empty() {
        warn!("No admin address configured (EMAIL_ADMIN); submissions will fail to send");
    }
    if config.email.from_email.is_empty() {
        warn!("No sender address configured (EMAIL_USER); submissions will fail to send");
    }

    let uploads =
        UploadFilter::from_config(config.upload.clone()).context("Failed to prepare uploads")?;
    info!(
        dir = %config.upload.dir.display(),
        max_file_size = config.upload.max_file_size,
        retain_after_send = config.upload.retain_after_send,
        "Upload storage ready"
    );

    let dispatcher = TalentDispatcher::new(
        Arc::new(relay),
        config.email.sender(),
        config.email.admin_email.clone(),
    );

    // Create application state
    let state = AppState {
        uploads: Arc::new(uploads),
        dispatcher: Arc::new(dispatcher),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server is running on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
