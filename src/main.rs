//! Payroll engine HTTP server.

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::{ConfigLoader, ServerSettings};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ServerSettings::from_env()?;
    let config = ConfigLoader::load(&settings.config_dir)?;
    info!(
        config_dir = %settings.config_dir.display(),
        tiers = config.config().insurance_tiers().len(),
        "Loaded payroll configuration"
    );

    let router = create_router(AppState::in_memory(config));
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, "Payroll engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}
