use anyhow::Context;
use tracing_subscriber::EnvFilter;

use lms_api_rust::{
    app,
    config::config,
    database::directory_from_config,
    state::AppState,
    tenant::TenantRegistry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    config.validate()?;
    tracing::info!("Starting LMS API in {:?} mode", config.environment);
    if lms_api_rust::is_development!() && std::env::var("JWT_SECRET").is_err() {
        tracing::warn!("JWT_SECRET not set; using the development session secret");
    }

    let directory = directory_from_config(&config.directory, &config.database).context("directory backend")?;
    let tenants = TenantRegistry::from_config(&config.tenancy).context("tenant registry")?;
    if tenants.is_empty() {
        tracing::info!("No tenants configured; every host runs in default mode");
    }

    let state = AppState::new(directory.clone(), tenants, config.security.session.clone())
        .trusting_forwarded_host(config.security.trust_forwarded_host);
    let router = app::router(state, &config.security.cors_origins);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("LMS API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server")?;

    directory.close().await;
    tracing::info!("LMS API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
