use std::sync::Arc;

use anyhow::Context;

use battstock_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    battstock_observability::init(config.log_format);

    if config.database_url.is_none() {
        tracing::warn!("DATABASE_URL not set; using an empty in-memory store");
    }

    let services = battstock_api::app::services::build_services(&config)
        .await
        .context("failed to open record store")?;
    let app = battstock_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
