use std::sync::Arc;

use anyhow::Result;
use navigator_config::RelayConfig;
use navigator_server::{cors_layer, router, ServerState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = RelayConfig::from_env()?;
    if !config.upstream.has_api_key() {
        warn!("IAM_API_KEY not configured: onboarding requests will return an error envelope");
    }
    info!("Upstream: {:?}", config.upstream);
    info!("CORS origins: {}", config.cors.origins.join(", "));

    let cors = cors_layer(&config.cors)?;
    let state = Arc::new(ServerState::new(&config)?);
    let app = router(state, cors);

    let addr = config.server.addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
