//! InkSign API Server

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use inksign_api::{router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("inksign_api=info".parse()?)
                .add_directive("inksign_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr()?;

    // Initialize application state
    info!("Initializing InkSign API...");
    let state = Arc::new(AppState::new(config).await?);

    let app = router(state);

    info!("Starting InkSign API on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
