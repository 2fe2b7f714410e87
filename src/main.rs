use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use animal_vision::{router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("animal_vision=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    std::fs::create_dir_all(&config.upload_dir).with_context(|| {
        format!("failed to create upload dir {}", config.upload_dir.display())
    })?;

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "animal-vision listening");

    axum::serve(listener, app).await?;
    Ok(())
}
