use std::sync::Arc;

use anyhow::Context;
use chat_edge::{AppState, Config, routes};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_edge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("UPSTREAM_API_KEY is not set; chat requests will fail");
    }

    let addr = config.bind_addr();
    tracing::info!(upstream = %config.upstream_url, model = %config.model, "starting chat edge");

    let state = Arc::new(AppState::new(config).context("building upstream client")?);
    let app = routes::create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!("chat edge listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
