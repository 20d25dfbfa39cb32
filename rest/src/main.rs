mod config;
mod constants;
mod domain;
mod models;
mod routes;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use config::Config;
use domain::feed::FeedOptions;
use services::youtube::{CatalogApi, YouTubeClient};

/// Shared by every request. Holds no per-user state.
pub struct AppState {
    pub youtube: Box<dyn CatalogApi>,
    pub feed: FeedOptions,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("subbox_rest=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let youtube = YouTubeClient::new(
        &config.youtube.api_key,
        &config.youtube.base_url,
        config.youtube.request_timeout,
    )?;

    let state = Arc::new(AppState {
        youtube: Box::new(youtube),
        feed: config.feed.clone(),
    });

    let app = routes::build_routes(config.rate_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(
        %addr,
        max_subscriptions = config.feed.max_subscriptions,
        feed_concurrency = config.feed.concurrency,
        rate_limited = config.rate_limit.is_some(),
        "Listening"
    );

    // Peer addresses feed the rate limiter's key extractor
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
