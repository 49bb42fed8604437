use std::path::Path;
use std::sync::Arc;

use cinematch_api::{
    api::{create_router, AppState},
    config::Config,
    data,
    services::{providers::tmdb::TmdbProvider, RecommendationService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Fetch the similarity artifact on first run
    let similarity_path = Path::new(&config.similarity_path);
    if let Some(url) = &config.similarity_url {
        let download_client = reqwest::Client::new();
        data::ensure_artifact(&download_client, url, similarity_path).await?;
    }

    // Load the static artifacts; any failure here is fatal for the session
    let catalog = Arc::new(data::load_catalog(Path::new(&config.catalog_path)).await?);
    let matrix = Arc::new(data::load_similarity(similarity_path).await?);
    data::validate_consistency(&catalog, &matrix)?;

    let provider = Arc::new(TmdbProvider::new(&config)?);
    let recommender = RecommendationService::new(catalog.clone(), matrix, provider);
    let state = AppState::new(catalog, recommender, config.poster_placeholder_url.clone());

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
