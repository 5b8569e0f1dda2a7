mod api;
mod config;
mod error;
mod fixtures;
mod leaderboard;
mod models;
mod ranks;
mod views;

use anyhow::Context;
use api::ApiClient;
use axum::{
    routing::{get, post},
    Router,
};
use config::Config;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

/// Shared application state
pub struct AppState {
    pub api: ApiClient,
    pub config: Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().context("Invalid configuration")?;
    let api = ApiClient::new(&config.api_url, config.api_timeout)
        .context("Failed to build the club API client")?;
    tracing::info!("Using club API at {}", api.base_url());

    let addr = config.listen_addr();
    let assets = ServeDir::new(&config.assets_dir);
    let state = Arc::new(AppState { api, config });

    let router = Router::new()
        // Pages
        .route("/", get(views::home::page))
        .route("/roster", get(views::roster::page))
        .route("/history", get(views::history::page))
        .route("/fixtures", get(views::fixtures::page))
        .route("/analytics", get(views::analytics::page))
        .route("/ranks", get(views::ranks::page))
        .route("/calendar", get(views::calendar::page))
        // Roster
        .route("/roster/search", get(views::roster::search))
        .route("/roster/players", post(views::roster::create_player))
        // History
        .route("/history/search", get(views::history::search))
        // Fixtures
        .route("/fixtures/rounds", post(views::fixtures::feasible_rounds))
        .route("/fixtures/generate", post(views::fixtures::generate))
        .route("/fixtures/score", post(views::fixtures::submit_score))
        // Analytics
        .route("/analytics/search", get(views::analytics::search))
        .route("/analytics/refresh", post(views::analytics::refresh))
        .route("/analytics/players/{id}", get(views::analytics::player_details))
        // Calendar
        .route("/calendar/events", post(views::calendar::add_event))
        .nest_service("/assets", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}
