use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod db;
mod error;
mod grid;
mod ledger;
mod models;
mod services;
mod session;
mod utils;
mod websocket;

use config::Config;
use constants::{API_VERSION, TOTAL_PIECES};
use db::Database;
use grid::{BaseImage, GridRenderer};
use ledger::SolanaClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solblur_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting SolBlur Backend Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);
    tracing::info!("Solana RPC: {} (testnet: {})", config.solana_rpc_url, config.is_testnet());
    tracing::info!("Payments go to {}", config.target_wallet_address);
    tracing::info!("Grid: {} pieces", TOTAL_PIECES);

    // Initialize database
    let db = Database::new(&config).await?;

    if config.run_migrations {
        tracing::info!("Running database migrations...");
        db.run_migrations().await?;
    }

    let ledger = Arc::new(SolanaClient::new(config.solana_rpc_url.clone()));
    let renderer = GridRenderer::new(
        config
            .base_image_url
            .clone()
            .map(|source| BaseImage { source }),
    );

    let app_state = api::AppState::new(Arc::new(db), ledger, renderer, config.clone());

    // Build router
    let app = build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    // CORS configuration
    let cors = cors_from_config(&state.config);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Wallet gate & session
        .route("/api/v1/wallet/connect", post(api::wallet::connect_wallet))
        .route(
            "/api/v1/wallet/disconnect",
            post(api::wallet::disconnect_wallet),
        )
        .route("/api/v1/wallet/me", get(api::wallet::current_wallet))
        // Grid
        .route("/api/v1/pieces", get(api::pieces::list_pieces))
        .route("/api/v1/pieces/search", get(api::pieces::search_pieces))
        .route("/api/v1/grid.svg", get(api::grid::get_grid_svg))
        // Collection
        .route("/api/v1/gallery", get(api::gallery::get_gallery))
        // Leaderboard
        .route("/api/v1/leaderboard", get(api::leaderboard::get_leaderboard))
        .route(
            "/api/v1/leaderboard/global",
            get(api::leaderboard::get_global_leaderboard),
        )
        // Ledger history
        .route(
            "/api/v1/ledger/recent",
            get(api::ledger::get_recent_ledger_transactions),
        )
        // WebSocket endpoints
        .route("/ws/grid", get(websocket::grid::handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
