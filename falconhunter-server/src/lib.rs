//! Falcon-Hunter Server - HTTP API for renderers
//!
//! This crate wraps a single game behind a lock so network clients can
//! drive it:
//! - REST API for moves, drops, forfeits and board queries
//! - Static file serving for a browser front end

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use falconhunter_core::Setup;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Browser front end served for non-API paths; API only when `None`
    pub static_dir: Option<PathBuf>,
    /// Position the first game starts from
    pub setup: Setup,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            static_dir: None,
            setup: Setup::default(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let router = Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Game API
        .route("/api/game", get(routes::game::get_game))
        .route("/api/game/new", post(routes::game::new_game))
        .route("/api/game/move", post(routes::game::make_move))
        .route("/api/game/fairy", post(routes::game::enter_fairy_piece))
        .route("/api/game/forfeit", post(routes::game::forfeit))
        // Square lookup
        .route("/api/square/:square", get(routes::board::get_square))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive());

    match &config.static_dir {
        // Static file serving (must be last)
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// Start the HTTP server with a game built from `config.setup`
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let game = config.setup.to_game()?;
    let state = Arc::new(ServerState::with_game(game));
    let router = create_router(&config, state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("Falcon-Hunter server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("First game from setup '{}'", config.setup.name);
    match &config.static_dir {
        Some(dir) => tracing::info!("Static files served from: {}", dir.display()),
        None => tracing::info!("No static directory, serving the API only"),
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
