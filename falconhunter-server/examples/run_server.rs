//! Serve one game over HTTP without the CLI
//!
//! Run with: cargo run -p falconhunter-server --example run_server [SETUP.json]

use std::path::Path;

use falconhunter_core::Setup;
use falconhunter_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let setup = match std::env::args().nth(1) {
        Some(path) => Setup::load(Path::new(&path))?,
        None => Setup::default(),
    };
    let config = ServerConfig {
        setup,
        ..ServerConfig::default()
    };

    println!("Setup '{}', {} to move", config.setup.name, config.setup.turn);
    println!("Game state at http://localhost:{}/api/game", config.port);

    run_server(config).await
}
