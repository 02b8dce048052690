//! Serve command - expose one game over the HTTP API
//!
//! The first game starts from `--setup` (standard opening otherwise); clients
//! can replace it later through `POST /api/game/new`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use falconhunter_core::Setup;
use falconhunter_server::{run_server, ServerConfig};

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Starting position JSON file for the first game
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Directory with a browser front end; without it only the API is served
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,
}

impl ServerArgs {
    /// Resolve arguments into a server configuration, loading the setup file
    fn to_config(&self) -> Result<ServerConfig> {
        let setup = match &self.setup {
            Some(path) => Setup::load(path)?,
            None => Setup::default(),
        };

        if let Some(dir) = &self.static_dir {
            check_static_dir(dir)?;
        }

        Ok(ServerConfig {
            port: self.port,
            static_dir: self.static_dir.clone(),
            setup,
        })
    }
}

/// Run serve command (blocks until the server stops)
pub fn run(args: ServerArgs) -> Result<()> {
    let config = args.to_config()?;

    tracing::info!(
        "Serving game '{}' ({} to move) on port {}",
        config.setup.name,
        config.setup.turn,
        config.port
    );

    tokio::runtime::Runtime::new()
        .context("Failed to start async runtime")?
        .block_on(run_server(config))
}

fn check_static_dir(dir: &Path) -> Result<()> {
    let meta = std::fs::metadata(dir)
        .with_context(|| format!("Static directory not found: {}", dir.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("Static path is not a directory: {}", dir.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use falconhunter_core::Color;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("falconhunter-serve-{}-{}", tag, std::process::id()))
    }

    fn args() -> ServerArgs {
        ServerArgs {
            port: 8003,
            setup: None,
            static_dir: None,
        }
    }

    #[test]
    fn test_defaults_serve_standard_game_api_only() {
        let config = args().to_config().unwrap();
        assert_eq!(config.port, 8003);
        assert_eq!(config.static_dir, None);
        assert_eq!(config.setup, Setup::default());
    }

    #[test]
    fn test_setup_file_is_loaded() {
        let path = temp_path("setup.json");
        let setup = Setup {
            name: "black-first".to_string(),
            turn: Color::Black,
            black_lost: 1,
            ..Setup::default()
        };
        setup.save(&path).unwrap();

        let config = ServerArgs { setup: Some(path.clone()), ..args() }.to_config();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.unwrap().setup, setup);
    }

    #[test]
    fn test_bad_setup_file_is_an_error() {
        let path = temp_path("bad.json");
        std::fs::write(&path, r#"{"layout": "RNBQ"}"#).unwrap();

        let result = ServerArgs { setup: Some(path.clone()), ..args() }.to_config();
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());

        let missing = ServerArgs { setup: Some(temp_path("missing.json")), ..args() };
        assert!(missing.to_config().is_err());
    }

    #[test]
    fn test_static_dir_must_be_a_directory() {
        let dir = std::env::temp_dir();
        let config = ServerArgs { static_dir: Some(dir.clone()), ..args() }.to_config().unwrap();
        assert_eq!(config.static_dir, Some(dir));

        let file = temp_path("static");
        std::fs::write(&file, "not a directory").unwrap();
        let result = ServerArgs { static_dir: Some(file.clone()), ..args() }.to_config();
        std::fs::remove_file(&file).ok();
        assert!(result.is_err());

        let missing = ServerArgs { static_dir: Some(temp_path("nowhere")), ..args() };
        assert!(missing.to_config().is_err());
    }
}
