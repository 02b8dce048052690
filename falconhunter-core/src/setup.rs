//! Setup - starting position definition loaded from JSON

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{Board, INITIAL_LAYOUT};
use crate::error::LayoutError;
use crate::game::Game;
use crate::pieces::Color;

/// Starting position for a game
///
/// Every field is optional in the JSON form; missing fields fall back to the
/// standard opening.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Setup {
    pub name: String,
    /// 64 piece codes, row 0 (rank 1) first; whitespace ignored
    pub layout: String,
    pub turn: Color,
    pub white_lost: u8,
    pub black_lost: u8,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            name: "standard".to_string(),
            layout: INITIAL_LAYOUT.to_string(),
            turn: Color::White,
            white_lost: 0,
            black_lost: 0,
        }
    }
}

impl Setup {
    /// Convert to a fresh game
    pub fn to_game(&self) -> Result<Game, LayoutError> {
        let board = Board::from_layout(&self.layout)?;
        let mut game = Game::from_board(board, self.turn);
        game.set_lost(Color::White, self.white_lost);
        game.set_lost(Color::Black, self.black_lost);
        Ok(game)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read setup file: {}", path.display()))?;
        let setup: Setup = serde_json::from_str(&content)
            .with_context(|| format!("Invalid setup JSON: {}", path.display()))?;

        // Surface layout problems at load time rather than on first use
        Board::from_layout(&setup.layout)
            .with_context(|| format!("Invalid layout in {}", path.display()))?;

        Ok(setup)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
