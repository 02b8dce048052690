//! Server state management
//!
//! The engine does no locking of its own, so every mutating request takes
//! the write lock for the whole command.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use falconhunter_core::Game;

/// Server-wide shared state
pub struct ServerState {
    game: RwLock<Game>,
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_game(Game::new())
    }

    pub fn with_game(game: Game) -> Self {
        Self {
            game: RwLock::new(game),
        }
    }

    // Engine commands never leave a half-applied state, so a poisoned lock
    // still guards a consistent game.
    pub fn read(&self) -> RwLockReadGuard<'_, Game> {
        self.game.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Game> {
        self.game.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
