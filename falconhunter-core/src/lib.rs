//! Falcon-Hunter Core - Rules engine
//!
//! This crate provides the game logic for Falcon-Hunter chess:
//! - Square notation and the 8x8 occupant grid
//! - Piece types and movement rules, including the Falcon and Hunter
//! - Game state, capture bookkeeping and fairy-piece drops
//! - Starting positions loaded from JSON

pub mod board;
pub mod error;
pub mod pieces;
pub mod game;
pub mod setup;

// Re-exports for convenient access
pub use board::{is_on_board, to_indices, to_notation, Board, Square, BOARD_SIZE, EMPTY_CODE, INITIAL_LAYOUT};
pub use error::{LayoutError, RuleError, SquareError};
pub use pieces::{Color, Occupant, Piece, PieceKind};
pub use game::{FairyReserve, Game, GameState, MoveOutcome, Snapshot};
pub use setup::Setup;
