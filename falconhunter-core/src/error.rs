//! Error types for the rules engine
//!
//! The boolean command surface (`make_move`, `enter_fairy_piece`) collapses
//! these into `false`; the `try_*` variants hand them to callers that want to
//! report why a command was refused.

use thiserror::Error;

use crate::game::GameState;
use crate::pieces::Color;

/// Square token could not be decoded
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SquareError {
    #[error("malformed square token {0:?} (expected a letter A-H and a digit 1-8)")]
    Malformed(String),

    #[error("square {0:?} is off the board")]
    OffBoard(String),
}

/// Reason a move, drop or forfeit was refused
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("game is over ({0})")]
    GameOver(GameState),

    #[error("source and target are the same square")]
    SameSquare,

    #[error(transparent)]
    Square(#[from] SquareError),

    #[error("no piece on {0}")]
    EmptySource(String),

    #[error("it is {turn}'s turn")]
    WrongTurn { turn: Color },

    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: String, to: String },

    #[error("{0:?} is not a fairy piece code")]
    NotFairyPiece(char),

    #[error("{0} has no captured pieces to trade for a fairy piece")]
    NoCredit(Color),

    #[error("{square} is outside {color}'s back ranks")]
    OutsideBackRanks { color: Color, square: String },

    #[error("{0} is already occupied")]
    SquareOccupied(String),

    #[error("{color} has already placed its {piece}")]
    AlreadyPlaced { color: Color, piece: &'static str },
}

/// Board layout string or setup file is invalid
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout must have 64 squares, found {0}")]
    WrongLength(usize),

    #[error("unknown piece code {code:?} at {square}")]
    UnknownCode { code: char, square: String },
}
