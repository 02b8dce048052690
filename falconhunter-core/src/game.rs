//! Game state, move/drop commands and win detection

use std::fmt;

use serde::Serialize;

use crate::board::{Board, Square};
use crate::error::{LayoutError, RuleError};
use crate::pieces::{Color, Occupant, Piece, PieceKind};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result; both won states are terminal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    InProgress,
    WhiteWon,
    BlackWon,
}

impl GameState {
    pub fn is_over(self) -> bool {
        self != GameState::InProgress
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameState::InProgress => None,
            GameState::WhiteWon => Some(Color::White),
            GameState::BlackWon => Some(Color::Black),
        }
    }

    fn won_by(color: Color) -> Self {
        match color {
            Color::White => GameState::WhiteWon,
            Color::Black => GameState::BlackWon,
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::InProgress => f.write_str("IN_PROGRESS"),
            GameState::WhiteWon => f.write_str("WHITE_WON"),
            GameState::BlackWon => f.write_str("BLACK_WON"),
        }
    }
}

/// Which fairy pieces each side has already dropped
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FairyReserve {
    pub white_falcon: bool,
    pub white_hunter: bool,
    pub black_falcon: bool,
    pub black_hunter: bool,
}

impl FairyReserve {
    /// True once `(color, kind)` has been placed; non-fairy kinds are never placed
    pub fn is_placed(&self, color: Color, kind: PieceKind) -> bool {
        match (color, kind) {
            (Color::White, PieceKind::Falcon) => self.white_falcon,
            (Color::White, PieceKind::Hunter) => self.white_hunter,
            (Color::Black, PieceKind::Falcon) => self.black_falcon,
            (Color::Black, PieceKind::Hunter) => self.black_hunter,
            _ => false,
        }
    }

    fn mark_placed(&mut self, color: Color, kind: PieceKind) {
        let flag = match (color, kind) {
            (Color::White, PieceKind::Falcon) => &mut self.white_falcon,
            (Color::White, PieceKind::Hunter) => &mut self.white_hunter,
            (Color::Black, PieceKind::Falcon) => &mut self.black_falcon,
            (Color::Black, PieceKind::Hunter) => &mut self.black_hunter,
            _ => return,
        };
        *flag = true;
    }
}

/// Result of an accepted move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
    pub state: GameState,
}

/// Full read-only view for renderers
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub state: GameState,
    pub turn: Color,
    /// Piece codes per rank, rank 8 first
    pub ranks: Vec<String>,
    pub white_lost: u8,
    pub black_lost: u8,
    pub reserve: FairyReserve,
}

// ============================================================================
// GAME
// ============================================================================

/// One Falcon-Hunter game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
    state: GameState,
    /// Captured non-pawn pieces per color, indexed by `Color::index`
    lost: [u8; 2],
    reserve: FairyReserve,
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New game in the standard starting position
    pub fn new() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    /// New game from a 64-character layout (row 0 first, `.` for empty)
    pub fn with_layout(layout: &str, turn: Color) -> Result<Self, LayoutError> {
        Ok(Self::from_board(Board::from_layout(layout)?, turn))
    }

    pub(crate) fn from_board(board: Board, turn: Color) -> Self {
        Self {
            board,
            turn,
            state: GameState::InProgress,
            lost: [0, 0],
            reserve: FairyReserve::default(),
        }
    }

    pub(crate) fn set_lost(&mut self, color: Color, count: u8) {
        self.lost[color.index()] = count;
    }

    /// Reset to the standard starting position
    pub fn initialize(&mut self) {
        *self = Self::new();
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn game_state(&self) -> GameState {
        self.state
    }

    /// Side to move
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of `color`'s non-pawn pieces captured and not yet traded for a
    /// fairy piece
    pub fn lost(&self, color: Color) -> u8 {
        self.lost[color.index()]
    }

    pub fn fairy_placed(&self, color: Color, kind: PieceKind) -> bool {
        self.reserve.is_placed(color, kind)
    }

    /// Occupant of the square named by `token`
    pub fn search(&self, token: &str) -> Result<Occupant, RuleError> {
        let square = Square::parse(token)?;
        Ok(self.board.get(square).copied().unwrap_or(Occupant::Empty))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            turn: self.turn,
            ranks: self.board.ranks(),
            white_lost: self.lost(Color::White),
            black_lost: self.lost(Color::Black),
            reserve: self.reserve,
        }
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// Move a piece; `false` and no change if the move is refused
    pub fn make_move(&mut self, from: &str, to: &str) -> bool {
        match self.try_move(from, to) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!("Rejected move {} -> {}: {}", from, to, err);
                false
            }
        }
    }

    /// Move a piece, reporting why a refused move was refused
    ///
    /// All checks run before the first write, so an error leaves the game
    /// untouched.
    pub fn try_move(&mut self, from: &str, to: &str) -> Result<MoveOutcome, RuleError> {
        if from.eq_ignore_ascii_case(to) {
            return Err(RuleError::SameSquare);
        }
        self.ensure_in_progress()?;

        let from_sq = Square::parse(from)?;
        let to_sq = Square::parse(to)?;

        let mut piece = match self.board.get(from_sq) {
            Some(Occupant::Piece(piece)) => *piece,
            _ => return Err(RuleError::EmptySource(from_sq.to_string())),
        };
        if piece.color != self.turn {
            return Err(RuleError::WrongTurn { turn: self.turn });
        }
        if !piece.is_legal_move(&self.board, to_sq) {
            return Err(RuleError::IllegalMove {
                from: from_sq.to_string(),
                to: to_sq.to_string(),
            });
        }

        let captured = self.board.get(to_sq).and_then(Occupant::piece).copied();

        piece.position = to_sq;
        piece.first_move = false;
        self.board.set(to_sq, Occupant::Piece(piece));
        self.board.set(from_sq, Occupant::Empty);

        tracing::info!("{} {} {} -> {}", piece.color, piece.kind.name(), from_sq, to_sq);

        if let Some(victim) = captured {
            self.record_capture(&victim);
            if victim.kind == PieceKind::King {
                self.state = GameState::won_by(piece.color);
                tracing::info!("{} king captured on {}: {}", victim.color, to_sq, self.state);
            }
        }

        if !self.state.is_over() {
            self.turn = self.turn.opponent();
        }

        Ok(MoveOutcome {
            from: from_sq,
            to: to_sq,
            captured,
            state: self.state,
        })
    }

    /// Capturing a non-pawn credits the victim's own side with a drop
    fn record_capture(&mut self, victim: &Piece) {
        if victim.kind != PieceKind::Pawn {
            let lost = &mut self.lost[victim.color.index()];
            *lost = lost.saturating_add(1);
        }
    }

    // ========================================================================
    // FAIRY DROPS
    // ========================================================================

    /// Drop a Falcon (`F`/`f`) or Hunter (`H`/`h`); `false` and no change if
    /// the drop is refused
    pub fn enter_fairy_piece(&mut self, code: char, to: &str) -> bool {
        match self.try_enter_fairy_piece(code, to) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!("Rejected drop {} on {}: {}", code, to, err);
                false
            }
        }
    }

    /// Drop a fairy piece, reporting why a refused drop was refused
    pub fn try_enter_fairy_piece(&mut self, code: char, to: &str) -> Result<Square, RuleError> {
        self.ensure_in_progress()?;

        let (kind, color) = PieceKind::from_code(code)
            .filter(|(kind, _)| kind.is_fairy())
            .ok_or(RuleError::NotFairyPiece(code))?;
        let square = Square::parse(to)?;

        if !self.board.is_empty(square) {
            return Err(RuleError::SquareOccupied(square.to_string()));
        }
        if color != self.turn {
            return Err(RuleError::WrongTurn { turn: self.turn });
        }
        if self.lost(color) == 0 {
            return Err(RuleError::NoCredit(color));
        }
        if !color.is_back_rank(square.row) {
            return Err(RuleError::OutsideBackRanks {
                color,
                square: square.to_string(),
            });
        }
        if self.reserve.is_placed(color, kind) {
            return Err(RuleError::AlreadyPlaced {
                color,
                piece: kind.name(),
            });
        }

        self.board.set(square, Occupant::Piece(Piece::new(kind, color, square)));
        self.lost[color.index()] -= 1;
        self.reserve.mark_placed(color, kind);
        self.turn = self.turn.opponent();

        tracing::info!("{} {} dropped on {}", color, kind.name(), square);

        Ok(square)
    }

    // ========================================================================
    // FORCED RESULT
    // ========================================================================

    /// End the game as a loss for `loser` (e.g. on clock expiry)
    pub fn forfeit(&mut self, loser: Color) -> bool {
        match self.try_forfeit(loser) {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!("Rejected forfeit by {}: {}", loser, err);
                false
            }
        }
    }

    pub fn try_forfeit(&mut self, loser: Color) -> Result<GameState, RuleError> {
        self.ensure_in_progress()?;
        self.state = GameState::won_by(loser.opponent());
        tracing::info!("{} forfeits: {}", loser, self.state);
        Ok(self.state)
    }

    fn ensure_in_progress(&self) -> Result<(), RuleError> {
        if self.state.is_over() {
            return Err(RuleError::GameOver(self.state));
        }
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SquareError;

    /// Game from rank strings listed rank 8 first
    fn game_from(ranks: [&str; 8], turn: Color) -> Game {
        let layout: String = ranks.iter().rev().copied().collect();
        Game::with_layout(&layout, turn).unwrap()
    }

    fn kind_at(game: &Game, token: &str) -> Option<(PieceKind, Color)> {
        game.search(token).unwrap().piece().map(|p| (p.kind, p.color))
    }

    #[test]
    fn test_game_creation() {
        let game = Game::new();
        assert_eq!(game.game_state(), GameState::InProgress);
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.board().count(Color::White), 16);
        assert_eq!(game.board().count(Color::Black), 16);
        assert_eq!(game.lost(Color::White), 0);
        assert_eq!(game.lost(Color::Black), 0);
        assert_eq!(kind_at(&game, "E1"), Some((PieceKind::King, Color::White)));
        assert_eq!(kind_at(&game, "e8"), Some((PieceKind::King, Color::Black)));
        for color in [Color::White, Color::Black] {
            assert!(!game.fairy_placed(color, PieceKind::Falcon));
            assert!(!game.fairy_placed(color, PieceKind::Hunter));
        }
    }

    #[test]
    fn test_pawn_double_step_then_wrong_turn() {
        let mut game = Game::new();
        assert!(game.make_move("D2", "D4"));
        assert_eq!(game.turn(), Color::Black);
        assert!(game.search("D2").unwrap().is_empty());

        let before = game.clone();
        assert_eq!(
            game.try_move("D4", "D5"),
            Err(RuleError::WrongTurn { turn: Color::Black })
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_same_square_always_fails() {
        let mut game = Game::new();
        assert_eq!(game.try_move("e2", "E2"), Err(RuleError::SameSquare));
        assert!(!game.make_move("Z9", "Z9"));
        game.forfeit(Color::White);
        assert_eq!(game.try_move("A1", "A1"), Err(RuleError::SameSquare));
    }

    #[test]
    fn test_rejections_leave_game_unchanged() {
        let mut game = Game::new();
        let before = game.clone();

        assert!(matches!(
            game.try_move("E2", "E9"),
            Err(RuleError::Square(SquareError::OffBoard(_)))
        ));
        assert!(matches!(
            game.try_move("E2", "xx"),
            Err(RuleError::Square(SquareError::Malformed(_)))
        ));
        assert!(matches!(game.try_move("E4", "E5"), Err(RuleError::EmptySource(_))));
        assert!(matches!(game.try_move("E2", "E5"), Err(RuleError::IllegalMove { .. })));
        assert!(matches!(game.try_move("A1", "A3"), Err(RuleError::IllegalMove { .. })));
        assert!(matches!(game.try_move("E7", "E5"), Err(RuleError::WrongTurn { .. })));

        assert_eq!(game, before);
    }

    #[test]
    fn test_first_move_flag_cleared() {
        let mut game = Game::new();
        assert!(game.make_move("E2", "E3"));
        assert!(game.make_move("A7", "A6"));
        let pawn = *game.search("E3").unwrap().piece().unwrap();
        assert!(!pawn.first_move);
        assert_eq!(pawn.position, Square::parse("E3").unwrap());
        assert!(!game.make_move("E3", "E5"), "double step only on first move");
        assert!(game.make_move("E3", "E4"));
    }

    #[test]
    fn test_capture_counts_victim_non_pawns_only() {
        let mut game = game_from(
            [
                "....k...",
                "........",
                "........",
                "...n.p..",
                "....Q...",
                "........",
                "........",
                "....K...",
            ],
            Color::White,
        );

        let outcome = game.try_move("E4", "F5").unwrap();
        assert_eq!(outcome.captured.map(|p| p.kind), Some(PieceKind::Pawn));
        assert_eq!(game.lost(Color::Black), 0, "pawns never grant credit");

        assert!(game.make_move("D5", "F4"), "black knight takes nothing yet");
        assert!(game.make_move("F5", "F4"), "queen takes knight");
        assert_eq!(game.lost(Color::Black), 1);
        assert_eq!(game.lost(Color::White), 0);
    }

    #[test]
    fn test_king_capture_ends_game() {
        let mut game = game_from(
            [
                "....k...",
                "....R...",
                "........",
                "........",
                "........",
                "........",
                "........",
                "....K...",
            ],
            Color::White,
        );

        let outcome = game.try_move("E7", "E8").unwrap();
        assert_eq!(outcome.state, GameState::WhiteWon);
        assert_eq!(game.game_state(), GameState::WhiteWon);
        assert_eq!(game.turn(), Color::White, "turn does not flip after the win");

        let before = game.clone();
        assert_eq!(game.try_move("E8", "E7"), Err(RuleError::GameOver(GameState::WhiteWon)));
        assert!(!game.enter_fairy_piece('h', "A8"));
        assert!(!game.forfeit(Color::White));
        assert_eq!(game, before);
    }

    #[test]
    fn test_fairy_drop_rules() {
        let mut game = game_from(
            [
                "....k...",
                "........",
                "........",
                "........",
                "........",
                "........",
                "........",
                "R...K...",
            ],
            Color::White,
        );

        assert_eq!(game.try_enter_fairy_piece('H', "B1"), Err(RuleError::NoCredit(Color::White)));
        game.set_lost(Color::White, 2);
        game.set_lost(Color::Black, 1);

        assert_eq!(game.try_enter_fairy_piece('Q', "B1"), Err(RuleError::NotFairyPiece('Q')));
        assert!(matches!(game.try_enter_fairy_piece('H', "A1"), Err(RuleError::SquareOccupied(_))));
        assert!(matches!(game.try_enter_fairy_piece('H', "B3"), Err(RuleError::OutsideBackRanks { .. })));
        assert!(matches!(game.try_enter_fairy_piece('h', "B8"), Err(RuleError::WrongTurn { .. })));
        assert!(matches!(game.try_enter_fairy_piece('H', "J1"), Err(RuleError::Square(_))));

        assert!(game.enter_fairy_piece('H', "B2"));
        assert_eq!(game.lost(Color::White), 1);
        assert!(game.fairy_placed(Color::White, PieceKind::Hunter));
        assert_eq!(kind_at(&game, "B2"), Some((PieceKind::Hunter, Color::White)));
        assert_eq!(game.turn(), Color::Black);

        assert!(matches!(game.try_enter_fairy_piece('f', "C6"), Err(RuleError::OutsideBackRanks { .. })));
        assert!(game.enter_fairy_piece('f', "C7"));
        assert_eq!(game.lost(Color::Black), 0);

        assert_eq!(
            game.try_enter_fairy_piece('H', "C1"),
            Err(RuleError::AlreadyPlaced { color: Color::White, piece: "Hunter" })
        );
        assert!(game.enter_fairy_piece('F', "C1"), "the other fairy piece is still in reserve");
        assert_eq!(game.lost(Color::White), 0);
    }

    #[test]
    fn test_forfeit() {
        let mut game = Game::new();
        assert!(game.forfeit(Color::Black));
        assert_eq!(game.game_state(), GameState::WhiteWon);
        assert_eq!(game.game_state().winner(), Some(Color::White));
        assert!(!game.make_move("E2", "E4"));
    }

    #[test]
    fn test_snapshot() {
        let mut game = Game::new();
        game.make_move("E2", "E4");
        let snap = game.snapshot();
        assert_eq!(snap.turn, Color::Black);
        assert_eq!(snap.ranks[4], "....P...");
        assert_eq!(snap.ranks[6], "PPPP.PPP");

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["state"], "IN_PROGRESS");
        assert_eq!(json["turn"], "Black");
    }

    #[test]
    fn test_initialize_resets() {
        let mut game = Game::new();
        game.make_move("E2", "E4");
        game.forfeit(Color::White);
        game.initialize();
        assert_eq!(game, Game::new());
    }
}
