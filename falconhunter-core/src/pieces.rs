//! Piece definitions and movement rules
//!
//! Every legality check is a pure function of the mover's own position and
//! color plus read-only lookups on the board.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Square, EMPTY_CODE};

// ============================================================================
// COLOR
// ============================================================================

/// Side to play
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row direction pawns and fairy pieces treat as forward
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// True if `row` is one of this side's two starting rows
    pub fn is_back_rank(self, row: i8) -> bool {
        match self {
            Color::White => (0..=1).contains(&row),
            Color::Black => (6..=7).contains(&row),
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("White"),
            Color::Black => f.write_str("Black"),
        }
    }
}

// ============================================================================
// PIECE KINDS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PieceKind {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
    Falcon,
    Hunter,
}

impl PieceKind {
    /// Upper-case piece letter
    pub fn code(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Rook => 'R',
            PieceKind::Pawn => 'P',
            PieceKind::Falcon => 'F',
            PieceKind::Hunter => 'H',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceKind::King => "King",
            PieceKind::Queen => "Queen",
            PieceKind::Bishop => "Bishop",
            PieceKind::Knight => "Knight",
            PieceKind::Rook => "Rook",
            PieceKind::Pawn => "Pawn",
            PieceKind::Falcon => "Falcon",
            PieceKind::Hunter => "Hunter",
        }
    }

    /// Falcon and Hunter start in reserve rather than on the board
    pub fn is_fairy(self) -> bool {
        matches!(self, PieceKind::Falcon | PieceKind::Hunter)
    }

    /// Decode a piece letter; upper case is White, lower case Black
    pub fn from_code(code: char) -> Option<(PieceKind, Color)> {
        let color = if code.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match code.to_ascii_uppercase() {
            'K' => PieceKind::King,
            'Q' => PieceKind::Queen,
            'B' => PieceKind::Bishop,
            'N' => PieceKind::Knight,
            'R' => PieceKind::Rook,
            'P' => PieceKind::Pawn,
            'F' => PieceKind::Falcon,
            'H' => PieceKind::Hunter,
            _ => return None,
        };
        Some((kind, color))
    }
}

/// Knight jump offsets (row, col)
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1), (1, 2), (-1, 2), (-2, 1),
    (-2, -1), (-1, -2), (1, -2), (2, -1),
];

// ============================================================================
// PIECE / OCCUPANT
// ============================================================================

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Square,
    /// Cleared after the piece's first completed move; only pawns consult it
    pub first_move: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, position: Square) -> Self {
        Self {
            kind,
            color,
            position,
            first_move: true,
        }
    }

    pub fn from_code(code: char, position: Square) -> Option<Self> {
        PieceKind::from_code(code).map(|(kind, color)| Piece::new(kind, color, position))
    }

    /// Piece letter, upper case for White
    pub fn code(&self) -> char {
        let code = self.kind.code();
        match self.color {
            Color::White => code,
            Color::Black => code.to_ascii_lowercase(),
        }
    }

    /// Check whether this piece may move to `target` on `board`
    pub fn is_legal_move(&self, board: &Board, target: Square) -> bool {
        if !target.is_valid() || target == self.position {
            return false;
        }

        match self.kind {
            PieceKind::King => self.king_step(board, target),
            PieceKind::Knight => self.knight_jump(board, target),
            PieceKind::Rook => self.rook_slide(board, target),
            PieceKind::Bishop => self.bishop_slide(board, target),
            PieceKind::Queen => self.rook_slide(board, target) || self.bishop_slide(board, target),
            PieceKind::Pawn => self.pawn_move(board, target),
            PieceKind::Falcon => match self.heading(target) {
                Heading::Forward => self.bishop_slide(board, target),
                Heading::Backward => self.rook_slide(board, target),
                Heading::Lateral => false,
            },
            PieceKind::Hunter => match self.heading(target) {
                Heading::Forward => self.rook_slide(board, target),
                Heading::Backward => self.bishop_slide(board, target),
                Heading::Lateral => false,
            },
        }
    }

    // ========================================================================
    // MOVEMENT HELPERS
    // ========================================================================

    /// Destination is empty or holds an enemy
    fn can_land(&self, board: &Board, target: Square) -> bool {
        board.color_at(target) != Some(self.color)
    }

    fn king_step(&self, board: &Board, target: Square) -> bool {
        let dr = (target.row - self.position.row).abs();
        let dc = (target.col - self.position.col).abs();
        dr <= 1 && dc <= 1 && self.can_land(board, target)
    }

    fn knight_jump(&self, board: &Board, target: Square) -> bool {
        let dr = target.row - self.position.row;
        let dc = target.col - self.position.col;
        KNIGHT_OFFSETS.contains(&(dr, dc)) && self.can_land(board, target)
    }

    fn rook_slide(&self, board: &Board, target: Square) -> bool {
        let dr = target.row - self.position.row;
        let dc = target.col - self.position.col;
        if (dr == 0) == (dc == 0) {
            return false;
        }
        self.path_clear(board, target, dr.signum(), dc.signum()) && self.can_land(board, target)
    }

    fn bishop_slide(&self, board: &Board, target: Square) -> bool {
        let dr = target.row - self.position.row;
        let dc = target.col - self.position.col;
        if dr == 0 || dr.abs() != dc.abs() {
            return false;
        }
        self.path_clear(board, target, dr.signum(), dc.signum()) && self.can_land(board, target)
    }

    /// Every square strictly between position and target is empty
    fn path_clear(&self, board: &Board, target: Square, step_r: i8, step_c: i8) -> bool {
        let mut current = self.position.offset(step_r, step_c);
        while current != target {
            if !board.is_empty(current) {
                return false;
            }
            current = current.offset(step_r, step_c);
        }
        true
    }

    fn pawn_move(&self, board: &Board, target: Square) -> bool {
        let forward = self.color.forward();
        let dr = target.row - self.position.row;
        let dc = target.col - self.position.col;

        match (dc.abs(), dr) {
            (0, dr) if dr == forward => board.is_empty(target),
            (0, dr) if dr == 2 * forward => {
                self.first_move
                    && board.is_empty(self.position.offset(forward, 0))
                    && board.is_empty(target)
            }
            (1, dr) if dr == forward => board.color_at(target) == Some(self.color.opponent()),
            _ => false,
        }
    }

    fn heading(&self, target: Square) -> Heading {
        let dr = (target.row - self.position.row) * self.color.forward();
        match dr.signum() {
            1 => Heading::Forward,
            -1 => Heading::Backward,
            _ => Heading::Lateral,
        }
    }
}

/// Direction of a move relative to the mover's side
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heading {
    Forward,
    Backward,
    Lateral,
}

/// Content of one board cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupant {
    Empty,
    Piece(Piece),
}

impl Occupant {
    /// `None` for an empty square, so it never matches either side
    pub fn color(&self) -> Option<Color> {
        self.piece().map(|p| p.color)
    }

    pub fn piece(&self) -> Option<&Piece> {
        match self {
            Occupant::Empty => None,
            Occupant::Piece(piece) => Some(piece),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }

    /// Piece letter, or the empty marker
    pub fn code(&self) -> char {
        self.piece().map_or(EMPTY_CODE, Piece::code)
    }
}
