//! Square geometry, algebraic notation and the 8x8 occupant grid

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, SquareError};
use crate::pieces::{Color, Occupant, Piece, PieceKind};

/// Board width and height
pub const BOARD_SIZE: i8 = 8;

/// Marker used for unoccupied squares in piece-code strings
pub const EMPTY_CODE: char = '.';

/// Standard starting position, row 0 (rank 1) first
pub const INITIAL_LAYOUT: &str = concat!(
    "RNBQKBNR",
    "PPPPPPPP",
    "........",
    "........",
    "........",
    "........",
    "pppppppp",
    "rnbqkbnr",
);

/// Back-rank order from file A to file H
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

// ============================================================================
// COORDINATE CODEC
// ============================================================================

/// Check that both indices lie in `[0, 8)`
pub fn is_on_board(row: i8, col: i8) -> bool {
    (0..BOARD_SIZE).contains(&row) && (0..BOARD_SIZE).contains(&col)
}

/// Decode a token like `"e4"` into zero-based `(row, col)`
pub fn to_indices(token: &str) -> Result<(i8, i8), SquareError> {
    let mut chars = token.chars();
    let (letter, digit) = match (chars.next(), chars.next(), chars.next()) {
        (Some(letter), Some(digit), None) => (letter.to_ascii_uppercase(), digit),
        _ => return Err(SquareError::Malformed(token.to_string())),
    };

    if !letter.is_ascii_uppercase() || !digit.is_ascii_digit() {
        return Err(SquareError::Malformed(token.to_string()));
    }

    let col = (letter as u8 - b'A') as i8;
    let row = (digit as u8 - b'0') as i8 - 1;

    if !is_on_board(row, col) {
        return Err(SquareError::OffBoard(token.to_string()));
    }

    Ok((row, col))
}

/// Encode `(row, col)` as an upper-case token; `None` off the board
pub fn to_notation(row: i8, col: i8) -> Option<String> {
    if !is_on_board(row, col) {
        return None;
    }
    let letter = (b'A' + col as u8) as char;
    let digit = (b'1' + row as u8) as char;
    Some([letter, digit].iter().collect())
}

// ============================================================================
// SQUARE
// ============================================================================

/// A board square; row 0 is White's back rank, column 0 is file A
///
/// Serializes as its algebraic token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Decode an algebraic token
    pub fn parse(token: &str) -> Result<Self, SquareError> {
        let (row, col) = to_indices(token)?;
        Ok(Self { row, col })
    }

    /// Check if this square is on the board
    pub fn is_valid(&self) -> bool {
        is_on_board(self.row, self.col)
    }

    /// Square displaced by `(dr, dc)`; may be off the board
    pub fn offset(&self, dr: i8, dc: i8) -> Square {
        Square::new(self.row + dr, self.col + dc)
    }

    /// Iterate all 64 squares, row by row from A1
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square::new(row, col)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match to_notation(self.row, self.col) {
            Some(token) => f.write_str(&token),
            None => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::parse(s)
    }
}

impl TryFrom<String> for Square {
    type Error = SquareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Square::parse(&value)
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// 8x8 grid; every cell always holds an occupant, possibly `Empty`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Occupant; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    /// Board with every square empty
    pub fn empty() -> Self {
        Self {
            cells: [[Occupant::Empty; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// Standard starting position
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for (col, &kind) in (0..BOARD_SIZE).zip(BACK_RANK.iter()) {
            for (color, back, pawns) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                let back = Square::new(back, col);
                let pawns = Square::new(pawns, col);
                board.set(back, Occupant::Piece(Piece::new(kind, color, back)));
                board.set(pawns, Occupant::Piece(Piece::new(PieceKind::Pawn, color, pawns)));
            }
        }
        board
    }

    /// Build a board from 64 piece codes, row 0 first
    ///
    /// Whitespace is ignored so layouts may be written one rank per line.
    pub fn from_layout(layout: &str) -> Result<Self, LayoutError> {
        let codes: Vec<char> = layout.chars().filter(|c| !c.is_whitespace()).collect();
        if codes.len() != 64 {
            return Err(LayoutError::WrongLength(codes.len()));
        }

        let mut board = Self::empty();
        for (square, &code) in Square::all().zip(codes.iter()) {
            if code == EMPTY_CODE {
                continue;
            }
            let piece = Piece::from_code(code, square).ok_or_else(|| LayoutError::UnknownCode {
                code,
                square: square.to_string(),
            })?;
            board.set(square, Occupant::Piece(piece));
        }
        Ok(board)
    }

    /// Occupant at square; `None` off the board
    pub fn get(&self, square: Square) -> Option<&Occupant> {
        if !square.is_valid() {
            return None;
        }
        Some(&self.cells[square.row as usize][square.col as usize])
    }

    /// True for an on-board square holding `Empty`
    pub fn is_empty(&self, square: Square) -> bool {
        matches!(self.get(square), Some(Occupant::Empty))
    }

    /// Color of the occupant at square; `None` for empty or off-board
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.get(square).and_then(Occupant::color)
    }

    pub(crate) fn set(&mut self, square: Square, occupant: Occupant) {
        debug_assert!(square.is_valid(), "write to off-board square {:?}", square);
        self.cells[square.row as usize][square.col as usize] = occupant;
    }

    /// Iterate pieces on board
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten().filter_map(Occupant::piece)
    }

    /// Count pieces of one color
    pub fn count(&self, color: Color) -> usize {
        self.pieces().filter(|p| p.color == color).count()
    }

    /// One code string per rank, rank 8 first (as a player with White at
    /// the bottom sees the board)
    pub fn ranks(&self) -> Vec<String> {
        self.cells
            .iter()
            .rev()
            .map(|row| row.iter().map(Occupant::code).collect())
            .collect()
    }

    /// 64-character layout, row 0 first; inverse of `from_layout`
    pub fn layout(&self) -> String {
        self.cells.iter().flatten().map(Occupant::code).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rank) in self.ranks().iter().enumerate() {
            write!(f, "{} ", BOARD_SIZE as usize - i)?;
            for code in rank.chars() {
                write!(f, " {}", code)?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", (b'a' + col as u8) as char)?;
        }
        writeln!(f)
    }
}
