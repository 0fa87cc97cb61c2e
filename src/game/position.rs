use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Side of the board a piece belongs to
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn step for this color
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank the pawns of this color start on
    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// Rank a pawn of this color promotes on
    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 8,
            Color::Black => 1,
        }
    }

    fn back_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 8,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceType {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceType {
    /// Piece types a pawn may turn into, in the order moves are generated
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Knight,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Queen,
    ];

    /// Standard arrangement of the back rank, file a through h
    pub const BACK_RANK: [PieceType; 8] = [
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
    ];
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::King => "king",
            PieceType::Queen => "queen",
            PieceType::Bishop => "bishop",
            PieceType::Knight => "knight",
            PieceType::Rook => "rook",
            PieceType::Pawn => "pawn",
        };
        f.write_str(name)
    }
}

/// An immutable (color, type) pair
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Piece { color, piece_type }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.piece_type)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePositionError {
    #[error("expected a file letter and a rank digit, got {0:?}")]
    Malformed(String),
    #[error("row {row} / column {column} is off the board")]
    OffBoard { row: u8, column: u8 },
}

/// A square on the board; row is the rank and column the file, both 1..=8
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "PositionRepr", into = "String")]
pub struct Position {
    row: u8,
    column: u8,
}

impl Position {
    pub fn new(row: u8, column: u8) -> Option<Self> {
        if (1..=8).contains(&row) && (1..=8).contains(&column) {
            Some(Position { row, column })
        } else {
            None
        }
    }

    /// Parses an algebraic square such as `e4`; anything else is no position
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn column(self) -> u8 {
        self.column
    }

    /// The square `rows` up and `columns` right of this one, if it is on the board
    pub fn offset(self, rows: i8, columns: i8) -> Option<Self> {
        let row = self.row as i8 + rows;
        let column = self.column as i8 + columns;
        if row < 1 || column < 1 {
            return None;
        }
        Position::new(row as u8, column as u8)
    }

    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8).flat_map(|row| (1..=8).map(move |column| Position { row, column }))
    }

    pub(crate) fn index(self) -> (usize, usize) {
        (self.row as usize - 1, self.column as usize - 1)
    }

    pub(crate) fn home(color: Color, column: u8) -> Self {
        Position {
            row: color.back_rank(),
            column,
        }
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParsePositionError::Malformed(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(malformed());
        }

        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !file.is_ascii_lowercase() || !rank.is_ascii_digit() {
            return Err(malformed());
        }

        let column = file - b'a' + 1;
        let row = rank - b'0';
        Position::new(row, column).ok_or(ParsePositionError::OffBoard { row, column })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.column - 1) as char, self.row)
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.to_string()
    }
}

// Clients may send either "e2" or {"row": 2, "column": 5}
#[derive(Deserialize)]
#[serde(untagged)]
enum PositionRepr {
    Algebraic(String),
    Coordinates { row: u8, column: u8 },
}

impl TryFrom<PositionRepr> for Position {
    type Error = ParsePositionError;

    fn try_from(repr: PositionRepr) -> Result<Self, Self::Error> {
        match repr {
            PositionRepr::Algebraic(s) => s.parse(),
            PositionRepr::Coordinates { row, column } => {
                Position::new(row, column).ok_or(ParsePositionError::OffBoard { row, column })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algebraic_round_trip() {
        let e4 = Position::new(4, 5).unwrap();
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(Position::parse("e4"), Some(e4));
        assert_eq!(Position::parse("A1"), Position::new(1, 1));
        assert_eq!(Position::parse("h8"), Position::new(8, 8));
    }

    #[test]
    fn test_invalid_strings_are_no_position() {
        for s in ["", "e", "e44", "i1", "a0", "a9", "11", "ee", "é1"] {
            assert_eq!(Position::parse(s), None, "{s:?} should not parse");
        }
    }

    #[test]
    fn test_offset_respects_board_edges() {
        let a1 = Position::new(1, 1).unwrap();
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(a1.offset(7, 7), Position::new(8, 8));
        assert_eq!(a1.offset(8, 0), None);
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let from_str: Position = serde_json::from_str("\"c7\"").unwrap();
        let from_coords: Position = serde_json::from_str(r#"{"row": 7, "column": 3}"#).unwrap();
        assert_eq!(from_str, from_coords);
        assert!(serde_json::from_str::<Position>(r#"{"row": 9, "column": 3}"#).is_err());
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"c7\"");
    }

    #[test]
    fn test_all_positions() {
        assert_eq!(Position::all().count(), 64);
    }
}
