use serde::{Deserialize, Serialize};

use super::position::{Color, Piece, PieceType, Position};

/// An 8x8 grid holding at most one piece per square. Knows nothing about the rules.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    // squares[row - 1][column - 1], rank 1 first
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// A board set up in the standard starting arrangement
    pub fn standard() -> Self {
        let mut board = Board::empty();
        board.reset();
        board
    }

    pub fn reset(&mut self) {
        *self = Board::empty();
        for color in [Color::White, Color::Black] {
            for (i, piece_type) in PieceType::BACK_RANK.into_iter().enumerate() {
                let column = i as u8 + 1;
                self.place(Position::home(color, column), Some(Piece::new(color, piece_type)));
                if let Some(pawn_square) = Position::new(color.pawn_rank(), column) {
                    self.place(pawn_square, Some(Piece::new(color, PieceType::Pawn)));
                }
            }
        }
    }

    /// Puts `piece` on `position`, replacing whatever was there; `None` clears it
    pub fn place(&mut self, position: Position, piece: Option<Piece>) {
        let (row, column) = position.index();
        self.squares[row][column] = piece;
    }

    pub fn piece(&self, position: Position) -> Option<Piece> {
        let (row, column) = position.index();
        self.squares[row][column]
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|position| self.piece(position).map(|piece| (position, piece)))
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| *piece == Piece::new(color, PieceType::King))
            .map(|(position, _)| position)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> Position {
        Position::parse(s).unwrap()
    }

    #[test]
    fn test_standard_arrangement() {
        let board = Board::standard();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.piece(at("e1")), Some(Piece::new(Color::White, PieceType::King)));
        assert_eq!(board.piece(at("d8")), Some(Piece::new(Color::Black, PieceType::Queen)));
        assert_eq!(board.piece(at("g7")), Some(Piece::new(Color::Black, PieceType::Pawn)));
        assert_eq!(board.piece(at("b1")), Some(Piece::new(Color::White, PieceType::Knight)));
        assert_eq!(board.piece(at("e4")), None);
    }

    #[test]
    fn test_place_replaces_and_clears() {
        let mut board = Board::empty();
        let rook = Piece::new(Color::Black, PieceType::Rook);
        board.place(at("d4"), Some(Piece::new(Color::White, PieceType::Pawn)));
        board.place(at("d4"), Some(rook));
        assert_eq!(board.piece(at("d4")), Some(rook));
        assert_eq!(board.pieces().count(), 1);

        board.place(at("d4"), None);
        assert_eq!(board.pieces().count(), 0);
    }

    #[test]
    fn test_find_king() {
        let board = Board::standard();
        assert_eq!(board.find_king(Color::Black), Some(at("e8")));
        assert_eq!(Board::empty().find_king(Color::White), None);
    }
}
