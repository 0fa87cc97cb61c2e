use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::Board;
use super::movegen::{pseudo_legal_moves, ChessMove};
use super::position::{Color, Piece, Position};

/// Reasons a move is refused. Every variant leaves the game untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("there is no piece on {0}")]
    NoPiece(Position),
    #[error("it is {turn}'s turn, the piece on {position} is not theirs")]
    WrongTurn { turn: Color, position: Position },
    #[error("{0} is not a legal move")]
    NotLegal(ChessMove),
    #[error("the game is already over")]
    GameOver,
}

/// Where a game stands, seen from the side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Check(Color),
    Checkmate(Color),
    Stalemate(Color),
    Resigned,
}

/// The rules engine: one board, whose turn it is, and whether someone resigned
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChessGame {
    board: Board,
    turn: Color,
    resigned: bool,
}

impl ChessGame {
    /// Standard starting position, white to move
    pub fn new() -> Self {
        ChessGame {
            board: Board::standard(),
            turn: Color::White,
            resigned: false,
        }
    }

    /// Restores a game from previously saved parts
    pub fn from_parts(board: Board, turn: Color, resigned: bool) -> Self {
        ChessGame {
            board,
            turn,
            resigned,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn is_resigned(&self) -> bool {
        self.resigned
    }

    /// Moves of the piece on `position` that do not leave its own king in check
    pub fn legal_moves(&self, position: Position) -> Vec<ChessMove> {
        let Some(piece) = self.board.piece(position) else {
            return Vec::new();
        };

        pseudo_legal_moves(&self.board, position)
            .into_iter()
            .filter(|candidate| {
                // Probe on a scratch copy so the real board is never touched
                let mut scratch = self.board;
                apply(&mut scratch, candidate, piece);
                !in_check(&scratch, piece.color)
            })
            .collect()
    }

    /// Every legal move of `color`, generated lazily piece by piece
    pub fn all_legal_moves(&self, color: Color) -> impl Iterator<Item = ChessMove> + '_ {
        self.board
            .pieces()
            .filter(move |(_, piece)| piece.color == color)
            .flat_map(move |(position, _)| self.legal_moves(position))
    }

    fn has_legal_move(&self, color: Color) -> bool {
        self.all_legal_moves(color).next().is_some()
    }

    /// Applies `chess_move` for the side to move and hands the turn over
    pub fn make_move(&mut self, chess_move: ChessMove) -> Result<(), MoveError> {
        if self.is_end_game() {
            return Err(MoveError::GameOver);
        }

        let start = chess_move.start_position;
        let piece = self.board.piece(start).ok_or(MoveError::NoPiece(start))?;
        if piece.color != self.turn {
            return Err(MoveError::WrongTurn {
                turn: self.turn,
                position: start,
            });
        }
        if !self.legal_moves(start).contains(&chess_move) {
            return Err(MoveError::NotLegal(chess_move));
        }

        apply(&mut self.board, &chess_move, piece);
        self.turn = self.turn.opposite();
        Ok(())
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        in_check(&self.board, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color)
    }

    pub fn is_end_game(&self) -> bool {
        self.resigned
            || [Color::White, Color::Black]
                .into_iter()
                .any(|color| self.is_in_checkmate(color) || self.is_in_stalemate(color))
    }

    /// Marks the game as over; calling it again changes nothing
    pub fn resign(&mut self) {
        self.resigned = true;
    }

    pub fn status(&self) -> GameStatus {
        if self.resigned {
            return GameStatus::Resigned;
        }
        let turn = self.turn;
        for color in [turn, turn.opposite()] {
            if self.is_in_checkmate(color) {
                return GameStatus::Checkmate(color);
            }
            if self.is_in_stalemate(color) {
                return GameStatus::Stalemate(color);
            }
        }
        if self.is_in_check(turn) {
            GameStatus::Check(turn)
        } else {
            GameStatus::InProgress
        }
    }
}

impl Default for ChessGame {
    fn default() -> Self {
        ChessGame::new()
    }
}

fn apply(board: &mut Board, chess_move: &ChessMove, piece: Piece) {
    let placed = match chess_move.promotion_piece {
        Some(promotion) => Piece::new(piece.color, promotion),
        None => piece,
    };
    board.place(chess_move.end_position, Some(placed));
    board.place(chess_move.start_position, None);
}

// No king on the board counts as not in check
fn in_check(board: &Board, color: Color) -> bool {
    let Some(king) = board.find_king(color) else {
        return false;
    };
    board
        .pieces()
        .filter(|(_, piece)| piece.color != color)
        .any(|(position, _)| {
            pseudo_legal_moves(board, position)
                .iter()
                .any(|m| m.end_position == king)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::position::PieceType;

    fn at(s: &str) -> Position {
        Position::parse(s).unwrap()
    }

    fn mv(from: &str, to: &str) -> ChessMove {
        ChessMove::new(at(from), at(to), None)
    }

    fn game_with(pieces: &[(&str, Color, PieceType)], turn: Color) -> ChessGame {
        let mut board = Board::empty();
        for &(square, color, piece_type) in pieces {
            board.place(at(square), Some(Piece::new(color, piece_type)));
        }
        ChessGame::from_parts(board, turn, false)
    }

    #[test]
    fn test_opening_move_flips_turn() {
        let mut game = ChessGame::new();
        assert_eq!(game.all_legal_moves(Color::White).count(), 20);

        game.make_move(mv("e2", "e4")).unwrap();
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.board().piece(at("e2")), None);
        assert_eq!(
            game.board().piece(at("e4")),
            Some(Piece::new(Color::White, PieceType::Pawn))
        );
    }

    #[test]
    fn test_wrong_side_is_rejected_without_mutation() {
        let mut game = ChessGame::new();
        let before = game.clone();
        let err = game.make_move(mv("e7", "e5")).unwrap_err();
        assert_eq!(
            err,
            MoveError::WrongTurn {
                turn: Color::White,
                position: at("e7")
            }
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_illegal_and_empty_square_moves_are_rejected() {
        let mut game = ChessGame::new();
        let before = game.clone();
        assert_eq!(game.make_move(mv("e2", "e5")), Err(MoveError::NotLegal(mv("e2", "e5"))));
        assert_eq!(game.make_move(mv("e4", "e5")), Err(MoveError::NoPiece(at("e4"))));
        assert_eq!(game, before);
    }

    #[test]
    fn test_pinned_piece_cannot_expose_king() {
        let game = game_with(
            &[
                ("e1", Color::White, PieceType::King),
                ("e2", Color::White, PieceType::Rook),
                ("e8", Color::Black, PieceType::Rook),
                ("a8", Color::Black, PieceType::King),
            ],
            Color::White,
        );
        // Pseudo-legal sideways moves are dropped, only moves along the pin survive
        let moves = game.legal_moves(at("e2"));
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.end_position.column() == 5));
        assert!(moves.contains(&mv("e2", "e8")));
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let game = game_with(
            &[
                ("e1", Color::White, PieceType::King),
                ("d8", Color::Black, PieceType::Rook),
                ("h8", Color::Black, PieceType::King),
            ],
            Color::White,
        );
        let moves = game.legal_moves(at("e1"));
        assert!(moves.iter().all(|m| m.end_position.column() != 4));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn test_check_detection() {
        let game = game_with(
            &[
                ("e1", Color::White, PieceType::King),
                ("b4", Color::Black, PieceType::Bishop),
                ("h8", Color::Black, PieceType::King),
            ],
            Color::White,
        );
        assert!(game.is_in_check(Color::White));
        assert!(!game.is_in_check(Color::Black));
        assert_eq!(game.status(), GameStatus::Check(Color::White));
    }

    #[test]
    fn test_missing_king_is_not_in_check() {
        let game = game_with(&[("d8", Color::Black, PieceType::Queen)], Color::White);
        assert!(!game.is_in_check(Color::White));
    }

    #[test]
    fn test_fools_mate_is_checkmate() {
        let mut game = ChessGame::new();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            game.make_move(mv(from, to)).unwrap();
        }
        assert!(game.is_in_check(Color::White));
        assert!(game.is_in_checkmate(Color::White));
        assert!(!game.is_in_checkmate(Color::Black));
        assert!(game.is_end_game());
        assert_eq!(game.status(), GameStatus::Checkmate(Color::White));
        assert_eq!(game.make_move(mv("a2", "a3")), Err(MoveError::GameOver));
    }

    #[test]
    fn test_check_with_escape_is_not_checkmate() {
        let game = game_with(
            &[
                ("e1", Color::White, PieceType::King),
                ("e8", Color::Black, PieceType::Rook),
                ("a8", Color::Black, PieceType::King),
            ],
            Color::White,
        );
        assert!(game.is_in_check(Color::White));
        assert!(!game.is_in_checkmate(Color::White));
        assert!(!game.is_end_game());
    }

    #[test]
    fn test_stalemate() {
        let game = game_with(
            &[
                ("h8", Color::Black, PieceType::King),
                ("f7", Color::White, PieceType::Queen),
                ("g6", Color::White, PieceType::King),
            ],
            Color::Black,
        );
        assert!(!game.is_in_check(Color::Black));
        assert!(game.is_in_stalemate(Color::Black));
        assert!(!game.is_in_checkmate(Color::Black));
        assert!(game.is_end_game());
        assert_eq!(game.status(), GameStatus::Stalemate(Color::Black));
    }

    #[test]
    fn test_promotion_places_chosen_piece() {
        let mut game = game_with(
            &[
                ("a7", Color::White, PieceType::Pawn),
                ("e1", Color::White, PieceType::King),
                ("h6", Color::Black, PieceType::King),
            ],
            Color::White,
        );
        assert!(matches!(
            game.make_move(mv("a7", "a8")),
            Err(MoveError::NotLegal(_))
        ));

        let promote = ChessMove::new(at("a7"), at("a8"), Some(PieceType::Knight));
        game.make_move(promote).unwrap();
        assert_eq!(
            game.board().piece(at("a8")),
            Some(Piece::new(Color::White, PieceType::Knight))
        );
        assert_eq!(game.board().piece(at("a7")), None);
        assert_eq!(game.turn(), Color::Black);
    }

    #[test]
    fn test_capture_removes_target() {
        let mut game = ChessGame::new();
        for (from, to) in [("e2", "e4"), ("d7", "d5"), ("e4", "d5")] {
            game.make_move(mv(from, to)).unwrap();
        }
        assert_eq!(game.board().pieces().count(), 31);
        assert_eq!(
            game.board().piece(at("d5")),
            Some(Piece::new(Color::White, PieceType::Pawn))
        );
    }

    #[test]
    fn test_resign_is_terminal_and_idempotent() {
        let mut game = ChessGame::new();
        game.resign();
        game.resign();
        assert!(game.is_resigned());
        assert!(game.is_end_game());
        assert_eq!(game.status(), GameStatus::Resigned);
        assert_eq!(game.make_move(mv("e2", "e4")), Err(MoveError::GameOver));
    }

    #[test]
    fn test_serde_round_trip_preserves_state() {
        let mut game = ChessGame::new();
        game.make_move(mv("g1", "f3")).unwrap();
        let json = serde_json::to_string(&game).unwrap();
        let restored: ChessGame = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, game);
    }
}
