pub mod board;
pub mod movegen;
pub mod position;
pub mod rules;
pub mod utils;

// Re-export important types
pub use board::Board;
pub use movegen::{pseudo_legal_moves, ChessMove, MoveShape};
pub use position::{Color, ParsePositionError, Piece, PieceType, Position};
pub use rules::{ChessGame, GameStatus, MoveError};
