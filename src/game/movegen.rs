//! Pseudo-legal move generation.
//!
//! Every piece type maps to a [`MoveShape`]; sliders and steppers share one
//! offset walker and only pawns get their own routine. Nothing here looks at
//! whether the mover's king ends up attacked, that filtering lives in
//! [`crate::game::rules`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::board::Board;
use super::position::{Color, Piece, PieceType, Position};

/// A move from one square to another, with the promotion choice when a pawn reaches the far rank
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ChessMove {
    pub start_position: Position,
    pub end_position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_piece: Option<PieceType>,
}

impl ChessMove {
    pub fn new(start: Position, end: Position, promotion: Option<PieceType>) -> Self {
        ChessMove {
            start_position: start,
            end_position: end,
            promotion_piece: promotion,
        }
    }
}

impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start_position, self.end_position)?;
        if let Some(promotion) = self.promotion_piece {
            write!(f, "={}", promotion)?;
        }
        Ok(())
    }
}

const DIAGONALS: &[(i8, i8)] = &[(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: &[(i8, i8)] = &[(1, 0), (-1, 0), (0, 1), (0, -1)];
const ALL_DIRECTIONS: &[(i8, i8)] = &[
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];
const KNIGHT_JUMPS: &[(i8, i8)] = &[
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// How a piece type moves across the board
#[derive(Debug, Clone, Copy)]
pub enum MoveShape {
    /// Repeats each offset until the edge, an ally, or a capture
    Slide(&'static [(i8, i8)]),
    /// Tries each offset exactly once
    Step(&'static [(i8, i8)]),
    Pawn,
}

impl MoveShape {
    pub fn of(piece_type: PieceType) -> MoveShape {
        match piece_type {
            PieceType::King => MoveShape::Step(ALL_DIRECTIONS),
            PieceType::Queen => MoveShape::Slide(ALL_DIRECTIONS),
            PieceType::Bishop => MoveShape::Slide(DIAGONALS),
            PieceType::Knight => MoveShape::Step(KNIGHT_JUMPS),
            PieceType::Rook => MoveShape::Slide(ORTHOGONALS),
            PieceType::Pawn => MoveShape::Pawn,
        }
    }
}

/// All moves the piece on `from` could make by its movement pattern alone.
/// An empty square yields no moves.
pub fn pseudo_legal_moves(board: &Board, from: Position) -> Vec<ChessMove> {
    let mut moves = Vec::new();
    let Some(piece) = board.piece(from) else {
        return moves;
    };

    match MoveShape::of(piece.piece_type) {
        MoveShape::Slide(offsets) => {
            walk_offsets(board, from, piece.color, offsets, true, &mut moves)
        }
        MoveShape::Step(offsets) => {
            walk_offsets(board, from, piece.color, offsets, false, &mut moves)
        }
        MoveShape::Pawn => pawn_moves(board, from, piece, &mut moves),
    }
    moves
}

fn walk_offsets(
    board: &Board,
    from: Position,
    color: Color,
    offsets: &[(i8, i8)],
    repeat: bool,
    moves: &mut Vec<ChessMove>,
) {
    for &(rows, columns) in offsets {
        let mut current = from;
        while let Some(target) = current.offset(rows, columns) {
            match board.piece(target) {
                None => moves.push(ChessMove::new(from, target, None)),
                Some(other) => {
                    if other.color != color {
                        moves.push(ChessMove::new(from, target, None));
                    }
                    break;
                }
            }
            if !repeat {
                break;
            }
            current = target;
        }
    }
}

fn pawn_moves(board: &Board, from: Position, pawn: Piece, moves: &mut Vec<ChessMove>) {
    let forward = pawn.color.forward();

    if let Some(one) = from.offset(forward, 0).filter(|square| board.piece(*square).is_none()) {
        push_pawn_move(from, one, pawn.color, moves);

        if from.row() == pawn.color.pawn_rank() {
            let two = one.offset(forward, 0).filter(|square| board.piece(*square).is_none());
            if let Some(two) = two {
                push_pawn_move(from, two, pawn.color, moves);
            }
        }
    }

    for side in [-1, 1] {
        let Some(target) = from.offset(forward, side) else {
            continue;
        };
        if board.piece(target).is_some_and(|other| other.color != pawn.color) {
            push_pawn_move(from, target, pawn.color, moves);
        }
    }
}

fn push_pawn_move(from: Position, to: Position, color: Color, moves: &mut Vec<ChessMove>) {
    if to.row() == color.promotion_rank() {
        moves.extend(
            PieceType::PROMOTIONS
                .into_iter()
                .map(|promotion| ChessMove::new(from, to, Some(promotion))),
        );
    } else {
        moves.push(ChessMove::new(from, to, None));
    }
}
