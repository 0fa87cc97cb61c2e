use super::position::Color;
use super::rules::{ChessGame, GameStatus};

/// Convert a color to the name clients display for it
pub fn color_to_string(color: Color) -> String {
    match color {
        Color::White => "white".to_string(),
        Color::Black => "black".to_string(),
    }
}

/// Get the game status as a short machine-friendly string
pub fn get_game_status(game: &ChessGame) -> String {
    match game.status() {
        GameStatus::InProgress => match game.turn() {
            Color::White => "white_turn".to_string(),
            Color::Black => "black_turn".to_string(),
        },
        GameStatus::Check(_) => "check".to_string(),
        GameStatus::Checkmate(Color::White) => "black_wins".to_string(),
        GameStatus::Checkmate(Color::Black) => "white_wins".to_string(),
        GameStatus::Stalemate(_) => "stalemate".to_string(),
        GameStatus::Resigned => "resigned".to_string(),
    }
}

/// Human-readable line announcing check, checkmate or stalemate, if any
pub fn status_notification(
    game: &ChessGame,
    white: Option<&str>,
    black: Option<&str>,
) -> Option<String> {
    let name = |color: Color| {
        let seat = match color {
            Color::White => white,
            Color::Black => black,
        };
        seat.map(str::to_string).unwrap_or_else(|| color_to_string(color))
    };

    match game.status() {
        GameStatus::Check(color) => Some(format!("{} ({}) is in check", name(color), color)),
        GameStatus::Checkmate(color) => Some(format!(
            "{} ({}) is in checkmate, {} wins",
            name(color),
            color,
            name(color.opposite())
        )),
        GameStatus::Stalemate(color) => Some(format!(
            "{} ({}) is in stalemate, the game is a draw",
            name(color),
            color
        )),
        GameStatus::InProgress | GameStatus::Resigned => None,
    }
}
