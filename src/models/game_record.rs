use serde::{Deserialize, Serialize};

use crate::game::{ChessGame, Color};

pub type GameId = u32;

/// A stored game: its id, who sits on which side, and the rules engine state
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub game_name: String,
    pub game: ChessGame,
}

impl GameRecord {
    pub fn new(
        game_id: GameId,
        game_name: &str,
        white_username: Option<String>,
        black_username: Option<String>,
    ) -> Self {
        GameRecord {
            game_id,
            white_username,
            black_username,
            game_name: game_name.to_string(),
            game: ChessGame::new(),
        }
    }

    /// Username seated on `color`
    pub fn player(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_username.as_deref(),
            Color::Black => self.black_username.as_deref(),
        }
    }

    /// The side `username` plays; when one user holds both seats the side to move wins
    pub fn seat_of(&self, username: &str) -> Option<Color> {
        let turn = self.game.turn();
        [turn, turn.opposite()]
            .into_iter()
            .find(|color| self.player(*color) == Some(username))
    }

    /// Frees every seat held by `username`, returning whether anything changed
    pub fn vacate(&mut self, username: &str) -> bool {
        let mut changed = false;
        for seat in [&mut self.white_username, &mut self.black_username] {
            if seat.as_deref() == Some(username) {
                *seat = None;
                changed = true;
            }
        }
        changed
    }

    /// How `username` takes part: "white", "black" or "an observer"
    pub fn role_of(&self, username: &str) -> String {
        match self.seat_of(username) {
            Some(color) => color.to_string(),
            None => "an observer".to_string(),
        }
    }
}
