//! Error taxonomy for command handling. Every message starts with `Error:` so
//! clients can surface it verbatim.

use thiserror::Error;

use crate::game::MoveError;
use crate::models::{GameId, ServerMessage};
use crate::store::StoreError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Error: bad request: {0}")]
    Validation(String),

    #[error("Error: unauthorized")]
    Auth,

    #[error("Error: game {0} does not exist")]
    NotFound(GameId),

    #[error("Error: illegal move: {0}")]
    IllegalMove(#[from] MoveError),

    #[error("Error: only the players of this game can do that")]
    NotAPlayer,

    #[error("Error: the game is already over")]
    GameOver,

    #[error("Error: could not save the game: {0}")]
    Persistence(StoreError),

    #[error("Error: internal server error")]
    Internal,
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(game_id) => SessionError::NotFound(game_id),
            other => SessionError::Persistence(other),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Validation(err.to_string())
    }
}

impl SessionError {
    pub fn to_message(&self) -> ServerMessage {
        ServerMessage::Error {
            error_message: self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
