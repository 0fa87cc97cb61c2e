//! Persistence collaborator. The session layer only ever loads a copy of a
//! game, mutates the copy, and saves it back whole.

use log::info;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::models::{GameId, GameRecord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("game {0} not found")]
    NotFound(GameId),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub trait GameStore: Send + Sync {
    /// Creates a fresh game and returns its id
    fn create_game(
        &self,
        game_name: &str,
        white_username: Option<String>,
        black_username: Option<String>,
    ) -> Result<GameId, StoreError>;

    fn load(&self, game_id: GameId) -> Result<GameRecord, StoreError>;

    /// Replaces the stored record of an existing game
    fn save(&self, record: &GameRecord) -> Result<(), StoreError>;
}

/// Keeps every game in process memory
pub struct MemoryGameStore {
    games: Mutex<HashMap<GameId, GameRecord>>,
    next_id: Mutex<GameId>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        MemoryGameStore {
            games: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
        }
    }

    fn games(&self) -> MutexGuard<'_, HashMap<GameId, GameRecord>> {
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryGameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore for MemoryGameStore {
    fn create_game(
        &self,
        game_name: &str,
        white_username: Option<String>,
        black_username: Option<String>,
    ) -> Result<GameId, StoreError> {
        let game_id = {
            let mut next_id = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
            let id = *next_id;
            *next_id += 1;
            id
        };

        let record = GameRecord::new(game_id, game_name, white_username, black_username);
        self.games().insert(game_id, record);
        info!("Created game {} ({})", game_id, game_name);
        Ok(game_id)
    }

    fn load(&self, game_id: GameId) -> Result<GameRecord, StoreError> {
        self.games()
            .get(&game_id)
            .cloned()
            .ok_or(StoreError::NotFound(game_id))
    }

    fn save(&self, record: &GameRecord) -> Result<(), StoreError> {
        let mut games = self.games();
        match games.get_mut(&record.game_id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(record.game_id)),
        }
    }
}
