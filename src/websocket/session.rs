//! Live session bookkeeping: which connections watch which game, whether each
//! has had its initial snapshot, and one mutation guard per game.
//!
//! Delivery never blocks. A websocket connection's sink only enqueues into the
//! actor mailbox, so broadcasting from inside a game guard cannot stall it.
//! Broadcast works on a copy of the watcher set taken under the registry lock,
//! which keeps concurrent joins and leaves from tearing the enumeration.

use actix::Recipient;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ChessWebSocketMessage, GameId, ServerMessage};

pub type ConnectionId = Uuid;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("connection is closed")]
    Closed,

    #[error("could not encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Outbound half of one client connection
pub trait ConnectionSink: Send + Sync {
    fn deliver(&self, payload: &str) -> Result<(), DeliveryError>;
}

impl ConnectionSink for Recipient<ChessWebSocketMessage> {
    fn deliver(&self, payload: &str) -> Result<(), DeliveryError> {
        if !self.connected() {
            return Err(DeliveryError::Closed);
        }
        self.do_send(ChessWebSocketMessage(payload.to_string()));
        Ok(())
    }
}

/// Serializes `message` and hands it to a single connection
pub fn send_to(sink: &dyn ConnectionSink, message: &ServerMessage) -> Result<(), DeliveryError> {
    let payload = serde_json::to_string(message)?;
    sink.deliver(&payload)
}

struct Watcher {
    username: String,
    sink: Arc<dyn ConnectionSink>,
    snapshot_sent: bool,
}

/// Game id -> connections currently watching or playing that game
#[derive(Default)]
pub struct SessionRegistry {
    games: Mutex<HashMap<GameId, HashMap<ConnectionId, Watcher>>>,
}

impl SessionRegistry {
    fn games(&self) -> MutexGuard<'_, HashMap<GameId, HashMap<ConnectionId, Watcher>>> {
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `connection` to the game's watchers.
    ///
    /// Returns true exactly once per connection and game: the caller owes that
    /// connection its initial snapshot. Later calls only refresh the sink.
    pub fn register(
        &self,
        game_id: GameId,
        connection: ConnectionId,
        username: &str,
        sink: Arc<dyn ConnectionSink>,
    ) -> bool {
        let mut games = self.games();
        let watcher = games
            .entry(game_id)
            .or_default()
            .entry(connection)
            .or_insert_with(|| Watcher {
                username: username.to_string(),
                sink: Arc::clone(&sink),
                snapshot_sent: false,
            });
        watcher.sink = sink;
        !std::mem::replace(&mut watcher.snapshot_sent, true)
    }

    /// Removes `connection` from one game, returning the username it joined as
    pub fn unregister(&self, game_id: GameId, connection: ConnectionId) -> Option<String> {
        let mut games = self.games();
        let watchers = games.get_mut(&game_id)?;
        let removed = watchers.remove(&connection);
        if watchers.is_empty() {
            games.remove(&game_id);
        }
        removed.map(|watcher| watcher.username)
    }

    /// Forgets `connection` everywhere, returning the games it was watching
    pub fn drop_connection(&self, connection: ConnectionId) -> Vec<GameId> {
        let mut games = self.games();
        let mut left = Vec::new();
        games.retain(|game_id, watchers| {
            if watchers.remove(&connection).is_some() {
                left.push(*game_id);
            }
            !watchers.is_empty()
        });
        left
    }

    pub fn is_watching(&self, game_id: GameId, connection: ConnectionId) -> bool {
        self.games()
            .get(&game_id)
            .is_some_and(|watchers| watchers.contains_key(&connection))
    }

    pub fn watcher_count(&self, game_id: GameId) -> usize {
        self.games().get(&game_id).map_or(0, HashMap::len)
    }

    pub fn has_game(&self, game_id: GameId) -> bool {
        self.games().contains_key(&game_id)
    }

    fn watchers(&self, game_id: GameId) -> Vec<(ConnectionId, Arc<dyn ConnectionSink>)> {
        self.games()
            .get(&game_id)
            .map(|watchers| {
                watchers
                    .iter()
                    .map(|(id, watcher)| (*id, Arc::clone(&watcher.sink)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Best-effort fan-out to every watcher of `game_id` except `exclude`.
    /// A failed delivery is logged and skipped. Returns how many deliveries succeeded.
    pub fn broadcast(
        &self,
        game_id: GameId,
        message: &ServerMessage,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let payload = match serde_json::to_string(message) {
            Ok(s) => s,
            Err(e) => {
                warn!("Error serializing message for game {}: {}", game_id, e);
                return 0;
            }
        };

        let mut delivered = 0;
        for (connection, sink) in self.watchers(game_id) {
            if Some(connection) == exclude {
                continue;
            }
            match sink.deliver(&payload) {
                Ok(()) => {
                    debug!("Sent message to connection {} in game {}", connection, game_id);
                    delivered += 1;
                }
                Err(e) => warn!(
                    "Failed to deliver to connection {} in game {}: {}",
                    connection, game_id, e
                ),
            }
        }
        delivered
    }
}

/// One mutual-exclusion guard per game id
#[derive(Default)]
pub struct GameGuards {
    guards: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl GameGuards {
    pub fn guard(&self, game_id: GameId) -> Arc<Mutex<()>> {
        let mut guards = self.guards.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(guards.entry(game_id).or_default())
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.guards.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
