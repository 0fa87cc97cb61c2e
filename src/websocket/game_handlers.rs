use log::{info, warn};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Result, SessionError};
use crate::game::utils::{color_to_string, get_game_status, status_notification};
use crate::game::{ChessMove, Color, MoveError};
use crate::models::{AppState, Command, GameId, Request, ServerMessage, UserGameCommand};
use crate::websocket::session::{send_to, ConnectionId, ConnectionSink};

impl AppState {
    /// Parses one raw text frame and runs the command it carries
    pub fn handle_text(
        &self,
        connection: ConnectionId,
        sink: Arc<dyn ConnectionSink>,
        text: &str,
    ) -> Result<()> {
        let msg: UserGameCommand = serde_json::from_str(text)?;
        self.handle_command(connection, sink, msg)
    }

    pub fn handle_command(
        &self,
        connection: ConnectionId,
        sink: Arc<dyn ConnectionSink>,
        msg: UserGameCommand,
    ) -> Result<()> {
        let request = Request::try_from(msg)?;
        let username = self.authenticate(&request.auth_token)?;

        match request.command {
            Command::Connect => self.connect(connection, sink, &username, request.game_id),
            Command::MakeMove(chess_move) => self.make_move(&username, request.game_id, chess_move),
            Command::Leave => self.leave(connection, &username, request.game_id),
            Command::Resign => self.resign(&username, request.game_id),
        }
    }

    fn authenticate(&self, token: &str) -> Result<String> {
        self.identities.resolve(token).ok_or(SessionError::Auth)
    }

    /// Guard of a game the store knows about. Unknown ids never get a guard.
    fn game_guard(&self, game_id: GameId) -> Result<Arc<Mutex<()>>> {
        self.store.load(game_id)?;
        Ok(self.guards.guard(game_id))
    }

    /// Registers the connection for the game and sends it the current state once
    pub fn connect(
        &self,
        connection: ConnectionId,
        sink: Arc<dyn ConnectionSink>,
        username: &str,
        game_id: GameId,
    ) -> Result<()> {
        // Hold the guard so no move lands between the snapshot and the registration
        let guard = self.game_guard(game_id)?;
        let _lock = guard.lock().unwrap_or_else(PoisonError::into_inner);

        let record = self.store.load(game_id)?;
        if !self.sessions.register(game_id, connection, username, Arc::clone(&sink)) {
            info!("{} is already watching game {}, no new snapshot", username, game_id);
            return Ok(());
        }

        let role = record.role_of(username);
        info!("{} joined game {} as {}", username, game_id, role);
        let note = ServerMessage::notification(format!("{} joined the game as {}", username, role));
        if let Err(e) = send_to(sink.as_ref(), &ServerMessage::LoadGame { game: record }) {
            warn!("Failed to send game {} to {}: {}", game_id, connection, e);
        }
        self.sessions.broadcast(game_id, &note, Some(connection));
        Ok(())
    }

    /// Applies a move under the game guard, persists it, and tells every watcher
    pub fn make_move(&self, username: &str, game_id: GameId, chess_move: ChessMove) -> Result<()> {
        let guard = self.game_guard(game_id)?;
        let _lock = guard.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.store.load(game_id)?;
        if record.game.is_end_game() {
            return Err(SessionError::GameOver);
        }

        let color = record.seat_of(username).ok_or(SessionError::NotAPlayer)?;
        let turn = record.game.turn();
        if color != turn {
            return Err(MoveError::WrongTurn {
                turn,
                position: chess_move.start_position,
            }
            .into());
        }

        let moved = record.game.board().piece(chess_move.start_position);
        record.game.make_move(chess_move)?;
        self.store.save(&record)?;
        info!(
            "{} played {} in game {} ({}, {} replies)",
            username,
            chess_move,
            game_id,
            get_game_status(&record.game),
            record.game.all_legal_moves(record.game.turn()).count()
        );

        let mut description = format!(
            "{} ({}) moved {} from {} to {}",
            username,
            color,
            moved.map_or_else(|| "a piece".to_string(), |piece| piece.piece_type.to_string()),
            chess_move.start_position,
            chess_move.end_position
        );
        if let Some(promotion) = chess_move.promotion_piece {
            description.push_str(&format!(" and promoted to {}", promotion));
        }
        let status = status_notification(
            &record.game,
            record.white_username.as_deref(),
            record.black_username.as_deref(),
        );

        self.sessions.broadcast(game_id, &ServerMessage::LoadGame { game: record }, None);
        self.sessions.broadcast(game_id, &ServerMessage::notification(description), None);
        if let Some(status) = status {
            self.sessions.broadcast(game_id, &ServerMessage::notification(status), None);
        }
        Ok(())
    }

    /// Stops watching a game; a seated player also gives up the seat.
    /// Only a connection registered for the game may leave it.
    pub fn leave(&self, connection: ConnectionId, username: &str, game_id: GameId) -> Result<()> {
        {
            let guard = self.game_guard(game_id)?;
            let _lock = guard.lock().unwrap_or_else(PoisonError::into_inner);

            if !self.sessions.is_watching(game_id, connection) {
                return Err(SessionError::Validation(format!(
                    "not connected to game {}",
                    game_id
                )));
            }

            let mut record = self.store.load(game_id)?;
            if record.vacate(username) {
                self.store.save(&record)?;
                info!("{} gave up their seat in game {}", username, game_id);
            }
            self.sessions.unregister(game_id, connection);
        }

        info!("{} left game {}", username, game_id);
        self.sessions.broadcast(
            game_id,
            &ServerMessage::notification(format!("{} left the game", username)),
            None,
        );
        Ok(())
    }

    /// Ends the game in the opponent's favour
    pub fn resign(&self, username: &str, game_id: GameId) -> Result<()> {
        let guard = self.game_guard(game_id)?;
        let _lock = guard.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.store.load(game_id)?;
        let color = record.seat_of(username).ok_or(SessionError::NotAPlayer)?;
        if record.game.is_end_game() {
            return Err(SessionError::GameOver);
        }

        record.game.resign();
        self.store.save(&record)?;
        info!("{} resigned game {}", username, game_id);

        let winner = opponent_name(record.player(color.opposite()), color.opposite());
        self.sessions.broadcast(
            game_id,
            &ServerMessage::notification(format!("{} resigned, {} wins", username, winner)),
            None,
        );
        Ok(())
    }

    /// Transport-driven close: forget the connection everywhere
    pub fn disconnect(&self, connection: ConnectionId) {
        let games = self.sessions.drop_connection(connection);
        if !games.is_empty() {
            info!("Connection {} closed, removed from games {:?}", connection, games);
        }
    }
}

fn opponent_name(seat: Option<&str>, color: Color) -> String {
    seat.map_or_else(|| color_to_string(color), str::to_string)
}
