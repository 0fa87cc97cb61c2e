use actix::Message;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::game::ChessMove;
use crate::models::{GameId, GameRecord};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Connect,
    MakeMove,
    Leave,
    Resign,
}

/// Message sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserGameCommand {
    pub command_type: CommandType,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    #[serde(default, rename = "move", skip_serializing_if = "Option::is_none")]
    pub chess_move: Option<ChessMove>,
}

/// What a validated command asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    MakeMove(ChessMove),
    Leave,
    Resign,
}

/// A command whose required fields are all present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub auth_token: String,
    pub game_id: GameId,
    pub command: Command,
}

impl TryFrom<UserGameCommand> for Request {
    type Error = SessionError;

    fn try_from(msg: UserGameCommand) -> Result<Self, Self::Error> {
        let auth_token = msg
            .auth_token
            .filter(|token| !token.is_empty())
            .ok_or(SessionError::Auth)?;

        let command = match msg.command_type {
            CommandType::Connect => Command::Connect,
            CommandType::MakeMove => match msg.chess_move {
                Some(chess_move) => Command::MakeMove(chess_move),
                None => {
                    return Err(SessionError::Validation(
                        "MAKE_MOVE requires a move".to_string(),
                    ))
                }
            },
            CommandType::Leave => Command::Leave,
            CommandType::Resign => Command::Resign,
        };

        Ok(Request {
            auth_token,
            game_id: msg.game_id,
            command,
        })
    }
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "serverMessageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    LoadGame {
        game: GameRecord,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        error_message: String,
    },
    Notification {
        message: String,
    },
}

impl ServerMessage {
    pub fn notification(message: impl Into<String>) -> Self {
        ServerMessage::Notification {
            message: message.into(),
        }
    }
}

/// Message type for WebSocket communication
#[derive(Message)]
#[rtype(result = "()")]
pub struct ChessWebSocketMessage(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PieceType, Position};

    #[test]
    fn test_parse_make_move_with_mixed_positions() {
        let json = r#"{
            "commandType": "MAKE_MOVE",
            "authToken": "t",
            "gameID": 4,
            "move": {
                "startPosition": "g7",
                "endPosition": {"row": 8, "column": 7},
                "promotionPiece": "QUEEN"
            }
        }"#;
        let msg: UserGameCommand = serde_json::from_str(json).unwrap();
        let request = Request::try_from(msg).unwrap();
        assert_eq!(request.game_id, 4);
        assert_eq!(
            request.command,
            Command::MakeMove(ChessMove::new(
                Position::parse("g7").unwrap(),
                Position::parse("g8").unwrap(),
                Some(PieceType::Queen)
            ))
        );
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let no_move: UserGameCommand =
            serde_json::from_str(r#"{"commandType": "MAKE_MOVE", "authToken": "t", "gameID": 1}"#)
                .unwrap();
        assert!(matches!(Request::try_from(no_move), Err(SessionError::Validation(_))));

        let no_token: UserGameCommand =
            serde_json::from_str(r#"{"commandType": "RESIGN", "gameID": 1}"#).unwrap();
        assert_eq!(Request::try_from(no_token), Err(SessionError::Auth));

        let unknown_type = r#"{"commandType": "DANCE", "gameID": 1}"#;
        assert!(serde_json::from_str::<UserGameCommand>(unknown_type).is_err());
        let no_game = r#"{"commandType": "LEAVE", "authToken": "t"}"#;
        assert!(serde_json::from_str::<UserGameCommand>(no_game).is_err());
    }

    #[test]
    fn test_server_message_shapes() {
        let error = SessionError::NotAPlayer.to_message();
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["serverMessageType"], "ERROR");
        assert!(json["errorMessage"].as_str().unwrap().contains("Error"));
        assert!(json.get("game").is_none());

        let note = serde_json::to_value(ServerMessage::notification("hi")).unwrap();
        assert_eq!(note["serverMessageType"], "NOTIFICATION");
        assert_eq!(note["message"], "hi");

        let load = ServerMessage::LoadGame {
            game: GameRecord::new(9, "g", None, None),
        };
        let text = serde_json::to_string(&load).unwrap();
        assert!(text.contains("\"LOAD_GAME\""));
        assert_eq!(serde_json::from_str::<ServerMessage>(&text).unwrap(), load);
    }
}
