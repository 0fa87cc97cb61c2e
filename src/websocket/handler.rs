use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::SessionError;
use crate::models::{AppState, ChessWebSocketMessage};
use crate::websocket::session::{ConnectionId, ConnectionSink};

// Sent if even the error reply cannot be serialized
const FALLBACK_ERROR: &str =
    r#"{"serverMessageType":"ERROR","errorMessage":"Error: internal server error"}"#;

/// WebSocket handler for one client connection
pub struct ChessWebSocket {
    pub id: ConnectionId,
    pub app_state: web::Data<AppState>,
}

impl ChessWebSocket {
    pub fn new(app_state: web::Data<AppState>) -> Self {
        ChessWebSocket {
            id: Uuid::new_v4(),
            app_state,
        }
    }

    fn handle_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        info!("Received message on {}: {}", self.id, text);
        let sink: Arc<dyn ConnectionSink> =
            Arc::new(ctx.address().recipient::<ChessWebSocketMessage>());

        // A failing command must never take the connection down with it
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.app_state.handle_text(self.id, sink, text)
        }))
        .unwrap_or(Err(SessionError::Internal));

        if let Err(e) = outcome {
            warn!("Command from {} rejected: {}", self.id, e);
            self.send_error(&e, ctx);
        }
    }

    fn send_error(&self, error: &SessionError, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(&error.to_message()) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                warn!("Error serializing error reply: {}", e);
                ctx.text(FALLBACK_ERROR);
            }
        }
    }
}

impl Actor for ChessWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("WebSocket connection started: {}", self.id);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.app_state.disconnect(self.id);
        info!("WebSocket connection closed: {}", self.id);
        Running::Stop
    }
}

impl Handler<ChessWebSocketMessage> for ChessWebSocket {
    type Result = ();

    fn handle(&mut self, msg: ChessWebSocketMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChessWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                self.handle_text(&text, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                let error =
                    SessionError::Validation("binary messages are not supported".to_string());
                self.send_error(&error, ctx);
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection {} closed: {:?}", self.id, reason);
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {}
            Err(e) => {
                warn!("Protocol error on {}: {}", self.id, e);
                ctx.stop();
            }
        }
    }
}

/// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let ws = ChessWebSocket::new(app_state);
    info!("New WebSocket connection: {}", ws.id);
    ws::start(ws, &req, stream)
}
