use std::sync::Arc;

use crate::auth::IdentityResolver;
use crate::store::GameStore;
use crate::websocket::session::{GameGuards, SessionRegistry};

/// Server context shared by every connection: collaborators plus live session bookkeeping
pub struct AppState {
    pub store: Arc<dyn GameStore>,
    pub identities: Arc<dyn IdentityResolver>,
    pub sessions: SessionRegistry,
    pub guards: GameGuards,
}

impl AppState {
    pub fn new(store: Arc<dyn GameStore>, identities: Arc<dyn IdentityResolver>) -> Self {
        AppState {
            store,
            identities,
            sessions: SessionRegistry::default(),
            guards: GameGuards::default(),
        }
    }
}
