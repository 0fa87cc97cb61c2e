//! Identity collaborator: maps an auth token to the participant's username.

use log::info;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

pub trait IdentityResolver: Send + Sync {
    /// The username behind `token`, or `None` if the token is unknown
    fn resolve(&self, token: &str) -> Option<String>;
}

/// In-memory token table
#[derive(Default)]
pub struct TokenRegistry {
    tokens: RwLock<HashMap<String, String>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, username: &str, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.to_string(), username.to_string());
        info!("Registered token for {}", username);
    }

    /// Generates a fresh token for `username`
    pub fn issue(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.register(username, &token);
        token
    }
}

impl IdentityResolver for TokenRegistry {
    fn resolve(&self, token: &str) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }
}
