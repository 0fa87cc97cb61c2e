//! Two players and any number of observers share one chess game over
//! websockets. The rules engine in [`game`] decides what is legal and when the
//! game ends; the session layer in [`websocket`] serializes commands per game
//! and fans the resulting state out to every connection watching it.

pub mod auth;
pub mod config;
pub mod error;
pub mod game;
pub mod models;
pub mod routes;
pub mod store;
pub mod websocket;
