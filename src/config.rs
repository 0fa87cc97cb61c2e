//! Command-line configuration.

use clap::Parser;
use std::str::FromStr;

/// Live chess sessions over websockets
#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to listen on
    #[clap(short, long, default_value = "8080")]
    pub port: u16,

    /// Known participant as NAME:TOKEN, may be repeated
    #[clap(long = "player")]
    pub players: Vec<PlayerArg>,

    /// Game to create at startup as WHITE:BLACK, either side may be left empty
    #[clap(long = "game")]
    pub games: Vec<GameArg>,
}

impl Args {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerArg {
    pub username: String,
    pub token: String,
}

impl FromStr for PlayerArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((username, token)) if !username.is_empty() && !token.is_empty() => Ok(PlayerArg {
                username: username.to_string(),
                token: token.to_string(),
            }),
            _ => Err(format!("expected NAME:TOKEN, got {:?}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameArg {
    pub white: Option<String>,
    pub black: Option<String>,
}

impl FromStr for GameArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let seat = |name: &str| (!name.is_empty()).then(|| name.to_string());
        match s.split_once(':') {
            Some((white, black)) if !black.contains(':') => Ok(GameArg {
                white: seat(white),
                black: seat(black),
            }),
            _ => Err(format!("expected WHITE:BLACK, got {:?}", s)),
        }
    }
}
