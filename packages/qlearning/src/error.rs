use blackjack::GameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Game error: {0}")]
    Game(#[from] GameError),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
