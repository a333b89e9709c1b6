use crate::Action;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Invalid action {action:?}: {reason}")]
    InvalidAction { action: Action, reason: &'static str },
    #[error("Episode over; call reset() first")]
    EpisodeOver,
    #[error("Invalid rules: {0}")]
    InvalidRules(String),
}
