mod card;
mod env;
mod error;
mod game_state;
mod hand;
mod rules;
mod shoe;

pub use card::{Card, Rank, Suit};
pub use env::{Action, BlackjackEnv, DealerView, Observation, Step, Variant};
pub use error::GameError;
pub use game_state::{GamePhase, GameState, Spot};
pub use hand::{
    calculate_hand_value, can_split_cards, hard_total, is_blackjack, is_busted, is_soft_hand,
    Hand, HandOutcome,
};
pub use rules::{GameRules, PayoutRatio};
pub use shoe::Shoe;
