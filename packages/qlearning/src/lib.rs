//! Tabular Q-learning agents for the Blackjack environments and the loop that
//! trains them.

mod agent;
mod error;
mod q_agent;
mod q_table;
mod random_agent;
mod state_key;
pub mod training;

pub use agent::{Agent, Checkpoint};
pub use error::Error;
pub use q_agent::{AgentConfig, QLearningAgent};
pub use q_table::QTable;
pub use random_agent::RandomAgent;
pub use state_key::StateKey;
pub use training::{run_episode, train, TrainingConfig, TrainingSummary, WindowStats};
