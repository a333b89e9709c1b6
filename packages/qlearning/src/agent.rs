use crate::Error;
use blackjack::{Action, Observation};
use std::path::Path;

/// A Blackjack player that can learn from its own transitions.
pub trait Agent {
    /// Pick a legal action for `obs`.
    fn act(&mut self, obs: &Observation) -> Action;

    /// Learn from one transition. `next` is `None` when the round ended.
    fn observe(&mut self, obs: &Observation, action: Action, reward: f64, next: Option<&Observation>);
}

/// Agents whose learned state can be written to disk
pub trait Checkpoint {
    fn save(&self, path: &Path) -> Result<(), Error>;
}
