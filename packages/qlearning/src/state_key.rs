use blackjack::{Action, Observation};
use serde::{Deserialize, Serialize};

/// Discretized observation used to index the Q-table.
///
/// `dealer_value` is the up-card value (ace = 1) in the standard game and the
/// dealer's final total in the reverse one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey {
    pub player_total: u8,
    pub dealer_value: u8,
    pub usable_ace: bool,
    pub can_double: bool,
    pub can_split: bool,
}

impl StateKey {
    pub fn legal_actions(&self) -> Vec<Action> {
        Action::legal(self.can_double, self.can_split)
    }
}

impl From<&Observation> for StateKey {
    fn from(obs: &Observation) -> Self {
        Self {
            player_total: obs.player_total,
            dealer_value: obs.dealer_value(),
            usable_ace: obs.usable_ace,
            can_double: obs.can_double,
            can_split: obs.can_split,
        }
    }
}
