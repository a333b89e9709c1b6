use crate::Agent;
use blackjack::{Action, Observation};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Chooses uniformly among legal actions and learns nothing.
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, obs: &Observation) -> Action {
        obs.legal_actions()
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::Stand)
    }

    fn observe(&mut self, _obs: &Observation, _action: Action, _reward: f64, _next: Option<&Observation>) {}
}
