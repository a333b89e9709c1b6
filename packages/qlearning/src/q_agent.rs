use crate::{Agent, Checkpoint, Error, QTable, StateKey};
use blackjack::{Action, Observation};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Learning hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
    /// Exploration probability
    pub epsilon: f64,
    /// Seed for exploration; entropy when unset
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.99,
            epsilon: 0.2,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(Error::InvalidConfig(format!(
                "gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Tabular epsilon-greedy Q-learning agent
pub struct QLearningAgent {
    config: AgentConfig,
    table: QTable,
    rng: ChaCha8Rng,
}

impl QLearningAgent {
    pub fn new(config: AgentConfig) -> Result<Self, Error> {
        Self::with_table(config, QTable::new())
    }

    pub fn with_table(config: AgentConfig, table: QTable) -> Result<Self, Error> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self { config, table, rng })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Replace the table with one read from `path`.
    pub fn load(&mut self, path: &Path) -> Result<(), Error> {
        self.table = QTable::load(path)?;
        log::info!("Loaded {} states from {}", self.table.len(), path.display());
        Ok(())
    }

    /// With probability epsilon a uniformly random legal action, otherwise the
    /// greedy one.
    pub fn choose_action(&mut self, state: &StateKey) -> Action {
        if self.rng.gen::<f64>() < self.config.epsilon {
            let legal = state.legal_actions();
            if let Some(action) = legal.choose(&mut self.rng) {
                return *action;
            }
        }
        self.table.best_action(state)
    }

    /// One-step TD update. Returns the new estimate.
    pub fn update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: Option<StateKey>,
    ) -> f64 {
        let max_next = next_state.map_or(0.0, |next| self.table.max_value(&next));
        let estimate = self.table.get(&state, action);
        let updated = estimate + self.config.alpha * (reward + self.config.gamma * max_next - estimate);
        self.table.set(state, action, updated);
        updated
    }
}

impl Agent for QLearningAgent {
    fn act(&mut self, obs: &Observation) -> Action {
        self.choose_action(&StateKey::from(obs))
    }

    fn observe(&mut self, obs: &Observation, action: Action, reward: f64, next: Option<&Observation>) {
        self.update(StateKey::from(obs), action, reward, next.map(StateKey::from));
    }
}

impl Checkpoint for QLearningAgent {
    fn save(&self, path: &Path) -> Result<(), Error> {
        self.table.save(path)
    }
}
