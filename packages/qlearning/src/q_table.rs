use crate::{Error, StateKey};
use blackjack::Action;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One row of the persisted table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TableEntry {
    state: StateKey,
    values: BTreeMap<Action, f64>,
}

/// Action-value estimates keyed by state. Missing entries read as 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    values: HashMap<StateKey, BTreeMap<Action, f64>>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: &StateKey, action: Action) -> f64 {
        self.values
            .get(state)
            .and_then(|row| row.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Best legal action, ties going to the earliest in `Action::ALL` order.
    pub fn best_action(&self, state: &StateKey) -> Action {
        let mut best = Action::Stand;
        let mut best_value = f64::NEG_INFINITY;
        for action in state.legal_actions() {
            let value = self.get(state, action);
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        best
    }

    /// Highest estimate among the legal actions of `state`.
    pub fn max_value(&self, state: &StateKey) -> f64 {
        state
            .legal_actions()
            .into_iter()
            .map(|a| self.get(state, a))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &BTreeMap<Action, f64>)> {
        self.values.iter()
    }

    /// Write the table as a JSON list of `{state, values}` rows sorted by state.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let mut entries: Vec<TableEntry> = self
            .values
            .iter()
            .map(|(state, values)| TableEntry {
                state: *state,
                values: values.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.state.cmp(&b.state));

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &entries)?;
        writer.flush()?;
        log::debug!("Saved {} states to {}", entries.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path)?);
        let entries: Vec<TableEntry> = serde_json::from_reader(reader)?;
        let values = entries.into_iter().map(|e| (e.state, e.values)).collect();
        Ok(Self { values })
    }
}
