use crate::{Agent, Checkpoint, Error};
use blackjack::{BlackjackEnv, HandOutcome};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const LOG_FILE: &str = "training.log";
pub const FINAL_TABLE: &str = "q_learning.json";

pub fn checkpoint_name(episode: u64) -> String {
    format!("q_learning_{episode}.json")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub episodes: u64,
    /// Statistics and a checkpoint every this many episodes
    pub save_every: u64,
    pub save_dir: PathBuf,
    /// Notional bankroll the statistics start from
    pub initial_money: f64,
    /// Notional money per unit of stake
    pub bet_size: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500_000,
            save_every: 10_000,
            save_dir: PathBuf::from("saves"),
            initial_money: 10_000.0,
            bet_size: 100.0,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.save_every == 0 {
            return Err(Error::InvalidConfig("save_every must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Counters for the hands played since the last checkpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowStats {
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
    pub blackjacks: u64,
    pub profit: f64,
}

impl WindowStats {
    pub fn record(&mut self, outcomes: &[HandOutcome], profit: f64) {
        for outcome in outcomes {
            match outcome {
                HandOutcome::Win => self.wins += 1,
                HandOutcome::Loss => self.losses += 1,
                HandOutcome::Push => self.pushes += 1,
                HandOutcome::Blackjack => self.blackjacks += 1,
            }
        }
        self.profit += profit;
    }

    pub fn hands(&self) -> u64 {
        self.wins + self.losses + self.pushes + self.blackjacks
    }

    fn rate(&self, count: u64) -> f64 {
        match self.hands() {
            0 => 0.0,
            hands => count as f64 / hands as f64,
        }
    }

    pub fn profit_per_hand(&self) -> f64 {
        match self.hands() {
            0 => 0.0,
            hands => self.profit / hands as f64,
        }
    }

    /// Report block for episodes `first..=last`
    pub fn report(&self, first: u64, last: u64, balance: f64) -> String {
        format!(
            "Episodes {first:>6}-{last:<6}\n\
             Win Rate: {:.1}%\n\
             Loss Rate: {:.1}%\n\
             Push Rate: {:.1}%\n\
             Blackjack Rate: {:.1}%\n\
             Profit per Hand: {}\n\
             Window Profit: {}\n\
             Current Balance: {}",
            self.rate(self.wins) * 100.0,
            self.rate(self.losses) * 100.0,
            self.rate(self.pushes) * 100.0,
            self.rate(self.blackjacks) * 100.0,
            format_money(self.profit_per_hand()),
            format_money(self.profit),
            format_money(balance),
        )
    }
}

/// Dollar amount with thousands separators, e.g. `$10,150.00` or `$-37.50`
pub fn format_money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("${sign}{grouped}.{cents}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub episodes: u64,
    pub final_balance: f64,
    pub final_table: PathBuf,
}

/// Play one round to the end, feeding every transition to the agent.
/// Returns the round's total reward in stake units.
pub fn run_episode<A: Agent>(agent: &mut A, env: &mut BlackjackEnv) -> Result<f64, Error> {
    let mut obs = env.reset();
    let mut total = 0.0;
    loop {
        let action = agent.act(&obs);
        let step = env.step(action)?;
        agent.observe(&obs, action, step.reward, step.observation.as_ref());
        total += step.reward;
        match step.observation {
            Some(next) => obs = next,
            None => return Ok(total),
        }
    }
}

/// Train `agent` for `config.episodes` rounds, writing statistics to the log
/// and a checkpoint every `config.save_every` rounds, then the final table.
pub fn train<A: Agent + Checkpoint>(
    agent: &mut A,
    env: &mut BlackjackEnv,
    config: &TrainingConfig,
) -> Result<TrainingSummary, Error> {
    config.validate()?;
    std::fs::create_dir_all(&config.save_dir)?;

    let mut log_file = BufWriter::new(File::create(config.save_dir.join(LOG_FILE))?);
    writeln!(
        log_file,
        "Starting training for {} episodes ({:?} variant)...",
        config.episodes,
        env.variant()
    )?;
    log::info!(
        "Starting training for {} episodes ({:?} variant), saving to {}",
        config.episodes,
        env.variant(),
        config.save_dir.display()
    );

    let start = Instant::now();
    let mut balance = config.initial_money;
    let mut window = WindowStats::default();

    for episode in 1..=config.episodes {
        let reward = run_episode(agent, env)?;
        let profit = reward * config.bet_size;
        balance += profit;
        window.record(&env.outcomes(), profit);

        if episode % config.save_every == 0 {
            let report = window.report(episode - config.save_every + 1, episode, balance);
            for line in report.lines() {
                log::info!("{line}");
            }
            writeln!(log_file, "\n{report}")?;
            log_file.flush()?;

            save_checkpoint(agent, &config.save_dir, &checkpoint_name(episode))?;
            window = WindowStats::default();
        }
    }

    let final_table = save_checkpoint(agent, &config.save_dir, FINAL_TABLE)?;
    let elapsed = start.elapsed().as_secs_f64();
    writeln!(log_file, "\nTraining complete in {elapsed:.1} seconds")?;
    writeln!(log_file, "Final Q-table saved to {}", final_table.display())?;
    log_file.flush()?;
    log::info!(
        "Training complete in {elapsed:.1} seconds, final table at {}",
        final_table.display()
    );

    Ok(TrainingSummary {
        episodes: config.episodes,
        final_balance: balance,
        final_table,
    })
}

fn save_checkpoint<A: Checkpoint>(agent: &A, dir: &Path, name: &str) -> Result<PathBuf, Error> {
    let path = dir.join(name);
    agent.save(&path)?;
    log::info!("Saved checkpoint {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AgentConfig, QLearningAgent, QTable};
    use blackjack::{GameRules, Variant};

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bj-training-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_window_stats_rates() {
        let mut stats = WindowStats::default();
        stats.record(&[HandOutcome::Win, HandOutcome::Loss], 0.0);
        stats.record(&[HandOutcome::Blackjack], 150.0);
        stats.record(&[HandOutcome::Push], 0.0);
        assert_eq!(stats.hands(), 4);
        assert_eq!(stats.profit_per_hand(), 37.5);

        let report = stats.report(1, 4, 10_150.0);
        assert!(report.starts_with("Episodes      1-4"));
        assert!(report.contains("Win Rate: 25.0%"));
        assert!(report.contains("Blackjack Rate: 25.0%"));
        assert!(report.contains("Profit per Hand: $37.50"));
        assert!(report.contains("Current Balance: $10,150.00"));
    }

    #[test]
    fn test_format_money_groups_thousands() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(10_150.0), "$10,150.00");
        assert_eq!(format_money(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_money(-2_500.0), "$-2,500.00");
    }

    #[test]
    fn test_empty_window_has_zero_rates() {
        let stats = WindowStats::default();
        assert_eq!(stats.profit_per_hand(), 0.0);
        assert!(stats.report(1, 1, 0.0).contains("Win Rate: 0.0%"));
    }

    #[test]
    fn test_train_writes_checkpoints() {
        let dir = temp_dir("checkpoints");
        let config = TrainingConfig {
            episodes: 50,
            save_every: 20,
            save_dir: dir.clone(),
            ..TrainingConfig::default()
        };
        let mut env = BlackjackEnv::new(Variant::Standard, GameRules::default(), Some(4)).unwrap();
        let mut agent = QLearningAgent::new(AgentConfig {
            seed: Some(5),
            ..AgentConfig::default()
        })
        .unwrap();

        let summary = train(&mut agent, &mut env, &config).unwrap();

        assert_eq!(summary.episodes, 50);
        assert!(dir.join(checkpoint_name(20)).exists());
        assert!(dir.join(checkpoint_name(40)).exists());
        assert!(!dir.join(checkpoint_name(50)).exists());
        assert_eq!(summary.final_table, dir.join(FINAL_TABLE));

        let saved = QTable::load(&summary.final_table).unwrap();
        assert_eq!(&saved, agent.table());
        assert!(!saved.is_empty());

        let log = std::fs::read_to_string(dir.join(LOG_FILE)).unwrap();
        assert!(log.starts_with("Starting training for 50 episodes"));
        assert_eq!(log.matches("Win Rate:").count(), 2);
        assert!(log.contains("Training complete"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_train_rejects_zero_interval() {
        let config = TrainingConfig {
            save_every: 0,
            save_dir: temp_dir("zero"),
            ..TrainingConfig::default()
        };
        let mut env = BlackjackEnv::new(Variant::Reverse, GameRules::default(), Some(1)).unwrap();
        let mut agent = QLearningAgent::new(AgentConfig::default()).unwrap();
        assert!(matches!(
            train(&mut agent, &mut env, &config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
