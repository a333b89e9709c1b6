use blackjack::{BlackjackEnv, GameRules, PayoutRatio, Variant};
use clap::{Parser, Subcommand, ValueEnum};
use qlearning::{train, AgentConfig, QLearningAgent, TrainingConfig};
use std::path::PathBuf;

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(
    name = "blackjack-trainer",
    about = "Train a tabular Q-learning agent on Blackjack"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    Standard,
    Reverse,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Standard => Variant::Standard,
            VariantArg::Reverse => Variant::Reverse,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run a training session and write checkpoints
    Train {
        /// standard: act on the dealer's up-card; reverse: the dealer plays first
        #[arg(long, value_enum, env = "BJ_VARIANT", default_value = "standard")]
        variant: VariantArg,

        #[arg(long, env = "BJ_EPISODES", default_value = "500000")]
        episodes: u64,

        /// Statistics and checkpoint interval in episodes
        #[arg(long, env = "BJ_SAVE_EVERY", default_value = "10000")]
        save_every: u64,

        /// Output directory (default: saves, or saves/reverse for the reverse game)
        #[arg(long, env = "BJ_SAVE_DIR")]
        save_dir: Option<PathBuf>,

        /// Learning rate
        #[arg(long, env = "BJ_ALPHA", default_value = "0.1")]
        alpha: f64,

        /// Discount factor
        #[arg(long, env = "BJ_GAMMA", default_value = "0.99")]
        gamma: f64,

        /// Exploration probability
        #[arg(long, env = "BJ_EPSILON", default_value = "0.2")]
        epsilon: f64,

        /// Seed for the shoe and the agent; entropy when unset
        #[arg(long, env = "BJ_SEED")]
        seed: Option<u64>,

        /// Continue from a saved Q-table
        #[arg(long)]
        resume: Option<PathBuf>,

        #[arg(long, default_value = "1")]
        num_decks: u8,

        /// Dealer hits soft 17
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        dealer_hits_soft_17: bool,

        /// Blackjack payout ratio (e.g. "3:2", "6:5")
        #[arg(long, default_value = "3:2")]
        blackjack_payout: String,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    logger_builder().init();

    let cli = Cli::parse();

    match cli.command {
        Command::Train {
            variant,
            episodes,
            save_every,
            save_dir,
            alpha,
            gamma,
            epsilon,
            seed,
            resume,
            num_decks,
            dealer_hits_soft_17,
            blackjack_payout,
        } => {
            let variant = Variant::from(variant);
            let save_dir = save_dir.unwrap_or_else(|| default_save_dir(variant));
            let training = TrainingConfig {
                episodes,
                save_every,
                save_dir,
                ..TrainingConfig::default()
            };
            let agent = AgentConfig {
                alpha,
                gamma,
                epsilon,
                seed,
            };
            let rules = match parse_payout_ratio(&blackjack_payout) {
                Ok(blackjack_payout) => GameRules {
                    num_decks,
                    dealer_hits_soft_17,
                    blackjack_payout,
                    ..GameRules::default()
                },
                Err(e) => {
                    log::error!("Invalid rules: {e}");
                    std::process::exit(1);
                }
            };

            if let Err(e) = cmd_train(variant, rules, agent, &training, resume) {
                log::error!("Training failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn cmd_train(
    variant: Variant,
    rules: GameRules,
    agent_config: AgentConfig,
    training: &TrainingConfig,
    resume: Option<PathBuf>,
) -> Result<(), BoxErr> {
    let mut env = BlackjackEnv::new(variant, rules, shoe_seed(agent_config.seed))?;
    let mut agent = QLearningAgent::new(agent_config)?;
    if let Some(path) = resume {
        agent.load(&path)?;
    }

    let summary = train(&mut agent, &mut env, training)?;
    log::info!(
        "Trained {} episodes over {} states, final balance ${:.2}",
        summary.episodes,
        agent.table().len(),
        summary.final_balance
    );
    Ok(())
}

/// Reads `RUST_LOG`, so `.env` has to be loaded before this is called
fn logger_builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
}

/// Shoe seed derived from the run seed so shuffling and exploration draw
/// from different streams
fn shoe_seed(seed: Option<u64>) -> Option<u64> {
    seed.map(|s| s.wrapping_add(1))
}

fn default_save_dir(variant: Variant) -> PathBuf {
    match variant {
        Variant::Standard => PathBuf::from("saves"),
        Variant::Reverse => PathBuf::from("saves").join("reverse"),
    }
}

fn parse_payout_ratio(s: &str) -> Result<PayoutRatio, BoxErr> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid payout ratio '{s}', expected format 'N:D'").into());
    }
    Ok(PayoutRatio::new(parts[0].parse()?, parts[1].parse()?)?)
}
