use blackjack::{Action, BlackjackEnv, GameRules, Variant};
use qlearning::{run_episode, AgentConfig, QLearningAgent, RandomAgent, StateKey};

fn seeded_agent(seed: u64) -> QLearningAgent {
    QLearningAgent::new(AgentConfig {
        seed: Some(seed),
        ..AgentConfig::default()
    })
    .unwrap()
}

#[test]
fn reverse_agent_learns_to_stand_on_winning_twenty() {
    let mut env = BlackjackEnv::new(Variant::Reverse, GameRules::default(), Some(12)).unwrap();
    let mut agent = seeded_agent(11);
    for _ in 0..50_000 {
        run_episode(&mut agent, &mut env).unwrap();
    }

    // Hard twenty on two unpaired cards against a dealer that finished on 19
    let state = StateKey {
        player_total: 20,
        dealer_value: 19,
        usable_ace: false,
        can_double: true,
        can_split: false,
    };
    let stand = agent.table().get(&state, Action::Stand);
    let hit = agent.table().get(&state, Action::Hit);
    assert!(stand > 0.5, "Q(stand) = {stand}");
    assert!(stand > hit, "Q(stand) = {stand}, Q(hit) = {hit}");
}

#[test]
fn trained_agent_beats_random_play() {
    let mut env = BlackjackEnv::new(Variant::Reverse, GameRules::default(), Some(50)).unwrap();
    let mut agent = seeded_agent(5);
    for _ in 0..100_000 {
        run_episode(&mut agent, &mut env).unwrap();
    }

    let mut greedy = QLearningAgent::with_table(
        AgentConfig {
            epsilon: 0.0,
            seed: Some(6),
            ..AgentConfig::default()
        },
        agent.table().clone(),
    )
    .unwrap();
    let mut random = RandomAgent::new(Some(6));

    let mut eval_env = BlackjackEnv::new(Variant::Reverse, GameRules::default(), Some(7)).unwrap();
    let greedy_total: f64 = (0..20_000)
        .map(|_| run_episode(&mut greedy, &mut eval_env).unwrap())
        .sum();
    let mut eval_env = BlackjackEnv::new(Variant::Reverse, GameRules::default(), Some(7)).unwrap();
    let random_total: f64 = (0..20_000)
        .map(|_| run_episode(&mut random, &mut eval_env).unwrap())
        .sum();

    assert!(
        greedy_total > random_total,
        "greedy {greedy_total} vs random {random_total}"
    );
}

#[test]
fn resumed_agent_keeps_learned_values() {
    let mut env = BlackjackEnv::new(Variant::Standard, GameRules::default(), Some(30)).unwrap();
    let mut agent = seeded_agent(3);
    for _ in 0..2_000 {
        run_episode(&mut agent, &mut env).unwrap();
    }

    let path = std::env::temp_dir().join(format!("resume-{}.json", std::process::id()));
    qlearning::Checkpoint::save(&agent, &path).unwrap();

    let mut resumed = seeded_agent(3);
    resumed.load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(resumed.table(), agent.table());
}
