mod common;

use approx::assert_relative_eq;
use common::{random_transition, small_dqn};
use rl::{bellman_target, DqnAgent, DqnConfig, TrainOutcome};

fn warm_agent(config: DqnConfig, seed: u64) -> DqnAgent {
    let mut agent = DqnAgent::new(config, seed).unwrap();
    let mut rng = fastrand::Rng::with_seed(seed);
    for _ in 0..agent.config().replay_capacity {
        agent.remember(random_transition(&mut rng));
    }
    agent
}

#[test]
fn empty_store_is_not_ready() {
    let mut agent = DqnAgent::new(DqnConfig::default(), 0).unwrap();
    for _ in 0..10 {
        assert_eq!(agent.train(), TrainOutcome::NotReady);
    }
    assert_eq!(agent.epsilon(), 1.0);
    assert_eq!(agent.train_steps(), 0);
}

#[test]
fn one_short_of_threshold_is_not_ready() {
    let config = small_dqn();
    let mut agent = DqnAgent::new(config.clone(), 1).unwrap();
    let mut rng = fastrand::Rng::with_seed(1);
    for _ in 1..config.min_replay_to_train {
        agent.remember(random_transition(&mut rng));
    }
    let before = agent.online().export_params();
    assert_eq!(agent.train(), TrainOutcome::NotReady);
    assert_eq!(agent.online().export_params(), before);

    agent.remember(random_transition(&mut rng));
    assert!(matches!(agent.train(), TrainOutcome::Trained { .. }));
    assert_eq!(agent.train_steps(), 1);
}

#[test]
fn epsilon_is_non_increasing_and_floored() {
    let config = small_dqn();
    let floor = config.epsilon_end;
    let mut agent = warm_agent(config, 2);
    let mut previous = agent.epsilon();
    for _ in 0..100 {
        agent.train();
        let eps = agent.epsilon();
        assert!(eps <= previous);
        assert!(eps >= floor);
        previous = eps;
    }
    assert_relative_eq!(agent.epsilon(), floor);
}

#[test]
fn target_changes_only_on_sync_steps() {
    let config = small_dqn();
    let period = config.target_sync_period;
    let mut agent = warm_agent(config, 4);
    assert_eq!(agent.target().export_params(), agent.online().export_params());

    let mut previous = agent.target().export_params();
    for _ in 0..4 * period {
        agent.train();
        let target = agent.target().export_params();
        if agent.train_steps() % period == 0 {
            assert_ne!(target, previous);
            assert_eq!(target, agent.online().export_params());
        } else {
            assert_eq!(target, previous);
            assert_ne!(target, agent.online().export_params());
        }
        previous = target;
    }
}

#[test]
fn terminal_target_ignores_next_state_value() {
    let mut rng = fastrand::Rng::with_seed(9);
    for _ in 0..1000 {
        let reward = rng.f32() * 2.0 - 1.0;
        let max_next = rng.f32() * 200.0 - 100.0;
        assert_eq!(bellman_target(reward, 0.99, max_next, true), reward);
    }
    assert_relative_eq!(bellman_target(0.1, 0.5, 2.0, false), 1.1);
}

#[test]
fn learning_pulls_terminal_values_toward_reward() {
    let config = DqnConfig {
        min_replay_to_train: 1,
        replay_capacity: 1,
        batch_size: 8,
        learning_rate: 0.01,
        ..small_dqn()
    };
    let mut agent = DqnAgent::new(config, 6).unwrap();
    let obs = [0.3, -0.2, 0.8, 0.1, 0.0, -0.5];
    agent.remember(rl::Transition {
        observation: obs,
        action: 1,
        reward: 1.0,
        next_observation: obs,
        terminal: true,
    });
    let start = (agent.online().q_values(&obs).data[1] - 1.0).abs();
    for _ in 0..300 {
        agent.train();
    }
    let end = (agent.online().q_values(&obs).data[1] - 1.0).abs();
    assert!(end < 0.1, "error went from {start} to {end}");
}

#[test]
fn evaluation_is_greedy_regardless_of_epsilon() {
    let mut agent = DqnAgent::new(small_dqn(), 8).unwrap();
    assert_eq!(agent.epsilon(), 1.0);
    let obs = [0.1, 0.2, -0.3, 0.4, 0.0, 0.5];
    let greedy = agent.online().greedy_action(&obs);
    for _ in 0..200 {
        assert_eq!(agent.choose_action(&obs, true), greedy);
    }
}

#[test]
fn exploration_covers_every_action() {
    let mut agent = DqnAgent::new(small_dqn(), 10).unwrap();
    let obs = [0.0; 6];
    let mut seen = [false; 3];
    for _ in 0..200 {
        seen[agent.choose_action(&obs, false)] = true;
    }
    assert!(seen.iter().all(|&s| s));
    assert_eq!(agent.epsilon(), 1.0);
}

#[test]
fn loading_starts_a_fresh_optimizer() {
    let mut agent = warm_agent(small_dqn(), 12);
    for _ in 0..5 {
        agent.train();
    }
    assert_eq!(agent.optimizer_steps(), 5);

    let params = agent.export_online();
    agent.load_online(&params).unwrap();
    assert_eq!(agent.optimizer_steps(), 0);
    assert_eq!(agent.train_steps(), 0);

    let mut rng = fastrand::Rng::with_seed(12);
    for _ in 0..agent.config().min_replay_to_train {
        agent.remember(random_transition(&mut rng));
    }
    assert!(matches!(agent.train(), TrainOutcome::Trained { .. }));
    assert_eq!(agent.optimizer_steps(), 1);
}

#[test]
fn failed_load_keeps_optimizer_state() {
    let mut agent = warm_agent(small_dqn(), 13);
    agent.train();
    let other = DqnAgent::new(DqnConfig { hidden_layers: vec![5], ..small_dqn() }, 0).unwrap();
    assert!(agent.load_online(&other.export_online()).is_err());
    assert_eq!(agent.optimizer_steps(), 1);
}
