mod common;

use common::{session_config, small_dqn, ScriptedEnv};
use rl::{DqnAgent, DqnConfig, JsonFileStore, MemoryStore, Mode, ParameterStore, RlError, TrainingSession, MODEL_KEY};

fn trained(seed: u64, config: DqnConfig) -> TrainingSession<ScriptedEnv> {
    let agent = DqnAgent::new(config, seed).unwrap();
    let mut session = TrainingSession::new(ScriptedEnv::new(4), agent, session_config(100)).unwrap();
    session.start_training().unwrap();
    session.advance(60);
    session.stop();
    session
}

#[test]
fn file_store_round_trips_and_resyncs_target() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("models"));

    let source = trained(1, small_dqn());
    source.save(&mut store).unwrap();
    assert!(store.path_for(MODEL_KEY).exists());

    let mut restored = trained(2, small_dqn());
    assert_ne!(restored.agent().online().export_params(), source.agent().online().export_params());
    restored.load(&store).unwrap();

    let agent = restored.agent();
    assert_eq!(agent.online().export_params(), source.agent().online().export_params());
    assert_eq!(agent.target().export_params(), agent.online().export_params());
    assert_eq!(agent.epsilon(), agent.config().epsilon_end);
    assert!(agent.replay().is_empty());
    assert_eq!(restored.episode(), 0);
    assert_eq!(restored.history().total(), 0);
    assert_eq!(restored.env().scores, (0, 0));
    assert_eq!(restored.mode(), Mode::Idle);
}

#[test]
fn missing_model_leaves_agent_usable() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let mut session = trained(3, small_dqn());
    let before = session.agent().online().export_params();
    let stored = session.agent().replay().len();

    assert!(matches!(session.load(&store), Err(RlError::NoModel { .. })));
    assert_eq!(session.agent().online().export_params(), before);
    assert_eq!(session.agent().replay().len(), stored);
    session.start_training().unwrap();
    session.advance(8);
}

#[test]
fn incompatible_model_is_rejected_without_side_effects() {
    let mut store = MemoryStore::new();
    trained(4, DqnConfig { hidden_layers: vec![12], ..small_dqn() }).save(&mut store).unwrap();

    let mut session = trained(5, small_dqn());
    let online = session.agent().online().export_params();
    let target = session.agent().target().export_params();
    let epsilon = session.agent().epsilon();

    assert!(matches!(session.load(&store), Err(RlError::IncompatibleModel(_))));
    assert_eq!(session.agent().online().export_params(), online);
    assert_eq!(session.agent().target().export_params(), target);
    assert_eq!(session.agent().epsilon(), epsilon);
    assert_eq!(session.mode(), Mode::Stopped);
}

#[test]
fn corrupt_file_is_a_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    std::fs::write(store.path_for(MODEL_KEY), "{ not json").unwrap();
    let mut session = trained(6, small_dqn());
    assert!(matches!(session.load(&store), Err(RlError::Serialization(_))));
}

#[test]
fn save_and_load_are_refused_while_training() {
    let mut store = MemoryStore::new();
    let agent = DqnAgent::new(small_dqn(), 7).unwrap();
    let mut session = TrainingSession::new(ScriptedEnv::new(4), agent, session_config(100)).unwrap();
    session.start_training().unwrap();

    assert!(matches!(session.save(&mut store), Err(RlError::Busy { .. })));
    assert!(!store.contains(MODEL_KEY));
    assert!(matches!(session.load(&store), Err(RlError::Busy { .. })));

    session.stop();
    session.save(&mut store).unwrap();
    assert_eq!(store.load(MODEL_KEY).unwrap(), session.agent().export_online());
}
