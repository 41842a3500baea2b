use solace_core::TopicKey;
use solace_core::session::{Message, Session, StoreRepository, StoreSnapshot};
use solace_infrastructure::{JsonStoreRepository, SolacePaths};
use tempfile::TempDir;

fn sample_snapshot() -> StoreSnapshot {
    let mut snapshot = StoreSnapshot::with_default_session();
    let mut session = Session::new();
    session.title = "Work worries".to_string();
    session.messages.push(Message::user("I am stressed about work"));
    session.messages.push(Message::assistant(
        "That sounds like a lot to carry.",
        Some(TopicKey::Stress),
    ));
    snapshot.active_session_id = session.id.clone();
    snapshot.sessions.push(session);
    snapshot
}

#[test]
fn test_save_then_reload_is_identical() {
    let temp_dir = TempDir::new().unwrap();
    let repo = JsonStoreRepository::at(&SolacePaths::new(Some(temp_dir.path()))).unwrap();
    let snapshot = sample_snapshot();

    repo.save(&snapshot).expect("save should succeed");

    let reopened = JsonStoreRepository::new(temp_dir.path().join("chat_sessions.json"));
    let loaded = reopened.load().unwrap().expect("store should exist");

    let ids = |s: &StoreSnapshot| s.sessions.iter().map(|x| x.id.clone()).collect::<Vec<_>>();
    let titles = |s: &StoreSnapshot| s.sessions.iter().map(|x| x.title.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&loaded), ids(&snapshot));
    assert_eq!(titles(&loaded), titles(&snapshot));
    for (a, b) in loaded.sessions.iter().zip(&snapshot.sessions) {
        assert_eq!(a.messages, b.messages);
    }
    assert_eq!(loaded.active_session_id, snapshot.active_session_id);
}

#[test]
fn test_file_uses_current_schema() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chat_sessions.json");
    let repo = JsonStoreRepository::new(path.clone());
    repo.save(&sample_snapshot()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(raw["version"], "1.0.0");
    assert!(raw["sessions"].is_array());
    assert_eq!(raw["sessions"][1]["messages"][2]["resource_key"], "stress");
    assert_eq!(raw["sessions"][1]["messages"][1]["role"], "user");
}
