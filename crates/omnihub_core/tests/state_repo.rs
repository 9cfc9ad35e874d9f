use omnihub_core::db::open_db_in_memory;
use omnihub_core::model::note::NewNote;
use omnihub_core::repo::state_repo::DEFAULT_STATE_KEY;
use omnihub_core::{AppState, RecordStore, RepoError, SqliteStateRepository, StateRepository};
use rusqlite::params;
use uuid::Uuid;

fn sample_state() -> AppState {
    let mut state = AppState::default();
    state
        .notes
        .push(NewNote::text("groceries", "milk").into_note(Uuid::new_v4(), 1_700_000_000_000));
    state
}

#[test]
fn fresh_database_has_no_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::new(&conn);

    assert_eq!(repo.key(), DEFAULT_STATE_KEY);
    assert!(repo.load_state().unwrap().is_none());
}

#[test]
fn save_then_load_returns_the_same_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::new(&conn);
    let state = sample_state();

    repo.save_state(&state).unwrap();
    repo.save_state(&state).unwrap();

    assert_eq!(repo.load_state().unwrap(), Some(state));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM app_state;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn invalid_state_is_never_written() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::new(&conn);
    let mut state = sample_state();
    state.settings.currency = "DOGE".to_string();

    assert!(matches!(
        repo.save_state(&state),
        Err(RepoError::Validation(_))
    ));
    assert!(repo.load_state().unwrap().is_none());
}

#[test]
fn keys_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let primary = SqliteStateRepository::new(&conn);
    let other = SqliteStateRepository::with_key(&conn, "profile_b");

    primary.save_state(&sample_state()).unwrap();
    assert!(other.load_state().unwrap().is_none());
}

#[test]
fn corrupted_snapshot_is_reported_then_quarantined() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO app_state (key, payload, updated_at) VALUES (?1, ?2, 0);",
        params![DEFAULT_STATE_KEY, "{\"notes\": 42"],
    )
    .unwrap();
    let repo = SqliteStateRepository::new(&conn);

    assert!(matches!(repo.load_state(), Err(RepoError::InvalidData(_))));
    assert!(repo.quarantine_state("test").unwrap());
    assert!(!repo.quarantine_state("again").unwrap());
    assert_eq!(repo.backup_count().unwrap(), 1);
    assert!(repo.load_state().unwrap().is_none());
}

#[test]
fn open_recovering_starts_empty_and_keeps_the_bad_payload() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO app_state (key, payload, updated_at) VALUES (?1, ?2, 0);",
        params![DEFAULT_STATE_KEY, "not json at all"],
    )
    .unwrap();

    assert!(RecordStore::open(SqliteStateRepository::new(&conn)).is_err());

    let (store, recovered) =
        RecordStore::open_recovering(SqliteStateRepository::new(&conn)).unwrap();
    assert!(recovered);
    assert!(store.state().is_empty());
    assert_eq!(store.repository().backup_count().unwrap(), 1);

    let payload: String = conn
        .query_row("SELECT payload FROM app_state_backups;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(payload, "not json at all");
}
