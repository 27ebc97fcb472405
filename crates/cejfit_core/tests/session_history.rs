use cejfit_core::db::open_db_in_memory;
use cejfit_core::{
    ExerciseFields, ExerciseId, ExerciseRepository, LastSet, RepoError, SessionDraft, SessionId,
    SessionRepository, SqliteExerciseRepository, SqliteSessionRepository, ValidationError,
    WeightUnit, WorkoutStore,
};
use chrono::NaiveDate;
use rusqlite::Connection;

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn add_exercise(store: &WorkoutStore, name: &str) -> ExerciseId {
    store.add_exercise(&ExerciseFields::new(name)).unwrap()
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn row_session_scenario() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let row = add_exercise(&store, "Row");

    let session = store.add_session(row, date("2024-01-10"), "").unwrap();
    store
        .add_set(session, 1, 100.0, 8, Some(2), WeightUnit::Lbs)
        .unwrap();

    let sets: Vec<_> = store
        .list_sets(session)
        .unwrap()
        .into_iter()
        .map(|set| (set.set_index, set.weight, set.reps, set.rir, set.unit.as_str()))
        .collect();
    assert_eq!(sets, vec![(1, 100.0, 8, Some(2), "lbs")]);

    let exercise = store.get_exercise(row).unwrap().unwrap();
    assert_eq!(exercise.last_session, Some(date("2024-01-10")));

    store.delete_session(session).unwrap();
    assert!(store.list_sessions(row).unwrap().is_empty());
    assert!(store.list_sets(session).unwrap().is_empty());
    assert_eq!(store.get_exercise(row).unwrap().unwrap().last_session, None);
}

#[test]
fn sessions_list_newest_first_and_sets_by_index() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let bench = add_exercise(&store, "Bench");

    let older = store.add_session(bench, date("2024-01-02"), "").unwrap();
    let newer = store.add_session(bench, date("2024-02-20"), "paused reps").unwrap();
    let middle = store.add_session(bench, date("2024-01-15"), "  ").unwrap();

    let sessions = store.list_sessions(bench).unwrap();
    let ids: Vec<_> = sessions.iter().map(|session| session.id).collect();
    assert_eq!(ids, vec![newer, middle, older]);
    assert_eq!(sessions[0].notes.as_deref(), Some("paused reps"));
    assert_eq!(sessions[1].notes, None);

    for index in [3, 1, 2] {
        store
            .add_set(newer, index, 100.0 + f64::from(index), 5, None, WeightUnit::Kg)
            .unwrap();
    }
    let indices: Vec<_> = store
        .list_sets(newer)
        .unwrap()
        .into_iter()
        .map(|set| set.set_index)
        .collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[test]
fn deleting_exercise_cascades_to_sessions_and_sets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cascade.db");
    let store = WorkoutStore::initialize(&path).unwrap();
    let keep = add_exercise(&store, "Keep");
    let doomed = add_exercise(&store, "Doomed");

    let mut draft = SessionDraft::new(date("2024-04-01"));
    draft.push_set(50.0, 10, None, WeightUnit::Lbs);
    draft.push_set(55.0, 8, Some(1), WeightUnit::Lbs);
    let kept_session = store.save_session(keep, &draft).unwrap();
    let doomed_a = store.save_session(doomed, &draft).unwrap();
    let doomed_b = store.save_session(doomed, &draft).unwrap();

    store.delete_exercise(doomed).unwrap();

    assert!(store.get_exercise(doomed).unwrap().is_none());
    assert!(store.list_sessions(doomed).unwrap().is_empty());
    assert!(store.list_sets(doomed_a).unwrap().is_empty());
    assert!(store.list_sets(doomed_b).unwrap().is_empty());

    assert_eq!(store.list_sets(kept_session).unwrap().len(), 2);
    store.close().unwrap();

    let conn = Connection::open(&path).unwrap();
    let orphaned: i64 = conn
        .query_row(
            "SELECT COUNT(*)
             FROM sets
             WHERE session_id NOT IN (SELECT id FROM sessions);",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphaned, 0);
    assert_eq!(count_rows(&conn, "sessions"), 1);
    assert_eq!(count_rows(&conn, "sets"), 2);
}

#[test]
fn save_session_writes_session_and_all_sets() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let squat = add_exercise(&store, "Front Squat");

    let mut draft = SessionDraft::new(date("2024-05-05")).with_notes(" belt on ");
    draft.push_set(60.0, 5, Some(3), WeightUnit::Kg);
    draft.push_set(70.0, 5, Some(2), WeightUnit::Kg);
    draft.push_set(80.0, 3, None, WeightUnit::Kg);
    draft.remove_set(2);

    let session_id = store.save_session(squat, &draft).unwrap();

    let sessions = store.list_sessions(squat).unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, session_id);
    assert_eq!(sessions[0].date, date("2024-05-05"));
    assert_eq!(sessions[0].notes.as_deref(), Some("belt on"));

    let sets: Vec<_> = store
        .list_sets(session_id)
        .unwrap()
        .into_iter()
        .map(|set| (set.set_index, set.weight, set.rir))
        .collect();
    assert_eq!(sets, vec![(1, 60.0, Some(3)), (2, 80.0, None)]);
}

#[test]
fn save_session_rejects_empty_draft() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let curl = add_exercise(&store, "Curl");

    let draft = SessionDraft::new(date("2024-05-05"));
    let err = store.save_session(curl, &draft).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptySession)
    ));
    assert!(store.list_sessions(curl).unwrap().is_empty());
}

#[test]
fn save_session_is_atomic_when_a_set_insert_fails() {
    let conn = open_db_in_memory().unwrap();
    let exercise_id = SqliteExerciseRepository::try_new(&conn)
        .unwrap()
        .create_exercise(&ExerciseFields::new("Press"))
        .unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_third_set BEFORE INSERT ON sets
         WHEN NEW.set_index = 3
         BEGIN
             SELECT RAISE(ABORT, 'third set rejected');
         END;",
    )
    .unwrap();

    let repo = SqliteSessionRepository::try_new(&conn).unwrap();
    let mut draft = SessionDraft::new(date("2024-06-01"));
    for weight in [40.0, 45.0, 50.0] {
        draft.push_set(weight, 6, None, WeightUnit::Kg);
    }

    let err = repo.save_draft(exercise_id, &draft).unwrap_err();
    assert!(matches!(err, RepoError::Storage(_)));
    assert!(err.to_string().contains("third set rejected"));

    assert_eq!(count_rows(&conn, "sessions"), 0);
    assert_eq!(count_rows(&conn, "sets"), 0);
    // The draft survives for a retry.
    assert_eq!(draft.len(), 3);
}

#[test]
fn session_for_unknown_exercise_is_a_storage_error() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let err = store
        .add_session(ExerciseId(4_242), date("2024-01-01"), "")
        .unwrap_err();
    assert!(matches!(err, RepoError::Storage(_)));
}

#[test]
fn duplicate_set_index_within_a_session_is_rejected() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let bench = add_exercise(&store, "Bench");
    let session = store.add_session(bench, date("2024-01-01"), "").unwrap();

    store
        .add_set(session, 1, 100.0, 5, None, WeightUnit::Lbs)
        .unwrap();
    let err = store
        .add_set(session, 1, 105.0, 5, None, WeightUnit::Lbs)
        .unwrap_err();
    assert!(matches!(err, RepoError::Storage(_)));
}

#[test]
fn last_set_prefers_latest_date_then_highest_index() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let deadlift = add_exercise(&store, "Deadlift");
    assert_eq!(store.last_set_for(deadlift).unwrap(), None);

    let mut latest = SessionDraft::new(date("2024-03-10"));
    latest.push_set(300.0, 5, Some(2), WeightUnit::Lbs);
    latest.push_set(315.0, 3, Some(1), WeightUnit::Lbs);
    store.save_session(deadlift, &latest).unwrap();

    // Saved later but dated earlier: must not win.
    let mut backfilled = SessionDraft::new(date("2024-03-01"));
    for weight in [200.0, 250.0, 275.0, 285.0] {
        backfilled.push_set(weight, 5, None, WeightUnit::Kg);
    }
    store.save_session(deadlift, &backfilled).unwrap();

    assert_eq!(
        store.last_set_for(deadlift).unwrap(),
        Some(LastSet {
            weight: 315.0,
            reps: 3,
            rir: Some(1),
            unit: WeightUnit::Lbs,
        })
    );
}

#[test]
fn last_set_is_scoped_to_the_exercise() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let bench = add_exercise(&store, "Bench");
    let row = add_exercise(&store, "Row");

    let mut draft = SessionDraft::new(date("2024-07-01"));
    draft.push_set(80.0, 10, None, WeightUnit::Kg);
    store.save_session(row, &draft).unwrap();

    assert_eq!(store.last_set_for(bench).unwrap(), None);
    assert_eq!(store.last_set_for(row).unwrap().unwrap().weight, 80.0);
}

#[test]
fn session_history_reports_first_set_and_count() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let ohp = add_exercise(&store, "Overhead Press");

    let mut first = SessionDraft::new(date("2024-02-01"));
    first.push_set(60.0, 8, Some(2), WeightUnit::Kg);
    store.save_session(ohp, &first).unwrap();

    let mut second = SessionDraft::new(date("2024-02-08")).with_notes("new PR");
    second.push_set(62.5, 8, Some(1), WeightUnit::Kg);
    second.push_set(62.5, 7, Some(0), WeightUnit::Kg);
    store.save_session(ohp, &second).unwrap();

    let history = store.session_history(ohp).unwrap();
    assert_eq!(history.len(), 2);

    assert_eq!(history[0].session.date, date("2024-02-08"));
    assert_eq!(history[0].session.notes.as_deref(), Some("new PR"));
    assert_eq!(history[0].set_count, 2);
    let headline = history[0].first_set.as_ref().unwrap();
    assert_eq!((headline.set_index, headline.weight, headline.reps), (1, 62.5, 8));

    assert_eq!(history[1].session.date, date("2024-02-01"));
    assert_eq!(history[1].set_count, 1);
}

#[test]
fn redo_previous_session_as_new_draft() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let lunge = add_exercise(&store, "Lunge");

    let mut draft = SessionDraft::new(date("2024-08-01"));
    draft.push_set(20.0, 12, None, WeightUnit::Kg);
    draft.push_set(22.5, 10, Some(2), WeightUnit::Kg);
    let previous = store.save_session(lunge, &draft).unwrap();

    let repeat = SessionDraft::from_existing(date("2024-08-04"), &store.list_sets(previous).unwrap());
    let repeated = store.save_session(lunge, &repeat).unwrap();

    let weights: Vec<f64> = store
        .list_sets(repeated)
        .unwrap()
        .into_iter()
        .map(|set| set.weight)
        .collect();
    assert_eq!(weights, vec![20.0, 22.5]);
    assert_eq!(
        store.get_exercise(lunge).unwrap().unwrap().last_session,
        Some(date("2024-08-04"))
    );
}

#[test]
fn store_close_releases_file_for_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.db");

    let store = WorkoutStore::initialize(&path).unwrap();
    let bench = add_exercise(&store, "Bench");
    let mut draft = SessionDraft::new(date("2024-09-09"));
    draft.push_set(100.0, 5, None, WeightUnit::Lbs);
    store.save_session(bench, &draft).unwrap();
    store.close().unwrap();

    let reopened = WorkoutStore::initialize(&path).unwrap();
    assert_eq!(reopened.list_sessions(bench).unwrap().len(), 1);
    reopened.close().unwrap();
}

#[test]
fn get_session_finds_saved_session_and_misses_deleted_one() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let dips = add_exercise(&store, "Dips");

    let mut draft = SessionDraft::new(date("2024-07-02")).with_notes("weighted");
    draft.push_set(25.0, 8, Some(2), WeightUnit::Lbs);
    let session_id = store.save_session(dips, &draft).unwrap();

    let session = store.get_session(session_id).unwrap().unwrap();
    assert_eq!(session.exercise_id, dips);
    assert_eq!(session.date, date("2024-07-02"));
    assert_eq!(session.notes.as_deref(), Some("weighted"));

    store.delete_session(session_id).unwrap();
    assert!(store.get_session(session_id).unwrap().is_none());
    assert!(store.get_session(SessionId(9_999)).unwrap().is_none());
}
