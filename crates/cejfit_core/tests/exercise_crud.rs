use cejfit_core::db::{open_db_in_memory, STARTER_EXERCISES};
use cejfit_core::{
    ExerciseFields, ExerciseId, ExerciseRepository, RepoError, SqliteExerciseRepository,
    WorkoutStore,
};
use chrono::NaiveDate;

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[test]
fn first_initialize_seeds_starter_exercises() {
    let store = WorkoutStore::initialize_in_memory().unwrap();

    let names: Vec<String> = store
        .list_exercises()
        .unwrap()
        .into_iter()
        .map(|exercise| exercise.name)
        .collect();
    assert_eq!(names.len(), STARTER_EXERCISES.len());
    // Back (Pull Ups, Squat) sorts before Biceps.
    assert_eq!(names, vec!["Pull Ups", "Squat", "Hammer Curls"]);
}

#[test]
fn reopening_does_not_reseed_or_restore_deleted_starters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.db");

    let store = WorkoutStore::initialize(&path).unwrap();
    let squat = find_id(&store, "Squat");
    store.delete_exercise(squat).unwrap();
    store.close().unwrap();

    let store = WorkoutStore::initialize(&path).unwrap();
    let exercises = store.list_exercises().unwrap();
    assert_eq!(exercises.len(), STARTER_EXERCISES.len() - 1);
    assert!(exercises.iter().all(|exercise| exercise.name != "Squat"));
}

#[test]
fn repository_on_unseeded_connection_starts_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExerciseRepository::try_new(&conn).unwrap();
    assert!(repo.list_exercises().unwrap().is_empty());
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteExerciseRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn add_then_list_round_trip_has_no_last_session() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    store
        .add_exercise(&ExerciseFields::new("Bench").body_part("Chest"))
        .unwrap();

    let benches: Vec<_> = store
        .list_exercises()
        .unwrap()
        .into_iter()
        .filter(|exercise| exercise.name == "Bench")
        .collect();
    assert_eq!(benches.len(), 1);
    assert_eq!(benches[0].body_part.as_deref(), Some("Chest"));
    assert_eq!(benches[0].last_session, None);
}

#[test]
fn add_trims_every_field() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let id = store
        .add_exercise(
            &ExerciseFields::new("  Dips ")
                .body_part(" Chest ")
                .equipment("  ")
                .notes(" Lean forward ")
                .subgroup("\tLower Chest\n"),
        )
        .unwrap();

    let dips = store.get_exercise(id).unwrap().unwrap();
    assert_eq!(dips.name, "Dips");
    assert_eq!(dips.body_part.as_deref(), Some("Chest"));
    assert_eq!(dips.equipment, None);
    assert_eq!(dips.notes.as_deref(), Some("Lean forward"));
    assert_eq!(dips.subgroup.as_deref(), Some("Lower Chest"));
}

#[test]
fn duplicate_name_is_rejected_and_count_unchanged() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    store.add_exercise(&ExerciseFields::new("Bench")).unwrap();
    let before = store.list_exercises().unwrap().len();

    let err = store
        .add_exercise(&ExerciseFields::new(" Bench ").body_part("Chest"))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateName(ref name) if name == "Bench"));
    assert!(err.to_string().contains("already exists"));
    assert_eq!(store.list_exercises().unwrap().len(), before);
}

#[test]
fn names_differing_only_in_case_are_distinct() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    store.add_exercise(&ExerciseFields::new("Bench")).unwrap();
    store.add_exercise(&ExerciseFields::new("bench")).unwrap();

    let matching = store
        .list_exercises()
        .unwrap()
        .into_iter()
        .filter(|exercise| exercise.name.eq_ignore_ascii_case("bench"))
        .count();
    assert_eq!(matching, 2);
}

#[test]
fn listing_orders_by_body_part_then_name_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExerciseRepository::try_new(&conn).unwrap();
    for (name, body_part) in [
        ("zottman curl", "biceps"),
        ("Row", "Back"),
        ("bench", "Chest"),
        ("Anchor Press", "chest"),
        ("Deadlift", "back"),
    ] {
        repo.create_exercise(&ExerciseFields::new(name).body_part(body_part))
            .unwrap();
    }

    let names: Vec<String> = repo
        .list_exercises()
        .unwrap()
        .into_iter()
        .map(|exercise| exercise.name)
        .collect();
    assert_eq!(
        names,
        vec!["Deadlift", "Row", "zottman curl", "Anchor Press", "bench"]
    );
}

#[test]
fn update_replaces_all_fields() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let id = store
        .add_exercise(
            &ExerciseFields::new("Curl")
                .body_part("Biceps")
                .equipment("Barbell")
                .notes("old"),
        )
        .unwrap();

    store
        .update_exercise(
            id,
            &ExerciseFields::new(" Incline Curl ")
                .body_part("Biceps")
                .subgroup("Long Head"),
        )
        .unwrap();

    let updated = store.get_exercise(id).unwrap().unwrap();
    assert_eq!(updated.name, "Incline Curl");
    assert_eq!(updated.equipment, None);
    assert_eq!(updated.notes, None);
    assert_eq!(updated.subgroup.as_deref(), Some("Long Head"));
}

#[test]
fn update_of_unknown_id_is_a_no_op() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let before = store.list_exercises().unwrap();

    store
        .update_exercise(ExerciseId(9_999), &ExerciseFields::new("Ghost"))
        .unwrap();

    assert_eq!(store.list_exercises().unwrap(), before);
}

#[test]
fn update_to_existing_name_is_duplicate() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let curl = store.add_exercise(&ExerciseFields::new("Curl")).unwrap();

    let err = store
        .update_exercise(curl, &ExerciseFields::new("Squat"))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateName(_)));
    assert_eq!(store.get_exercise(curl).unwrap().unwrap().name, "Curl");
}

#[test]
fn last_session_tracks_latest_session_date() {
    let store = WorkoutStore::initialize_in_memory().unwrap();
    let id = store.add_exercise(&ExerciseFields::new("Bench")).unwrap();

    let first = store.add_session(id, date("2024-03-01"), "").unwrap();
    store
        .add_set(first, 1, 135.0, 5, None, Default::default())
        .unwrap();
    assert_eq!(
        store.get_exercise(id).unwrap().unwrap().last_session,
        Some(date("2024-03-01"))
    );

    store.add_session(id, date("2024-02-01"), "").unwrap();
    store.add_session(id, date("2024-03-15"), "").unwrap();
    assert_eq!(
        store.get_exercise(id).unwrap().unwrap().last_session,
        Some(date("2024-03-15"))
    );
}

#[test]
fn search_filters_on_name_body_part_notes_and_subgroup() {
    let store = WorkoutStore::initialize_in_memory().unwrap();

    let names = |query: &str| -> Vec<String> {
        store
            .search_exercises(query)
            .unwrap()
            .into_iter()
            .map(|exercise| exercise.name)
            .collect()
    };

    assert_eq!(names("  ").len(), STARTER_EXERCISES.len());
    // "Add Back Pulling" is a progression note on Hammer Curls.
    assert_eq!(names("back"), vec!["Pull Ups", "Squat", "Hammer Curls"]);
    assert_eq!(names("lower back"), vec!["Squat"]);
    assert_eq!(names("Mower"), vec!["Pull Ups"]);
    assert_eq!(names("ELEVATION"), vec!["Squat"]);
    assert_eq!(names("brachio"), vec!["Hammer Curls"]);
    assert!(names("dumbbells").is_empty());
}

fn find_id(store: &WorkoutStore, name: &str) -> ExerciseId {
    store
        .list_exercises()
        .unwrap()
        .into_iter()
        .find(|exercise| exercise.name == name)
        .unwrap()
        .id
}
