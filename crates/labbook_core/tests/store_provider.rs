use labbook_core::db::DbError;
use labbook_core::{
    Lab, LabStatus, LabStore, RepoError, StoreError, StoreLocation, StoreProvider, Subject,
};
use rusqlite::Connection;
use std::collections::HashSet;
use std::sync::Arc;

const SEEDED_TITLES: [&str; 4] = [
    "Основи штучного інтелекту",
    "Хмарні технології та сервіси",
    "Кібербезпека і захист даних",
    "Розробка веб-додатків",
];

#[test]
fn fresh_store_lists_seeded_subjects_in_id_order() {
    let provider = StoreProvider::new();
    let store = provider
        .get_store(&StoreLocation::InMemory)
        .expect("retry should hand out the store");

    let subjects = store.list_all_subjects().expect("subject list should load");
    let ids: Vec<_> = subjects.iter().map(|subject| subject.id).collect();
    let titles: Vec<_> = subjects.iter().map(|subject| subject.title.as_str()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(titles, SEEDED_TITLES);

    let labs = store.list_labs_for_subject(1).expect("lab list should load");
    assert_eq!(labs.len(), 2);
    assert_eq!(labs.iter().filter(|lab| lab.is_completed()).count(), 1);
    assert_eq!(labs.iter().filter(|lab| !lab.is_completed()).count(), 1);
}

#[test]
fn every_seeded_subject_has_two_labs_pointing_back_at_it() {
    let store = LabStore::open(&StoreLocation::InMemory).expect("store should open");
    let subject_ids: HashSet<_> = store
        .list_all_subjects()
        .expect("subject list should load")
        .into_iter()
        .map(|subject| subject.id)
        .collect();

    let mut total = 0;
    for id in &subject_ids {
        let labs = store.list_labs_for_subject(*id).expect("lab list should load");
        assert_eq!(labs.len(), 2, "subject {id}");
        assert!(labs.iter().all(|lab| lab.subject_id == *id));
        total += labs.len();
    }
    assert_eq!(total, 8);
}

#[test]
fn seeded_statuses_match_starter_dataset() {
    let store = LabStore::open(&StoreLocation::InMemory).expect("store should open");

    let statuses: Vec<_> = (1..=4)
        .flat_map(|id| store.list_labs_for_subject(id).expect("lab list should load"))
        .map(|lab| (lab.id, lab.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (1, LabStatus::NotStarted),
            (2, LabStatus::Completed),
            (3, LabStatus::Completed),
            (4, LabStatus::InProgress),
            (5, LabStatus::Completed),
            (6, LabStatus::Completed),
            (7, LabStatus::Completed),
            (8, LabStatus::InProgress),
        ]
    );
}

#[test]
fn provider_returns_same_handle_on_repeated_calls() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let location = StoreLocation::directory(dir.path());
    let provider = StoreProvider::new();
    assert!(provider.current().is_none());

    let first = provider.get_store(&location).expect("provider should hand out the store");
    let second = provider.get_store(&location).expect("provider should hand out the store");
    let third = provider.get_store(&StoreLocation::InMemory)
        .expect("provider should hand out the store");

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(third.location(), &location);
    assert!(Arc::ptr_eq(&first, &provider.current().expect("provider should hold a store")));
}

#[test]
fn concurrent_first_calls_share_one_fully_seeded_store() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let location = StoreLocation::directory(dir.path());
    let provider = StoreProvider::new();

    let handles: Vec<Arc<LabStore>> = std::thread::scope(|scope| {
        let (provider, location) = (&provider, &location);
        let mut workers = Vec::new();
        for _ in 0..8 {
            workers.push(scope.spawn(move || {
                let store = provider.get_store(location)
                    .expect("provider should hand out the store");
                assert_eq!(store.list_all_subjects().expect("subject list should load").len(), 4);
                store
            }));
        }
        workers
            .into_iter()
            .map(|worker| worker.join().expect("worker thread should not panic"))
            .collect()
    });

    assert!(handles.iter().all(|store| Arc::ptr_eq(store, &handles[0])));

    let db_path = location.db_path().expect("directory location has a file path");
    let conn = Connection::open(db_path).expect("raw connection should open");
    let (subjects, labs): (i64, i64) = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM subjects), (SELECT COUNT(*) FROM subject_labs);",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("query should return a row");
    assert_eq!((subjects, labs), (4, 8));
}

#[test]
fn reopening_existing_store_does_not_seed_again() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let location = StoreLocation::directory(dir.path());

    let store = LabStore::open(&location).expect("store should open");
    store.add_subject(&Subject::new(5, "Compilers")).expect("subject insert should succeed");
    drop(store);

    let reopened = LabStore::open(&location).expect("store should open");
    let ids: Vec<_> = reopened
        .list_all_subjects()
        .expect("subject list should load")
        .into_iter()
        .map(|subject| subject.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn inserts_with_used_ids_fail_instead_of_overwriting() {
    let store = LabStore::open(&StoreLocation::InMemory).expect("store should open");

    let err = store.add_subject(&Subject::new(1, "Overwrite"))
        .expect_err("duplicate insert must be rejected");
    assert!(matches!(
        err,
        StoreError::DuplicateId {
            entity: "subject",
            id: 1
        }
    ));
    assert_eq!(err.code(), "duplicate_id");

    let err = store
        .add_lab(&Lab::new(8, 4, "Overwrite", "Overwrite"))
        .expect_err("insert must be rejected");
    assert!(matches!(err, StoreError::DuplicateId { entity: "lab", id: 8 }));

    let kept = store
        .get_subject(1)
        .expect("subject lookup should succeed")
        .expect("subject should exist");
    assert_eq!(kept.title, SEEDED_TITLES[0]);
}

#[test]
fn added_lab_is_visible_in_subject_overview() {
    let store = LabStore::open(&StoreLocation::InMemory).expect("store should open");
    store
        .add_lab(
            &Lab::new(9, 3, "Threat model", "Draft a STRIDE model")
                .with_status(LabStatus::Completed),
        )
        .expect("lab insert should succeed");

    let overview = store
        .subject_overview(3)
        .expect("overview query should succeed")
        .expect("subject should exist");
    assert_eq!(overview.labs.len(), 3);
    assert_eq!(overview.completed, 3);
    assert!(overview.is_finished());

    let err = store
        .add_lab(&Lab::new(10, 77, "Orphan", ""))
        .expect_err("lab under unknown subject must be rejected");
    assert!(matches!(err, StoreError::UnknownSubject(77)));
    assert!(store.subject_overview(77).expect("overview query should succeed").is_none());
}

#[test]
fn unusable_location_reports_storage_unavailable_and_provider_can_retry() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let blocker = dir.path().join("not-a-directory");
    std::fs::write(&blocker, b"occupied").expect("blocker file should be written");

    let provider = StoreProvider::new();
    let err = provider
        .get_store(&StoreLocation::directory(&blocker))
        .expect_err("unusable location must fail");
    assert!(matches!(
        err,
        StoreError::StorageUnavailable {
            source: DbError::Io { .. },
            ..
        }
    ));
    assert!(provider.current().is_none());

    let store = provider
        .get_store(&StoreLocation::InMemory)
        .expect("retry should hand out the store");
    assert_eq!(store.list_all_subjects().expect("subject list should load").len(), 4);
}

#[test]
fn store_from_newer_binary_is_unavailable() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let location = StoreLocation::directory(dir.path());
    let db_path = location.db_path().expect("directory location has a file path");
    let conn = Connection::open(db_path).expect("raw connection should open");
    conn.execute_batch("PRAGMA user_version = 999;").expect("raw batch should run");
    drop(conn);

    let err = LabStore::open(&location).expect_err("open must fail");
    assert_eq!(err.code(), "storage_unavailable");
    assert!(matches!(
        err,
        StoreError::StorageUnavailable {
            source: DbError::UnsupportedSchemaVersion { .. },
            ..
        }
    ));
}

#[test]
fn corrupted_row_surfaces_as_query_failed() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let location = StoreLocation::directory(dir.path());
    let store = LabStore::open(&location).expect("store should open");

    let db_path = location.db_path().expect("directory location has a file path");
    let raw = Connection::open(db_path).expect("raw connection should open");
    raw.execute("UPDATE subjects SET title = '  ' WHERE id = 2;", [])
        .expect("raw statement should run");
    drop(raw);

    let err = store.list_all_subjects().expect_err("invalid row must surface as an error");
    assert_eq!(err.code(), "query_failed");
    assert!(matches!(
        err,
        StoreError::QueryFailed(RepoError::InvalidData(_))
    ));

    let labs = store.list_labs_for_subject(1).expect("lab list should load");
    assert_eq!(labs.len(), 2);
}

#[test]
fn queries_do_not_reverify_schema_on_every_call() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let location = StoreLocation::directory(dir.path());
    let store = LabStore::open(&location).expect("store should open");

    let db_path = location.db_path().expect("directory location has a file path");
    let raw = Connection::open(db_path).expect("raw connection should open");
    raw.execute_batch("PRAGMA user_version = 0;").expect("raw batch should run");
    drop(raw);

    assert_eq!(store.list_all_subjects().expect("subject list should load").len(), 4);
    assert_eq!(store.list_labs_for_subject(4).expect("lab list should load").len(), 2);
}
