#![forbid(unsafe_code)]

use todo_core::{CategoryRef, ValidationError};
use todo_storage::{SqliteStore, StoreError, TaskCreateRequest};

fn open_store() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SqliteStore::open(dir.path()).expect("open store");
    (dir, store)
}

#[test]
fn categories_are_created_listed_and_looked_up() {
    let (_dir, mut store) = open_store();

    let home = store.create_category("  Hogar ").expect("create Hogar");
    let work = store.create_category("Trabajo").expect("create Trabajo");
    assert_eq!(home.name, "Hogar");
    assert!(work.id > home.id);

    let listed = store.list_categories().expect("list");
    assert_eq!(listed, vec![home.clone(), work.clone()]);

    assert_eq!(store.category(home.id).expect("by id"), Some(home.clone()));
    assert_eq!(
        store.category_by_name("Trabajo").expect("by name"),
        Some(work)
    );
    assert_eq!(store.category(9_999).expect("missing"), None);
}

#[test]
fn duplicate_category_names_are_rejected() {
    let (_dir, mut store) = open_store();
    store.create_category("Hogar").expect("first insert");

    let err = store.create_category("Hogar").expect_err("duplicate");
    assert!(matches!(err, StoreError::CategoryExists));
    assert_eq!(err.code(), "CATEGORY_EXISTS");

    let other = store.create_category("Estudio").expect("second");
    let err = store
        .rename_category(other.id, "Hogar")
        .expect_err("rename onto existing name");
    assert!(matches!(err, StoreError::CategoryExists));
}

#[test]
fn empty_category_names_fail_validation() {
    let (_dir, mut store) = open_store();
    let err = store.create_category("   ").expect_err("blank");
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::MissingCategoryName)
    ));
}

#[test]
fn rename_and_delete_report_unknown_ids() {
    let (_dir, mut store) = open_store();
    assert!(matches!(
        store.rename_category(42, "Nada"),
        Err(StoreError::UnknownId)
    ));
    assert!(matches!(store.delete_category(42), Err(StoreError::UnknownId)));

    let cat = store.create_category("Temporal").expect("create");
    let renamed = store.rename_category(cat.id, "Permanente").expect("rename");
    assert_eq!(renamed.name, "Permanente");
    store.delete_category(cat.id).expect("delete empty category");
    assert_eq!(store.category(cat.id).expect("lookup"), None);
}

#[test]
fn categories_with_tasks_cannot_be_deleted() {
    let (_dir, mut store) = open_store();
    let cat = store.create_category("Hogar").expect("create");
    let task = store
        .create_task(TaskCreateRequest {
            name: "Barrer".to_string(),
            category: CategoryRef::Id(cat.id),
            status: None,
            priority: None,
            due_at: None,
            estimated_minutes: None,
            now_ms: 1_000,
        })
        .expect("create task");

    assert!(matches!(
        store.delete_category(cat.id),
        Err(StoreError::CategoryInUse)
    ));

    store.delete_task(task.id).expect("delete task");
    store.delete_category(cat.id).expect("now deletable");
}

#[test]
fn get_or_create_reuses_existing_rows() {
    let (_dir, mut store) = open_store();
    let first = store.get_or_create_category("Compras").expect("create");
    let second = store.get_or_create_category(" Compras ").expect("reuse");
    assert_eq!(first, second);
    assert_eq!(store.list_categories().expect("list").len(), 1);
}

#[test]
fn usage_counts_tasks_per_category() {
    let (_dir, mut store) = open_store();
    let home = store.create_category("Hogar").expect("create");
    let empty = store.create_category("Vacía").expect("create");
    for (name, done) in [("Barrer", true), ("Lavar", false), ("Cocinar", true)] {
        let task = store
            .create_task(TaskCreateRequest {
                name: name.to_string(),
                category: CategoryRef::Name("Hogar".to_string()),
                status: None,
                priority: None,
                due_at: None,
                estimated_minutes: None,
                now_ms: 1_000,
            })
            .expect("create task");
        if done {
            store.toggle_status(task.id, 2_000).expect("toggle");
        }
    }

    let usage = store.category_usage().expect("usage");
    assert_eq!(usage.len(), 2);
    assert_eq!(usage[0].category, home);
    assert_eq!((usage[0].total, usage[0].completed), (3, 2));
    assert_eq!(usage[1].category, empty);
    assert_eq!((usage[1].total, usage[1].completed), (0, 0));
}

#[test]
fn store_reopens_existing_database() {
    let dir = tempfile::tempdir().expect("temp dir");
    {
        let mut store = SqliteStore::open(dir.path()).expect("open");
        store.create_category("Persistente").expect("create");
    }
    let store = SqliteStore::open(dir.path()).expect("reopen");
    assert!(store.db_path().exists());
    let names = store
        .list_categories()
        .expect("list")
        .into_iter()
        .map(|c| c.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Persistente".to_string()]);
}

#[test]
fn newer_schema_versions_are_refused() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SqliteStore::open(dir.path()).expect("open");
    let db_path = store.db_path();
    drop(store);

    let conn = rusqlite::Connection::open(db_path).expect("raw open");
    conn.execute(
        "UPDATE meta SET value='99' WHERE key='schema_version'",
        [],
    )
    .expect("bump version");
    drop(conn);

    let err = SqliteStore::open(dir.path()).expect_err("must refuse");
    assert!(matches!(
        err,
        StoreError::SchemaTooNew {
            found: 99,
            supported: 1
        }
    ));
}
