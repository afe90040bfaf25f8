//! PostgreSQL gateway integration tests.
//!
//! These tests require a live database loaded with `db/schema.sql` and are
//! gated behind the `db-tests` feature:
//!
//! ```sh
//! RAMEN_DB_HOST=localhost cargo test -p ramen-api --features db-tests
//! ```
//!
//! Every test reseeds the tables, so the suite is serialized on a lock
//! rather than run against per-test transactions.

#![cfg(feature = "db-tests")]

use std::sync::OnceLock;

use deadpool_postgres::Pool;
use ramen_api::{DbConfig, PgStore};
use ramen_core::{compute_digest, StoreError, TodoPatch};
use ramen_storage::TodoStore;
use ramen_test_utils::{SEED_TODOS, TEST_USER};
use tokio::sync::{Mutex, MutexGuard};

static DB_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

async fn db_guard() -> MutexGuard<'static, ()> {
    DB_LOCK.get_or_init(|| Mutex::new(())).lock().await
}

async fn seeded_pg() -> (PgStore, Pool) {
    let config = DbConfig::from_env();
    let pool = config.create_pool().expect("create pool");

    let client = pool.get().await.expect("acquire connection");
    client
        .batch_execute("TRUNCATE todo_list RESTART IDENTITY; DELETE FROM users")
        .await
        .expect("reset tables");

    for (_, name) in SEED_TODOS {
        client
            .execute("INSERT INTO todo_list (title) VALUES ($1)", &[&name])
            .await
            .expect("seed todo");
    }

    let digest = hex::encode(compute_digest(TEST_USER.as_bytes()));
    client
        .execute(
            "INSERT INTO users (username, passwd) VALUES ($1, $2)",
            &[&TEST_USER, &digest],
        )
        .await
        .expect("seed user");

    (PgStore::new(pool.clone()), pool)
}

#[tokio::test]
async fn list_todos_returns_seed_in_order() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    let todos = store.list_todos().await.unwrap();

    assert_eq!(todos.len(), SEED_TODOS.len());
    for (todo, (id, name)) in todos.iter().zip(SEED_TODOS) {
        assert_eq!(todo.id, id);
        assert_eq!(todo.name, name);
    }
}

#[tokio::test]
async fn create_todo_appends_rows_with_assigned_ids() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    store.create_todo("power on").await.unwrap();
    store.create_todo("erase directory").await.unwrap();

    let todos = store.list_todos().await.unwrap();
    assert_eq!(todos.len(), 5);
    assert_eq!(todos[3].id, 4);
    assert_eq!(todos[3].name, "power on");
    assert_eq!(todos[4].id, 5);
    assert_eq!(todos[4].name, "erase directory");
}

#[tokio::test]
async fn delete_todo_removes_matching_row() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    store.delete_todo(1).await.unwrap();

    let todos = store.list_todos().await.unwrap();
    assert_eq!(todos.len(), 2);
    for (todo, (id, name)) in todos.iter().zip(&SEED_TODOS[1..]) {
        assert_eq!(todo.id, *id);
        assert_eq!(todo.name, *name);
    }
}

#[tokio::test]
async fn delete_absent_todo_is_ok() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    store.delete_todo(4).await.unwrap();

    assert_eq!(store.list_todos().await.unwrap().len(), 3);
}

#[tokio::test]
async fn update_todo_changes_only_target_row() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    store
        .update_todo(1, &TodoPatch::set_name("title updated"))
        .await
        .unwrap();

    let todos = store.list_todos().await.unwrap();
    assert_eq!(todos[0].name, "title updated");
    for (todo, (_, name)) in todos[1..].iter().zip(&SEED_TODOS[1..]) {
        assert_eq!(todo.name, *name);
    }
}

#[tokio::test]
async fn update_absent_todo_is_ok() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    store
        .update_todo(4, &TodoPatch::set_name("title updated"))
        .await
        .unwrap();

    let todos = store.list_todos().await.unwrap();
    for (todo, (_, name)) in todos.iter().zip(SEED_TODOS) {
        assert_eq!(todo.name, name);
    }
}

#[tokio::test]
async fn empty_patch_leaves_rows_untouched() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    store.update_todo(1, &TodoPatch::empty()).await.unwrap();

    let todos = store.list_todos().await.unwrap();
    for (todo, (_, name)) in todos.iter().zip(SEED_TODOS) {
        assert_eq!(todo.name, name);
    }
}

#[tokio::test]
async fn update_to_empty_string_is_applied() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    store.update_todo(1, &TodoPatch::set_name("")).await.unwrap();

    let todos = store.list_todos().await.unwrap();
    assert_eq!(todos[0].name, "");
}

#[tokio::test]
async fn get_user_info_returns_stored_digest() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    let user = store.get_user_info(TEST_USER).await.unwrap();

    assert_eq!(user.username, TEST_USER);
    assert_eq!(user.password_digest, compute_digest(TEST_USER.as_bytes()));
}

#[tokio::test]
async fn get_user_info_unknown_user_is_rejected() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    let err = store.get_user_info("Unknown").await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownUser));
}

#[tokio::test]
async fn get_session_hash_round_trips_via_sql() {
    let _guard = db_guard().await;
    let (store, pool) = seeded_pg().await;

    let expected = compute_digest(b"some session seed");
    let encoded = hex::encode(expected);
    let client = pool.get().await.unwrap();
    client
        .execute(
            "UPDATE users SET session_hash = $1 WHERE username = $2",
            &[&encoded, &TEST_USER],
        )
        .await
        .unwrap();

    let actual = store.get_session_hash(TEST_USER).await.unwrap();
    assert_eq!(actual, Some(expected));
}

#[tokio::test]
async fn get_session_hash_null_column_is_none() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    let hash = store.get_session_hash(TEST_USER).await.unwrap();
    assert_eq!(hash, None);
}

#[tokio::test]
async fn get_session_hash_unknown_user_is_rejected() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    let err = store.get_session_hash("Unknown").await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownUser));
}

#[tokio::test]
async fn set_session_hash_persists_hex_digest() {
    let _guard = db_guard().await;
    let (store, pool) = seeded_pg().await;

    let hash = compute_digest(&[1, 2, 3]);
    store.set_session_hash(TEST_USER, &hash).await.unwrap();

    let client = pool.get().await.unwrap();
    let row = client
        .query_one(
            "SELECT session_hash FROM users WHERE username = $1",
            &[&TEST_USER],
        )
        .await
        .unwrap();
    let stored: String = row.get(0);
    assert_eq!(stored, hex::encode(hash));
}

#[tokio::test]
async fn set_session_hash_unknown_user_is_rejected() {
    let _guard = db_guard().await;
    let (store, _pool) = seeded_pg().await;

    let hash = compute_digest(&[1, 2, 3]);
    let err = store.set_session_hash("Unknown", &hash).await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownUser));
}
