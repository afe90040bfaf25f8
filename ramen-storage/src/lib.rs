//! Ramen Storage - Store Trait and In-Memory Implementation
//!
//! Defines the capability interface the HTTP layer depends on. The
//! PostgreSQL implementation lives in ramen-api; the `MockStore` here backs
//! handler and property tests without a database.

use async_trait::async_trait;
use ramen_core::{
    FieldUpdate, SessionHash, StoreError, StoreResult, TodoId, TodoItem, TodoPatch, UserInfo,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, RwLock};

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Capability interface over the durable store.
///
/// Handlers depend only on this trait, never on a concrete store type, so
/// tests can substitute `MockStore` for the PostgreSQL gateway.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todo rows, ordered by ascending id. An empty table is `Ok(vec![])`,
    /// never an error; a failed query is `StoreError::Unavailable`.
    async fn list_todos(&self) -> StoreResult<Vec<TodoItem>>;

    /// Insert a row with a store-assigned id.
    async fn create_todo(&self, name: &str) -> StoreResult<()>;

    /// Delete the row with the matching id. Absence of a match is not an
    /// error.
    async fn delete_todo(&self, id: u32) -> StoreResult<()>;

    /// Apply a partial update. An all-`Keep` patch performs zero writes and
    /// succeeds; a nonexistent id affects zero rows and also succeeds.
    async fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> StoreResult<()>;

    /// Look up a user's credential record. Unknown username is
    /// `StoreError::UnknownUser`.
    async fn get_user_info(&self, username: &str) -> StoreResult<UserInfo>;

    /// Read the stored session token. `Ok(None)` when no token has been
    /// issued yet; unknown username is `StoreError::UnknownUser`.
    async fn get_session_hash(&self, username: &str) -> StoreResult<Option<SessionHash>>;

    /// Persist a freshly issued session token. Unknown username is
    /// `StoreError::UnknownUser`.
    async fn set_session_hash(&self, username: &str, hash: &SessionHash) -> StoreResult<()>;
}

// ============================================================================
// MOCK STORE
// ============================================================================

#[derive(Debug, Clone)]
struct MockUser {
    password_digest: SessionHash,
    session_hash: Option<SessionHash>,
}

/// In-memory store for testing.
///
/// Ordered iteration over the `BTreeMap` mirrors the ascending-id ordering
/// of the SQL gateway. `fail_reads`/`fail_writes` inject the failure paths
/// that a real database would produce, so tests can cover the 503/500
/// mappings.
#[derive(Debug, Default)]
pub struct MockStore {
    todos: Arc<RwLock<BTreeMap<TodoId, String>>>,
    next_id: AtomicI32,
    users: Arc<RwLock<HashMap<String, MockUser>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(1),
            ..Self::default()
        }
    }

    /// Insert a todo row with an explicit id, as a test fixture would.
    pub fn insert_todo(&self, id: TodoId, name: impl Into<String>) {
        let mut todos = self.todos.write().unwrap();
        todos.insert(id, name.into());
        let next = self.next_id.load(Ordering::SeqCst);
        self.next_id.store(next.max(id + 1), Ordering::SeqCst);
    }

    /// Insert a user row with no session token.
    pub fn insert_user(&self, username: impl Into<String>, password_digest: SessionHash) {
        self.users.write().unwrap().insert(
            username.into(),
            MockUser {
                password_digest,
                session_hash: None,
            },
        );
    }

    /// Number of stored todo rows.
    pub fn todo_count(&self) -> usize {
        self.todos.read().unwrap().len()
    }

    /// Make every read operation fail with `StoreError::Unavailable`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write operation fail with `StoreError::Backend`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.todos.write().unwrap().clear();
        self.users.write().unwrap().clear();
        self.next_id.store(1, Ordering::SeqCst);
    }

    fn check_read(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("injected read failure"));
        }
        Ok(())
    }

    fn check_write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::backend("injected write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoStore for MockStore {
    async fn list_todos(&self) -> StoreResult<Vec<TodoItem>> {
        self.check_read()?;
        let todos = self.todos.read().unwrap();
        Ok(todos
            .iter()
            .map(|(&id, name)| TodoItem {
                id,
                name: name.clone(),
            })
            .collect())
    }

    async fn create_todo(&self, name: &str) -> StoreResult<()> {
        self.check_write()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.todos.write().unwrap().insert(id, name.to_string());
        Ok(())
    }

    async fn delete_todo(&self, id: u32) -> StoreResult<()> {
        self.check_write()?;
        if let Ok(id) = TodoId::try_from(id) {
            self.todos.write().unwrap().remove(&id);
        }
        Ok(())
    }

    async fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> StoreResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.check_write()?;
        let mut todos = self.todos.write().unwrap();
        if let Some(stored) = todos.get_mut(&id) {
            if let FieldUpdate::Set(name) = &patch.name {
                *stored = name.clone();
            }
        }
        Ok(())
    }

    async fn get_user_info(&self, username: &str) -> StoreResult<UserInfo> {
        self.check_read()?;
        let users = self.users.read().unwrap();
        let user = users.get(username).ok_or(StoreError::UnknownUser)?;
        Ok(UserInfo {
            username: username.to_string(),
            password_digest: user.password_digest,
        })
    }

    async fn get_session_hash(&self, username: &str) -> StoreResult<Option<SessionHash>> {
        self.check_read()?;
        let users = self.users.read().unwrap();
        let user = users.get(username).ok_or(StoreError::UnknownUser)?;
        Ok(user.session_hash)
    }

    async fn set_session_hash(&self, username: &str, hash: &SessionHash) -> StoreResult<()> {
        self.check_write()?;
        let mut users = self.users.write().unwrap();
        let user = users.get_mut(username).ok_or(StoreError::UnknownUser)?;
        user.session_hash = Some(*hash);
        Ok(())
    }
}
