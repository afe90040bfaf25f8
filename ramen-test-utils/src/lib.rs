//! Ramen Test Utilities
//!
//! Shared fixtures for the workspace: the canonical three-item todo seed
//! and a pre-provisioned test user, matching `db/seed.sql`.

pub use ramen_storage::MockStore;

use ramen_core::compute_digest;

/// The canonical seed rows, in storage order.
pub const SEED_TODOS: [(i32, &str); 3] = [
    (1, "prepare hot water"),
    (2, "wait for three minutes"),
    (3, "eat ramen"),
];

/// Test username whose password equals the username.
pub const TEST_USER: &str = "Taro";

/// A mock store pre-loaded with `SEED_TODOS` and `TEST_USER`.
pub fn seeded_store() -> MockStore {
    let store = MockStore::new();
    for (id, name) in SEED_TODOS {
        store.insert_todo(id, name);
    }
    store.insert_user(TEST_USER, compute_digest(TEST_USER.as_bytes()));
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_store_has_three_todos() {
        assert_eq!(seeded_store().todo_count(), 3);
    }
}
