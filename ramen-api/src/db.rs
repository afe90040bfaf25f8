//! Database Connection Pool Module
//!
//! This module provides PostgreSQL connection pooling using deadpool-postgres
//! and the `PgStore` gateway implementing the store capability trait over the
//! `todo_list` and `users` tables.
//!
//! Read failures surface as `StoreError::Unavailable` and write failures as
//! `StoreError::Backend`; handlers translate those into 503 and 500.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use ramen_core::{SessionHash, StoreError, StoreResult, TodoId, TodoItem, TodoPatch, UserInfo};
use ramen_storage::TodoStore;
use tokio_postgres::NoTls;

use crate::error::{ApiError, ApiResult};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "todo".to_string(),
            user: "app".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("RAMEN_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("RAMEN_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("RAMEN_DB_NAME").unwrap_or_else(|_| "todo".to_string()),
            user: std::env::var("RAMEN_DB_USER").unwrap_or_else(|_| "app".to_string()),
            password: std::env::var("RAMEN_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("RAMEN_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("RAMEN_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_cfg = PoolConfig::new(self.max_size);
        pool_cfg.timeouts.wait = Some(self.timeout);
        cfg.pool = Some(pool_cfg);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// POSTGRES GATEWAY
// ============================================================================

/// PostgreSQL-backed store over the `todo_list` and `users` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Create a new store with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new store from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    async fn read_conn(&self) -> StoreResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| read_failure("acquire connection", e))
    }

    async fn write_conn(&self) -> StoreResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| write_failure("acquire connection", e))
    }
}

/// Log a read-path failure and map it to an Unavailable error.
fn read_failure(op: &str, err: impl fmt::Display) -> StoreError {
    tracing::error!("{} failed: {}", op, err);
    StoreError::unavailable(format!("{} failed", op))
}

/// Log a write-path failure and map it to a Backend error.
fn write_failure(op: &str, err: impl fmt::Display) -> StoreError {
    tracing::error!("{} failed: {}", op, err);
    StoreError::backend(format!("{} failed", op))
}

/// Decode a stored hex digest column into its 32-byte form.
fn decode_digest(column: &str, encoded: &str) -> StoreResult<SessionHash> {
    let bytes = hex::decode(encoded)
        .map_err(|e| write_failure(&format!("decode {}", column), e))?;
    SessionHash::try_from(bytes.as_slice())
        .map_err(|_| StoreError::backend(format!("{} has unexpected length", column)))
}

#[async_trait]
impl TodoStore for PgStore {
    async fn list_todos(&self) -> StoreResult<Vec<TodoItem>> {
        let conn = self.read_conn().await?;

        let rows = conn
            .query("SELECT id, title FROM todo_list ORDER BY id ASC", &[])
            .await
            .map_err(|e| read_failure("list todos", e))?;

        Ok(rows
            .iter()
            .map(|row| TodoItem {
                id: row.get(0),
                name: row.get(1),
            })
            .collect())
    }

    async fn create_todo(&self, name: &str) -> StoreResult<()> {
        let mut conn = self.write_conn().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| write_failure("create todo", e))?;

        tx.execute("INSERT INTO todo_list (title) VALUES ($1)", &[&name])
            .await
            .map_err(|e| write_failure("create todo", e))?;

        tx.commit().await.map_err(|e| write_failure("create todo", e))
    }

    async fn delete_todo(&self, id: u32) -> StoreResult<()> {
        // Ids beyond the column range cannot exist, so there is nothing to
        // delete and the operation succeeds vacuously.
        let Ok(id) = TodoId::try_from(id) else {
            return Ok(());
        };

        let mut conn = self.write_conn().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| write_failure("delete todo", e))?;

        tx.execute("DELETE FROM todo_list WHERE id = $1", &[&id])
            .await
            .map_err(|e| write_failure("delete todo", e))?;

        tx.commit().await.map_err(|e| write_failure("delete todo", e))
    }

    async fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> StoreResult<()> {
        // An all-keep patch performs no writes at all.
        let Some(name) = patch.name.as_set() else {
            return Ok(());
        };

        let mut conn = self.write_conn().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| write_failure("update todo", e))?;

        tx.execute(
            "UPDATE todo_list SET title = $1 WHERE id = $2",
            &[&name, &id],
        )
        .await
        .map_err(|e| write_failure("update todo", e))?;

        tx.commit().await.map_err(|e| write_failure("update todo", e))
    }

    async fn get_user_info(&self, username: &str) -> StoreResult<UserInfo> {
        let conn = self.read_conn().await?;

        let row = conn
            .query_opt(
                "SELECT username, passwd FROM users WHERE username = $1",
                &[&username],
            )
            .await
            .map_err(|e| read_failure("get user info", e))?
            .ok_or(StoreError::UnknownUser)?;

        let stored: String = row.get(1);
        Ok(UserInfo {
            username: row.get(0),
            password_digest: decode_digest("passwd", &stored)?,
        })
    }

    async fn get_session_hash(&self, username: &str) -> StoreResult<Option<SessionHash>> {
        let conn = self.read_conn().await?;

        let row = conn
            .query_opt(
                "SELECT session_hash FROM users WHERE username = $1",
                &[&username],
            )
            .await
            .map_err(|e| read_failure("get session hash", e))?
            .ok_or(StoreError::UnknownUser)?;

        let stored: Option<String> = row.get(0);
        match stored {
            Some(encoded) => Ok(Some(decode_digest("session_hash", &encoded)?)),
            None => Ok(None),
        }
    }

    async fn set_session_hash(&self, username: &str, hash: &SessionHash) -> StoreResult<()> {
        let mut conn = self.write_conn().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| write_failure("set session hash", e))?;

        let encoded = hex::encode(hash);
        let affected = tx
            .execute(
                "UPDATE users SET session_hash = $1 WHERE username = $2",
                &[&encoded, &username],
            )
            .await
            .map_err(|e| write_failure("set session hash", e))?;

        if affected == 0 {
            return Err(StoreError::UnknownUser);
        }

        tx.commit()
            .await
            .map_err(|e| write_failure("set session hash", e))
    }
}
