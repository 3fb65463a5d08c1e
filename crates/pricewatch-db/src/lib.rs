use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use thiserror::Error;

const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

// Path relative to crates/pricewatch-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            busy_timeout_secs: DEFAULT_BUSY_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &pricewatch_core::AppConfig) -> Self {
        Self {
            busy_timeout_secs: config.db_busy_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    /// An observation reached the store without a mandatory field.
    #[error("observation is missing mandatory fields: {}", missing.join(", "))]
    Validation { missing: Vec<&'static str> },
    #[error("stored timestamp \"{value}\" is malformed: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Open the price history database at `path`, creating the file if needed.
///
/// The pool holds a single connection, so writes are serialized and a
/// `latest_price` read always completes before the following append. The
/// connection uses WAL journaling with `synchronous = NORMAL` and waits up to
/// `busy_timeout_secs` on a locked database instead of failing immediately.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the database cannot be opened.
pub async fn connect_pool(path: &Path, config: PoolConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(config.busy_timeout_secs.max(1)))
        .connect_with(options)
        .await
}

/// Ensure the `prices` table, its index, and the append-only guards exist.
///
/// Safe to call on every start: already-applied migrations are skipped and
/// existing rows are untouched. Returns the number of migrations applied by
/// this call.
///
/// # Errors
///
/// Returns [`DbError::Migration`] if a migration fails.
pub async fn initialize(pool: &SqlitePool) -> Result<usize, DbError> {
    // The _sqlx_migrations table does not exist yet on a fresh database;
    // treat absence as zero applied.
    let applied_before = count_applied_migrations(pool).await;

    MIGRATOR.run(pool).await?;

    let applied_after = count_applied_migrations(pool).await;
    let delta = (applied_after - applied_before).max(0);
    let applied = usize::try_from(delta).unwrap_or(0);
    tracing::debug!(applied, "price history schema ready");
    Ok(applied)
}

async fn count_applied_migrations(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
        .unwrap_or(0)
}

pub mod prices;

pub use prices::{append_observation, latest_price, price_history, validate_observation};
