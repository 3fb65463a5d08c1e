//! Database operations for the append-only `prices` table.
//!
//! Rows are only ever inserted; triggers installed by the migration reject
//! `UPDATE` and `DELETE`. Ordering uses `timestamp DESC, id DESC`, so rows
//! sharing a timestamp fall back to insertion order (newest insert first).

use pricewatch_core::{format_timestamp, parse_timestamp, HistoryEntry, Observation};
use sqlx::SqlitePool;

use crate::DbError;

/// A `(timestamp, scraped_title, price)` row as read back from `prices`.
#[derive(Debug, Clone, sqlx::FromRow)]
struct HistoryRow {
    timestamp: String,
    scraped_title: Option<String>,
    price: Option<String>,
}

impl TryFrom<HistoryRow> for HistoryEntry {
    type Error = DbError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let timestamp =
            parse_timestamp(&row.timestamp).map_err(|source| DbError::InvalidTimestamp {
                value: row.timestamp.clone(),
                source,
            })?;
        Ok(HistoryEntry {
            timestamp,
            scraped_title: row.scraped_title,
            price: row.price,
        })
    }
}

/// Checks the mandatory fields of an observation.
///
/// `timestamp` and `status` are always present by construction; the product
/// name is the only field that can arrive empty. Optional fields are never
/// rejected.
///
/// # Errors
///
/// Returns [`DbError::Validation`] naming every missing field.
pub fn validate_observation(observation: &Observation) -> Result<(), DbError> {
    let mut missing = Vec::new();
    if observation.product_name.trim().is_empty() {
        missing.push("product_name");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DbError::Validation { missing })
    }
}

/// Validates and appends one observation. Returns the new row id.
///
/// # Errors
///
/// Returns [`DbError::Validation`] if a mandatory field is missing, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn append_observation(
    pool: &SqlitePool,
    observation: &Observation,
) -> Result<i64, DbError> {
    validate_observation(observation)?;

    let id = sqlx::query(
        "INSERT INTO prices \
             (timestamp, product_name, scraped_title, price, price_numeric, status) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(format_timestamp(&observation.timestamp))
    .bind(&observation.product_name)
    .bind(&observation.scraped_title)
    .bind(&observation.price)
    .bind(observation.price_numeric)
    .bind(observation.status.as_str())
    .execute(pool)
    .await?
    .last_insert_rowid();

    tracing::info!(
        product = %observation.product_name,
        status = %observation.status,
        row_id = id,
        "observation stored"
    );
    Ok(id)
}

/// Returns the numeric price of the most recent observation for
/// `product_name` that recorded one, if any.
///
/// Observations without a numeric price (failed fetches, selector misses,
/// parse errors) are skipped rather than hiding an older valid price.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_price(pool: &SqlitePool, product_name: &str) -> Result<Option<f64>, DbError> {
    let price = sqlx::query_scalar::<_, f64>(
        "SELECT price_numeric \
         FROM prices \
         WHERE product_name = ? AND price_numeric IS NOT NULL \
         ORDER BY timestamp DESC, id DESC \
         LIMIT 1",
    )
    .bind(product_name)
    .fetch_optional(pool)
    .await?;

    Ok(price)
}

/// Returns every observation for `product_name`, newest first.
///
/// Failed attempts are included with absent title and price. Each call runs
/// a fresh query.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or
/// [`DbError::InvalidTimestamp`] if a stored timestamp cannot be parsed.
pub async fn price_history(
    pool: &SqlitePool,
    product_name: &str,
) -> Result<Vec<HistoryEntry>, DbError> {
    let rows = sqlx::query_as::<_, HistoryRow>(
        "SELECT timestamp, scraped_title, price \
         FROM prices \
         WHERE product_name = ? \
         ORDER BY timestamp DESC, id DESC",
    )
    .bind(product_name)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(HistoryEntry::try_from).collect()
}
