use pricewatch_core::{format_timestamp, HistoryEntry};
use sqlx::SqlitePool;

/// Prints every stored observation for `name`, newest first.
pub(crate) async fn print_history(pool: &SqlitePool, name: &str) -> anyhow::Result<()> {
    let entries = pricewatch_db::price_history(pool, name).await?;
    if entries.is_empty() {
        println!("No history found for '{name}'.");
        return Ok(());
    }

    println!("--- Price history for {name} ---");
    for entry in &entries {
        println!("  {}", history_line(entry));
    }
    Ok(())
}

/// `[timestamp] - price - title`, with `N/A` for fields a failed attempt
/// did not record.
fn history_line(entry: &HistoryEntry) -> String {
    format!(
        "[{}] - {} - {}",
        format_timestamp(&entry.timestamp),
        entry.price.as_deref().unwrap_or("N/A"),
        entry.scraped_title.as_deref().unwrap_or("N/A"),
    )
}
