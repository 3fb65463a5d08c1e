//! The price check run: scrape each tracked product in turn, compare against
//! the last stored price, and append every observation.
//!
//! A failure on one product is logged and reported on its line of the
//! summary; the run moves on to the next product. Only a store validation
//! error aborts the run.

use std::any::Any;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Context;
use futures::FutureExt;
use pricewatch_core::{AppConfig, PriceDropAlert, ProductDescriptor, ScrapeResult, ScrapeStatus};
use pricewatch_db::DbError;
use pricewatch_scraper::{ProductScraper, ScraperConfig};
use sqlx::SqlitePool;

/// What happened to one product during a run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ItemReport {
    /// The observation was stored with this status.
    Stored {
        product_name: String,
        status: ScrapeStatus,
    },
    /// Something outside the scrape taxonomy went wrong; nothing was stored.
    Failed {
        product_name: String,
        message: String,
    },
}

#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    pub items: Vec<ItemReport>,
    pub alerts: Vec<PriceDropAlert>,
}

impl RunSummary {
    /// Count of stored observations per status.
    pub(crate) fn status_counts(&self) -> BTreeMap<ScrapeStatus, usize> {
        let mut counts = BTreeMap::new();
        for item in &self.items {
            if let ItemReport::Stored { status, .. } = item {
                *counts.entry(*status).or_insert(0) += 1;
            }
        }
        counts
    }

    pub(crate) fn failed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, ItemReport::Failed { .. }))
            .count()
    }
}

/// Loads the catalog and runs a price check over it, optionally restricted
/// to the product named `product_filter`.
///
/// # Errors
///
/// Returns an error if the named product is not tracked, the HTTP client
/// cannot be built, or the store rejects an observation as invalid.
pub(crate) async fn run_check(
    pool: &SqlitePool,
    config: &AppConfig,
    product_filter: Option<&str>,
) -> anyhow::Result<RunSummary> {
    let mut products = pricewatch_core::load_catalog(&config.products_path);
    if let Some(name) = product_filter {
        products.retain(|p| p.name == name);
        if products.is_empty() {
            anyhow::bail!("no tracked product named '{name}'");
        }
    }

    if products.is_empty() {
        println!("No products to check.");
        return Ok(RunSummary::default());
    }

    let scraper = ProductScraper::new(&ScraperConfig::from_app_config(config))
        .context("failed to build HTTP client")?;
    let delay = Duration::from_millis(config.scraper_inter_request_delay_ms);

    let summary = run_price_check(pool, &scraper, &products, delay, |scraper, product| {
        Box::pin(async move { Ok(scraper.scrape(product).await) })
    })
    .await?;
    Ok(summary)
}

/// Runs one pass over `products` in order, sleeping `delay` after each.
///
/// `scrape` receives `(ctx, product)`; an `Err` or a panic from it marks
/// that product failed without storing anything.
///
/// # Errors
///
/// Returns [`DbError::Validation`] if the store rejects an observation.
/// Every other per-product error is recorded in the summary instead.
pub(crate) async fn run_price_check<C, F>(
    pool: &SqlitePool,
    ctx: &C,
    products: &[ProductDescriptor],
    delay: Duration,
    scrape: F,
) -> Result<RunSummary, DbError>
where
    C: ?Sized,
    F: for<'a> Fn(
        &'a C,
        &'a ProductDescriptor,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ScrapeResult>> + 'a>>,
{
    let mut summary = RunSummary::default();
    println!("--- Starting price check ({} products) ---", products.len());

    for product in products {
        let attempt = AssertUnwindSafe(async { scrape(ctx, product).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(panic_error(&*payload)));

        let report = match attempt {
            Ok(result) => match record_result(pool, &result).await {
                Ok(alert) => {
                    if let Some(alert) = alert {
                        print_alert(&alert);
                        summary.alerts.push(alert);
                    }
                    ItemReport::Stored {
                        product_name: product.name.clone(),
                        status: result.status(),
                    }
                }
                Err(err @ DbError::Validation { .. }) => return Err(err),
                Err(err) => {
                    tracing::error!(product = %product.name, error = %err, "failed to store observation");
                    ItemReport::Failed {
                        product_name: product.name.clone(),
                        message: err.to_string(),
                    }
                }
            },
            Err(err) => {
                tracing::error!(product = %product.name, error = %format!("{err:#}"), "unexpected error checking product");
                ItemReport::Failed {
                    product_name: product.name.clone(),
                    message: format!("{err:#}"),
                }
            }
        };

        print_item(&report);
        summary.items.push(report);
        tokio::time::sleep(delay).await;
    }

    println!("--- Price check complete ---");
    Ok(summary)
}

/// Compares against the last stored price, then appends the observation.
/// The read happens first so the new row never counts as its own previous
/// price.
async fn record_result(
    pool: &SqlitePool,
    result: &ScrapeResult,
) -> Result<Option<PriceDropAlert>, DbError> {
    let alert = match result.price_numeric() {
        Some(new_price) => {
            let previous = pricewatch_db::latest_price(pool, &result.product_name).await?;
            PriceDropAlert::detect(&result.product_name, previous, new_price)
        }
        None => None,
    };

    pricewatch_db::append_observation(pool, &result.to_observation()).await?;
    Ok(alert)
}

fn panic_error(payload: &(dyn Any + Send)) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    anyhow::anyhow!("scraper panicked: {message}")
}

fn print_item(report: &ItemReport) {
    match report {
        ItemReport::Stored {
            product_name,
            status,
        } => println!("  [{status}] {product_name}"),
        ItemReport::Failed {
            product_name,
            message,
        } => println!("  [FAILED] {product_name}: {message}"),
    }
}

fn print_alert(alert: &PriceDropAlert) {
    println!("  *** PRICE DROP ALERT ***");
    println!(
        "  '{}' dropped from ${} to ${}!",
        alert.product_name, alert.old_price, alert.new_price
    );
}

pub(crate) fn print_summary(summary: &RunSummary) {
    if summary.items.is_empty() {
        return;
    }

    println!("Summary:");
    for (status, count) in summary.status_counts() {
        println!("  {status}: {count}");
    }
    let failed = summary.failed_count();
    if failed > 0 {
        println!("  FAILED: {failed}");
    }

    if summary.alerts.is_empty() {
        println!("No price drops.");
    } else {
        println!("Price drops:");
        for alert in &summary.alerts {
            println!(
                "  {}: {} -> {}",
                alert.product_name, alert.old_price, alert.new_price
            );
        }
    }
}

#[cfg(test)]
#[path = "check_test.rs"]
mod tests;
