//! HTTP scraping of marketplace product pages.
//!
//! [`ProductScraper`] fetches a page with bounded retries and classifies it
//! into a [`pricewatch_core::ScrapeOutcome`]; [`retry`] holds the generic
//! backoff executor it uses.

pub mod client;
pub mod error;
pub mod extract;
pub mod retry;

pub use client::{ProductScraper, ScraperConfig};
pub use error::ScraperError;
pub use extract::{classify_page, parse_price, PRICE_SELECTOR, TITLE_SELECTOR};
pub use retry::{retry_with_backoff, RetryPolicy};
