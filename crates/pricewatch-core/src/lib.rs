//! Shared domain types and configuration for pricewatch.
//!
//! Everything that more than one crate needs to agree on lives here: the
//! product descriptor handed out by the catalog, the typed scrape outcome,
//! the persisted observation shape, and the environment-driven config.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod observation;
pub mod products;

use thiserror::Error;

pub use app_config::AppConfig;
pub use catalog::{add_product, load_catalog, normalize_url, remove_product, save_catalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use observation::{
    format_timestamp, now_timestamp, parse_timestamp, HistoryEntry, Observation, PriceDropAlert,
    ScrapeOutcome, ScrapeResult, ScrapeStatus, TIMESTAMP_FORMAT,
};
pub use products::ProductDescriptor;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product name and URL cannot be empty")]
    EmptyField,

    #[error("invalid URL \"{url}\": include scheme and domain (e.g. https://example.com/item)")]
    InvalidUrl { url: String },

    #[error("this URL is already being tracked as '{existing}'")]
    DuplicateUrl { existing: String },

    #[error("no tracked product named '{0}'")]
    UnknownProduct(String),

    #[error("failed to write catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
}
