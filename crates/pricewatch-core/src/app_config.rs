use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub products_path: PathBuf,
    pub log_level: String,
    pub db_busy_timeout_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_accept_language: String,
    /// Total attempts per fetch, including the first one.
    pub scraper_max_attempts: u32,
    /// Base delay for exponential backoff: the wait after failed attempt `n`
    /// (0-based) is `scraper_retry_backoff_base_ms * 2^n`.
    pub scraper_retry_backoff_base_ms: u64,
    /// Pause after every product, success or failure.
    pub scraper_inter_request_delay_ms: u64,
}
