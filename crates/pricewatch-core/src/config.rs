use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "es-CO,es;q=0.9,en;q=0.8";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// config. Decoupled from the real environment so it can be tested with a
/// plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_path = PathBuf::from(or_default("PRICEWATCH_DATABASE_PATH", "price_history.db"));
    let products_path = PathBuf::from(or_default("PRICEWATCH_PRODUCTS_PATH", "products.json"));
    let log_level = or_default("PRICEWATCH_LOG_LEVEL", "info");

    let db_busy_timeout_secs = parse_u64("PRICEWATCH_DB_BUSY_TIMEOUT_SECS", "5")?;

    let scraper_request_timeout_secs = parse_u64("PRICEWATCH_SCRAPER_REQUEST_TIMEOUT_SECS", "10")?;
    let scraper_user_agent = or_default("PRICEWATCH_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_accept_language = or_default(
        "PRICEWATCH_SCRAPER_ACCEPT_LANGUAGE",
        DEFAULT_ACCEPT_LANGUAGE,
    );
    let scraper_max_attempts = parse_u32("PRICEWATCH_SCRAPER_MAX_ATTEMPTS", "3")?;
    if scraper_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRICEWATCH_SCRAPER_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let scraper_retry_backoff_base_ms =
        parse_u64("PRICEWATCH_SCRAPER_RETRY_BACKOFF_BASE_MS", "1000")?;
    let scraper_inter_request_delay_ms =
        parse_u64("PRICEWATCH_SCRAPER_INTER_REQUEST_DELAY_MS", "1000")?;

    Ok(AppConfig {
        database_path,
        products_path,
        log_level,
        db_busy_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_accept_language,
        scraper_max_attempts,
        scraper_retry_backoff_base_ms,
        scraper_inter_request_delay_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
