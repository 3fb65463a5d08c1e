use std::time::Duration;

use pricewatch_core::{now_timestamp, AppConfig, ProductDescriptor, ScrapeOutcome, ScrapeResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::extract::classify_page;
use crate::retry::{retry_with_backoff, RetryPolicy};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Connection settings for [`ProductScraper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    /// Per-attempt timeout covering connect, headers, and body.
    pub request_timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
    pub retry: RetryPolicy,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            user_agent: pricewatch_core::config::DEFAULT_USER_AGENT.to_string(),
            accept_language: pricewatch_core::config::DEFAULT_ACCEPT_LANGUAGE.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ScraperConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.scraper_request_timeout_secs),
            user_agent: config.scraper_user_agent.clone(),
            accept_language: config.scraper_accept_language.clone(),
            retry: RetryPolicy::new(
                config.scraper_max_attempts,
                Duration::from_millis(config.scraper_retry_backoff_base_ms),
            ),
        }
    }
}

/// Fetches product pages and turns each into a classified [`ScrapeResult`].
///
/// Transport failures (timeouts, refused connections, 5xx, 429) are retried
/// per the configured [`RetryPolicy`]. Other non-2xx statuses fail on the
/// first attempt.
pub struct ProductScraper {
    client: Client,
    retry: RetryPolicy,
}

impl ProductScraper {
    /// Builds the underlying HTTP client with the browser-like default headers.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidHeader`] if the user agent or accept-language
    ///   value is not a legal header value.
    /// - [`ScraperError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(config: &ScraperConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(default_headers(config)?)
            .build()?;
        Ok(Self {
            client,
            retry: config.retry,
        })
    }

    /// Scrapes one product. Never fails: every problem becomes an outcome
    /// on the returned [`ScrapeResult`].
    ///
    /// The timestamp is taken when the attempt starts. A missing or
    /// non-http(s) URL short-circuits to [`ScrapeOutcome::InvalidInput`]
    /// without touching the network.
    pub async fn scrape(&self, product: &ProductDescriptor) -> ScrapeResult {
        let timestamp = now_timestamp();
        let outcome = self.scrape_outcome(product).await;

        match &outcome {
            ScrapeOutcome::Ok { price_numeric, .. } => {
                tracing::info!(product = %product.name, price = price_numeric, "scraped price");
            }
            ScrapeOutcome::NetworkError { message } => {
                tracing::error!(product = %product.name, error = %message, "fetch failed");
            }
            other => {
                tracing::warn!(product = %product.name, status = %other.status(), "scrape produced no price");
            }
        }

        ScrapeResult {
            timestamp,
            product_name: product.name.clone(),
            url: product.url.clone(),
            outcome,
        }
    }

    async fn scrape_outcome(&self, product: &ProductDescriptor) -> ScrapeOutcome {
        let url = match validate_url(product.url()) {
            Ok(url) => url,
            Err(reason) => return ScrapeOutcome::InvalidInput { reason },
        };

        match self.fetch_html(&url).await {
            Ok(body) => classify_page(&body),
            Err(e) => ScrapeOutcome::NetworkError {
                message: e.to_string(),
            },
        }
    }

    /// GETs `url` and returns the body text, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for a non-2xx final response.
    /// - [`ScraperError::Http`] for transport failures after all attempts.
    pub async fn fetch_html(&self, url: &Url) -> Result<String, ScraperError> {
        retry_with_backoff(&self.retry, ScraperError::is_retriable, || async {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            Ok(response.text().await?)
        })
        .await
    }
}

fn default_headers(config: &ScraperConfig) -> Result<HeaderMap, ScraperError> {
    let header = |name: &'static str, value: &str| {
        HeaderValue::from_str(value).map_err(|e| ScraperError::InvalidHeader {
            name,
            reason: e.to_string(),
        })
    };

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header("User-Agent", &config.user_agent)?);
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(
        ACCEPT_LANGUAGE,
        header("Accept-Language", &config.accept_language)?,
    );
    headers.insert(CONNECTION, HeaderValue::from_static("close"));
    Ok(headers)
}

fn validate_url(raw: Option<&str>) -> Result<Url, String> {
    let raw = raw.ok_or_else(|| "product URL is empty".to_string())?;
    let url = Url::parse(raw).map_err(|e| format!("invalid product URL {raw:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported URL scheme {other:?}")),
    }
}
