use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid {name} header value: {reason}")]
    InvalidHeader { name: &'static str, reason: String },
}

impl ScraperError {
    /// Returns `true` for transient transport failures worth another attempt.
    ///
    /// **Retriable:**
    /// - Network-level failures: timeout, connection refused/reset, DNS, body
    ///   read interrupted.
    /// - HTTP 5xx and 429 responses.
    ///
    /// **Not retriable:**
    /// - Other non-2xx statuses (404, 403, ...): the page will not change.
    /// - Request construction and header errors.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            ScraperError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.is_request() || e.is_body()
            }
            ScraperError::UnexpectedStatus { status, .. } => {
                *status == 429 || (500..600).contains(status)
            }
            ScraperError::InvalidHeader { .. } => false,
        }
    }
}
