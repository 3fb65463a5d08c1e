//! Scrape outcomes and the observation records persisted from them.

use std::fmt;

use chrono::{Local, NaiveDateTime, Timelike};

/// Wall-clock format used for display and for ordering in the store.
///
/// Lexicographic order of strings in this format matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time truncated to whole seconds.
#[must_use]
pub fn now_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp written by [`format_timestamp`].
///
/// # Errors
///
/// Returns [`chrono::ParseError`] if `raw` is not in [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
}

/// Closed set of outcomes for a single scrape attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScrapeStatus {
    Ok,
    InvalidInput,
    NetworkError,
    SelectorMiss,
    ParseError,
}

impl ScrapeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeStatus::Ok => "OK",
            ScrapeStatus::InvalidInput => "INVALID_INPUT",
            ScrapeStatus::NetworkError => "NETWORK_ERROR",
            ScrapeStatus::SelectorMiss => "SELECTOR_MISS",
            ScrapeStatus::ParseError => "PARSE_ERROR",
        }
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a scrape attempt produced, with exactly the fields each status carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    Ok {
        title: String,
        price: String,
        price_numeric: f64,
    },
    /// The descriptor was unusable; no request was made.
    InvalidInput { reason: String },
    /// Fetch failed after exhausting retries.
    NetworkError { message: String },
    /// Title or price marker absent from the page.
    SelectorMiss,
    /// Both markers found but the price text holds no number.
    ParseError { title: String, price: String },
}

impl ScrapeOutcome {
    #[must_use]
    pub fn status(&self) -> ScrapeStatus {
        match self {
            ScrapeOutcome::Ok { .. } => ScrapeStatus::Ok,
            ScrapeOutcome::InvalidInput { .. } => ScrapeStatus::InvalidInput,
            ScrapeOutcome::NetworkError { .. } => ScrapeStatus::NetworkError,
            ScrapeOutcome::SelectorMiss => ScrapeStatus::SelectorMiss,
            ScrapeOutcome::ParseError { .. } => ScrapeStatus::ParseError,
        }
    }
}

/// A typed scrape outcome plus the context needed to persist it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeResult {
    /// Captured when the attempt started.
    pub timestamp: NaiveDateTime,
    pub product_name: String,
    pub url: String,
    pub outcome: ScrapeOutcome,
}

impl ScrapeResult {
    #[must_use]
    pub fn status(&self) -> ScrapeStatus {
        self.outcome.status()
    }

    #[must_use]
    pub fn price_numeric(&self) -> Option<f64> {
        match self.outcome {
            ScrapeOutcome::Ok { price_numeric, .. } => Some(price_numeric),
            _ => None,
        }
    }

    /// Diagnostic message for failed attempts.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            ScrapeOutcome::InvalidInput { reason } => Some(reason),
            ScrapeOutcome::NetworkError { message } => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_observation(&self) -> Observation {
        let (scraped_title, price, price_numeric) = match &self.outcome {
            ScrapeOutcome::Ok {
                title,
                price,
                price_numeric,
            } => (Some(title.clone()), Some(price.clone()), Some(*price_numeric)),
            ScrapeOutcome::ParseError { title, price } => {
                (Some(title.clone()), Some(price.clone()), None)
            }
            ScrapeOutcome::InvalidInput { .. }
            | ScrapeOutcome::NetworkError { .. }
            | ScrapeOutcome::SelectorMiss => (None, None, None),
        };

        Observation {
            timestamp: self.timestamp,
            product_name: self.product_name.clone(),
            scraped_title,
            price,
            price_numeric,
            status: self.status(),
        }
    }
}

/// One row of price history. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub product_name: String,
    pub scraped_title: Option<String>,
    /// Price text exactly as displayed on the page.
    pub price: Option<String>,
    pub price_numeric: Option<f64>,
    pub status: ScrapeStatus,
}

/// Display slice of an [`Observation`], as returned by history queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: NaiveDateTime,
    pub scraped_title: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceDropAlert {
    pub product_name: String,
    pub old_price: f64,
    pub new_price: f64,
}

impl PriceDropAlert {
    /// Returns an alert when `new_price` is strictly below `previous`.
    ///
    /// Equal or higher prices, and the absence of any previous price, never alert.
    #[must_use]
    pub fn detect(product_name: &str, previous: Option<f64>, new_price: f64) -> Option<Self> {
        let old_price = previous?;
        (new_price < old_price).then(|| Self {
            product_name: product_name.to_string(),
            old_price,
            new_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap()
    }

    fn result(outcome: ScrapeOutcome) -> ScrapeResult {
        ScrapeResult {
            timestamp: ts(),
            product_name: "Laptop".to_string(),
            url: "https://articulo.example.com/MCO-1".to_string(),
            outcome,
        }
    }

    #[test]
    fn status_strings_match_persisted_values() {
        assert_eq!(ScrapeStatus::Ok.as_str(), "OK");
        assert_eq!(ScrapeStatus::InvalidInput.as_str(), "INVALID_INPUT");
        assert_eq!(ScrapeStatus::NetworkError.as_str(), "NETWORK_ERROR");
        assert_eq!(ScrapeStatus::SelectorMiss.as_str(), "SELECTOR_MISS");
        assert_eq!(ScrapeStatus::ParseError.as_str(), "PARSE_ERROR");
    }

    #[test]
    fn timestamp_format_is_second_precision() {
        assert_eq!(format_timestamp(&ts()), "2026-03-14 09:26:53");
        assert_eq!(parse_timestamp("2026-03-14 09:26:53").unwrap(), ts());
    }

    #[test]
    fn now_timestamp_has_no_subsecond_part() {
        assert_eq!(now_timestamp().nanosecond(), 0);
    }

    #[test]
    fn ok_result_maps_all_fields() {
        let obs = result(ScrapeOutcome::Ok {
            title: "Laptop Pro 14".to_string(),
            price: "1.299.900".to_string(),
            price_numeric: 1_299_900.0,
        })
        .to_observation();

        assert_eq!(obs.status, ScrapeStatus::Ok);
        assert_eq!(obs.product_name, "Laptop");
        assert_eq!(obs.scraped_title.as_deref(), Some("Laptop Pro 14"));
        assert_eq!(obs.price.as_deref(), Some("1.299.900"));
        assert_eq!(obs.price_numeric, Some(1_299_900.0));
        assert_eq!(obs.timestamp, ts());
    }

    #[test]
    fn parse_error_keeps_raw_text_without_number() {
        let obs = result(ScrapeOutcome::ParseError {
            title: "Laptop Pro 14".to_string(),
            price: "Consultar".to_string(),
        })
        .to_observation();

        assert_eq!(obs.status, ScrapeStatus::ParseError);
        assert_eq!(obs.scraped_title.as_deref(), Some("Laptop Pro 14"));
        assert_eq!(obs.price.as_deref(), Some("Consultar"));
        assert!(obs.price_numeric.is_none());
    }

    #[test]
    fn failed_results_have_no_optional_fields() {
        for outcome in [
            ScrapeOutcome::InvalidInput {
                reason: "missing url".to_string(),
            },
            ScrapeOutcome::NetworkError {
                message: "connection refused".to_string(),
            },
            ScrapeOutcome::SelectorMiss,
        ] {
            let r = result(outcome);
            assert!(r.price_numeric().is_none());
            let obs = r.to_observation();
            assert!(obs.scraped_title.is_none());
            assert!(obs.price.is_none());
            assert!(obs.price_numeric.is_none());
        }
    }

    #[test]
    fn error_message_only_for_failures_with_diagnostics() {
        let r = result(ScrapeOutcome::NetworkError {
            message: "timed out".to_string(),
        });
        assert_eq!(r.error_message(), Some("timed out"));
        assert!(result(ScrapeOutcome::SelectorMiss).error_message().is_none());
    }

    #[test]
    fn drop_alert_fires_only_on_strict_decrease() {
        let alert = PriceDropAlert::detect("Laptop", Some(199.99), 149.99).unwrap();
        assert_eq!(alert.product_name, "Laptop");
        assert!((alert.old_price - 199.99).abs() < f64::EPSILON);
        assert!((alert.new_price - 149.99).abs() < f64::EPSILON);

        assert!(PriceDropAlert::detect("Laptop", Some(199.99), 199.99).is_none());
        assert!(PriceDropAlert::detect("Laptop", Some(199.99), 250.00).is_none());
    }

    #[test]
    fn drop_alert_needs_previous_price() {
        assert!(PriceDropAlert::detect("Laptop", None, 1.0).is_none());
    }
}
