//! Title/price extraction from a product page and outcome classification.

use std::sync::LazyLock;

use pricewatch_core::ScrapeOutcome;
use scraper::{ElementRef, Html, Selector};

pub const TITLE_SELECTOR: &str = "h1.ui-pdp-title";
pub const PRICE_SELECTOR: &str =
    "div.ui-pdp-price__second-line span.andes-money-amount__fraction";

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(TITLE_SELECTOR).expect("valid title selector"));
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(PRICE_SELECTOR).expect("valid price selector"));

/// Normalizes displayed price text to a number by dropping every non-digit.
///
/// The marketplace shows whole amounts with `.` as a thousands separator, so
/// `"$ 1.299.900"` becomes `1299900.0`. Any decimal part would be folded into
/// the integer. Returns `None` when the text holds no digits.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Applies the title and price selectors to `html` and classifies the page.
///
/// Either selector missing yields [`ScrapeOutcome::SelectorMiss`] with no
/// partial data. Both present but an unparseable price yields
/// [`ScrapeOutcome::ParseError`] carrying the raw texts.
#[must_use]
pub fn classify_page(html: &str) -> ScrapeOutcome {
    let document = Html::parse_document(html);

    let title = document.select(&TITLE).next();
    let price = document.select(&PRICE).next();
    let (Some(title), Some(price)) = (title, price) else {
        return ScrapeOutcome::SelectorMiss;
    };

    let title = element_text(title);
    let price = element_text(price);

    match parse_price(&price) {
        Some(price_numeric) => ScrapeOutcome::Ok {
            title,
            price,
            price_numeric,
        },
        None => ScrapeOutcome::ParseError { title, price },
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
