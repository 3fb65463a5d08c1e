use serde::Serialize;

/// One tracked item: a display name and the product page to scrape.
///
/// `name` doubles as the join key into price history. The catalog does not
/// enforce name uniqueness, so two entries sharing a name share a history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDescriptor {
    pub name: String,
    pub url: String,
}

impl ProductDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Returns the trimmed URL, or `None` when it is blank.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        let url = self.url.trim();
        (!url.is_empty()).then_some(url)
    }
}
