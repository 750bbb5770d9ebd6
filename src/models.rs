use crate::error::Result;

/// A product as currently listed by a shop
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Shop-specific identifier, unique within one listing
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// A source that can produce the current product list of one shop
#[allow(async_fn_in_trait)]
pub trait Scraper {
    /// Stable shop name, used as the snapshot key
    fn name(&self) -> &str;

    /// Fetch the complete current listing. Never returns a partial list.
    async fn scrape(&self, client: &reqwest::Client) -> Result<Vec<Product>>;
}
