//! Shop scrapers
//!
//! Every supported shop is a variant of [`ShopScraper`]. The list of shops to check is
//! built explicitly and handed to the monitor; nothing is registered globally.

mod oberpfalz_beef;

pub use oberpfalz_beef::OberpfalzBeefScraper;

use crate::error::Result;
use crate::models::{Product, Scraper};

/// All known shop scrapers
#[derive(Debug, Clone)]
pub enum ShopScraper {
    OberpfalzBeef(OberpfalzBeefScraper),
}

impl ShopScraper {
    /// The shops checked by a default run
    pub fn default_registry() -> Vec<ShopScraper> {
        vec![ShopScraper::OberpfalzBeef(OberpfalzBeefScraper::default())]
    }
}

impl From<OberpfalzBeefScraper> for ShopScraper {
    fn from(scraper: OberpfalzBeefScraper) -> Self {
        ShopScraper::OberpfalzBeef(scraper)
    }
}

impl Scraper for ShopScraper {
    fn name(&self) -> &str {
        match self {
            ShopScraper::OberpfalzBeef(s) => s.name(),
        }
    }

    async fn scrape(&self, client: &reqwest::Client) -> Result<Vec<Product>> {
        match self {
            ShopScraper::OberpfalzBeef(s) => s.scrape(client).await,
        }
    }
}
