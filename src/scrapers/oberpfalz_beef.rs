//! Oberpfalz Beef lamb category
//!
//! The shop renders no machine readable product list, but its tag manager embeds a
//! Google Analytics style `dataLayer` as a JSON string literal:
//! `onEventDataLayer = JSON.parse('[{"event":"view_item_list","ecommerce":{"items":[...]}}]')`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{MonitorError, Result};
use crate::models::{Product, Scraper};

const SHOP_NAME: &str = "oberpfalz-beef-lamm";
const DEFAULT_URL: &str = "https://www.oberpfalz-beef.de/wild-lamm/lamm/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

lazy_static! {
    static ref DATA_LAYER_PATTERN: Regex =
        Regex::new(r"onEventDataLayer\s*=\s*JSON\.parse\('(.+?)'\)")
            .expect("dataLayer pattern is valid");
}

#[derive(Debug, Deserialize)]
struct DataLayerEvent {
    ecommerce: Ecommerce,
}

#[derive(Debug, Deserialize)]
struct Ecommerce {
    items: Vec<DataLayerItem>,
}

#[derive(Debug, Deserialize)]
struct DataLayerItem {
    item_id: ItemId,
    item_name: String,
    price: ItemPrice,
}

/// Item ids show up both as numbers and as strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemPrice {
    Number(f64),
    Text(String),
}

/// Scraper for the lamb category of oberpfalz-beef.de
#[derive(Debug, Clone)]
pub struct OberpfalzBeefScraper {
    url: String,
}

impl Default for OberpfalzBeefScraper {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl OberpfalzBeefScraper {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Extract the product list from a category page
    pub fn parse(&self, html: &str) -> Result<Vec<Product>> {
        let captures = DATA_LAYER_PATTERN
            .captures(html)
            .ok_or_else(|| MonitorError::MissingProductData {
                url: self.url.clone(),
            })?;

        let raw = captures[1].replace("\\/", "/");
        let events: Vec<DataLayerEvent> = serde_json::from_str(&raw)?;
        let event = events
            .into_iter()
            .next()
            .ok_or_else(|| self.invalid("dataLayer is empty"))?;

        event
            .ecommerce
            .items
            .into_iter()
            .map(|item| self.to_product(item))
            .collect()
    }

    fn to_product(&self, item: DataLayerItem) -> Result<Product> {
        let id = match item.item_id {
            ItemId::Text(id) => id,
            ItemId::Number(id) => id.to_string(),
        };
        let price = match item.price {
            ItemPrice::Number(price) => price,
            ItemPrice::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                self.invalid(&format!("invalid price {:?} for item {}", text, id))
            })?,
        };
        if !price.is_finite() {
            return Err(self.invalid(&format!("non-finite price for item {}", id)));
        }

        Ok(Product {
            id,
            name: item.item_name,
            price,
        })
    }

    fn invalid(&self, reason: &str) -> MonitorError {
        MonitorError::InvalidProductData {
            url: self.url.clone(),
            reason: reason.to_string(),
        }
    }
}

impl Scraper for OberpfalzBeefScraper {
    fn name(&self) -> &str {
        SHOP_NAME
    }

    async fn scrape(&self, client: &reqwest::Client) -> Result<Vec<Product>> {
        log::debug!("Fetching product page: {}", self.url);

        let response = client
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MonitorError::HttpStatus(response.status()));
        }

        let html = response.text().await?;
        self.parse(&html)
    }
}

#[cfg(test)]
#[path = "oberpfalz_beef_tests.rs"]
mod tests;
