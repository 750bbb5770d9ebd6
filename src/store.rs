//! Persistent price snapshots and snapshot diffing
//!
//! The whole state lives in a single JSON document mapping shop names to their last
//! known product set. The document is re-read on every operation and written back
//! as a whole by [`PriceStore::update`].

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Product;

/// Persisted projection of a [`Product`]; the id is the map key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProduct {
    pub name: String,
    pub price: f64,
}

/// Last known state of one shop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSnapshot {
    /// Product id -> stored product, in listing order
    pub products: IndexMap<String, StoredProduct>,
    pub last_checked: DateTime<Utc>,
}

impl ShopSnapshot {
    /// Build a snapshot from a product listing. Duplicate ids keep the position of the
    /// first occurrence and the values of the last.
    pub fn from_products(products: &[Product], last_checked: DateTime<Utc>) -> Self {
        let products = products
            .iter()
            .map(|p| {
                (
                    p.id.clone(),
                    StoredProduct {
                        name: p.name.clone(),
                        price: p.price,
                    },
                )
            })
            .collect();
        Self {
            products,
            last_checked,
        }
    }
}

/// Whole persisted state: shop name -> snapshot, in file order
pub type StoreDocument = IndexMap<String, ShopSnapshot>;

/// A price that moved between the stored snapshot and the current listing
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub product_id: String,
    pub product_name: String,
    pub old_price: f64,
    pub new_price: f64,
}

impl PriceChange {
    /// Signed difference, negative when the product got cheaper
    pub fn diff(&self) -> f64 {
        self.new_price - self.old_price
    }
}

/// Everything that changed for one shop since its last snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDiff {
    pub shop_name: String,
    /// In current listing order
    pub changes: Vec<PriceChange>,
    /// In current listing order
    pub new_products: Vec<Product>,
    /// In stored snapshot order
    pub removed_product_ids: Vec<String>,
}

impl PriceDiff {
    /// Diff a current listing against the stored products of a shop.
    ///
    /// Prices are compared exactly. Duplicate ids in `current` are each reported on
    /// their own but count once for removal detection.
    pub fn between(
        shop_name: &str,
        old_products: &IndexMap<String, StoredProduct>,
        current: &[Product],
    ) -> Self {
        let current_by_id: HashMap<&str, &Product> =
            current.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut changes = Vec::new();
        let mut new_products = Vec::new();

        for product in current {
            match old_products.get(&product.id) {
                None => new_products.push(product.clone()),
                Some(old) if old.price != product.price => changes.push(PriceChange {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    old_price: old.price,
                    new_price: product.price,
                }),
                Some(_) => {}
            }
        }

        let removed_product_ids = old_products
            .keys()
            .filter(|id| !current_by_id.contains_key(id.as_str()))
            .cloned()
            .collect();

        Self {
            shop_name: shop_name.to_string(),
            changes,
            new_products,
            removed_product_ids,
        }
    }

    /// True when there is nothing to report
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
            && self.new_products.is_empty()
            && self.removed_product_ids.is_empty()
    }
}

/// JSON file backed snapshot store
#[derive(Debug, Clone)]
pub struct PriceStore {
    path: PathBuf,
}

impl PriceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the store document.
    ///
    /// A missing file yields an empty document. Content that is not a JSON object
    /// yields an empty document, and shop entries that do not have the snapshot
    /// shape are dropped individually. Only genuine I/O failures are errors.
    pub fn load(&self) -> Result<StoreDocument> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(StoreDocument::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(parse_document(&content))
    }

    /// Write the whole document as indented JSON, creating parent directories
    pub fn save(&self, document: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = serde_json::to_string_pretty(document)?;
        content.push('\n');
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Diff `current` against the stored snapshot of `shop_name`. Never writes.
    pub fn compare(&self, shop_name: &str, current: &[Product]) -> Result<PriceDiff> {
        let document = self.load()?;
        let empty = IndexMap::new();
        let old_products = document
            .get(shop_name)
            .map_or(&empty, |snapshot| &snapshot.products);
        Ok(PriceDiff::between(shop_name, old_products, current))
    }

    /// Replace the snapshot of `shop_name` with `products`, stamped with the current time
    pub fn update(&self, shop_name: &str, products: &[Product]) -> Result<()> {
        let mut document = self.load()?;
        document.insert(
            shop_name.to_string(),
            ShopSnapshot::from_products(products, Utc::now()),
        );
        self.save(&document)
    }
}

/// Validate each shop entry on its own so one bad entry does not discard the rest
fn parse_document(content: &[u8]) -> StoreDocument {
    let parsed = serde_json::from_slice::<serde_json::Value>(content);
    let Ok(serde_json::Value::Object(entries)) = parsed else {
        return StoreDocument::new();
    };

    entries
        .into_iter()
        .filter_map(|(shop, entry)| {
            serde_json::from_value::<ShopSnapshot>(entry)
                .ok()
                .map(|snapshot| (shop, snapshot))
        })
        .collect()
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
