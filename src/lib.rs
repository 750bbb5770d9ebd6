//! Price Monitor - shop price tracking
//!
//! Fetches a shop's current product listing, diffs it against the last persisted
//! snapshot and reports price changes, new products and removals.

pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod notifier;
pub mod scrapers;
pub mod store;

pub use config::Config;
pub use error::{MonitorError, Result};
pub use models::{Product, Scraper};
pub use monitor::{Monitor, Notification, RunSummary, ShopOutcome, ShopReport};
pub use notifier::TelegramNotifier;
pub use scrapers::{OberpfalzBeefScraper, ShopScraper};
pub use store::{PriceChange, PriceDiff, PriceStore, ShopSnapshot, StoreDocument, StoredProduct};
