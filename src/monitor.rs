//! One monitoring pass: scrape, diff, notify, update
//!
//! Shops are processed strictly one after another. A failing scraper only skips its
//! own shop, and a failed notification never prevents the snapshot from advancing.
//! Snapshot I/O errors abort the pass.

use reqwest::Client;

use crate::config::Config;
use crate::error::Result;
use crate::models::Scraper;
use crate::notifier::TelegramNotifier;
use crate::scrapers::ShopScraper;
use crate::store::{PriceDiff, PriceStore};

const USER_AGENT: &str = "price_monitor/1.0";

/// What happened to the notification for one shop
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Nothing to send, notifications disabled, or dry run
    Skipped,
    Sent,
    Failed(String),
}

/// Result of checking one shop
#[derive(Debug, Clone, PartialEq)]
pub enum ShopOutcome {
    ScrapeFailed(String),
    Checked {
        product_count: usize,
        changed: bool,
        notification: Notification,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopReport {
    pub shop: String,
    pub outcome: ShopOutcome,
}

/// Per-shop reports of a pass, in registry order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub reports: Vec<ShopReport>,
}

impl RunSummary {
    /// Number of shops whose scraper failed
    pub fn failed_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, ShopOutcome::ScrapeFailed(_)))
            .count()
    }

    /// Number of shops with at least one change
    pub fn changed_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, ShopOutcome::Checked { changed: true, .. }))
            .count()
    }
}

/// Runs the configured scrapers against the snapshot store
#[derive(Debug)]
pub struct Monitor {
    store: PriceStore,
    notifier: Option<TelegramNotifier>,
    scrapers: Vec<ShopScraper>,
    client: Client,
    dry_run: bool,
}

impl Monitor {
    pub fn new(config: &Config, scrapers: Vec<ShopScraper>) -> Result<Self> {
        let notifier = config.notifier();
        if notifier.is_none() {
            log::warn!("Telegram credentials not set, notifications disabled.");
        }

        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            store: PriceStore::new(config.data_path.clone()),
            notifier,
            scrapers,
            client,
            dry_run: config.dry_run,
        })
    }

    /// Replace the notifier built from the configuration
    pub fn with_notifier(mut self, notifier: Option<TelegramNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store(&self) -> &PriceStore {
        &self.store
    }

    /// Check every configured shop once
    pub async fn run_once(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for scraper in &self.scrapers {
            let shop = scraper.name();
            log::info!("Checking {}...", shop);

            let products = match scraper.scrape(&self.client).await {
                Ok(products) => products,
                Err(e) => {
                    log::error!("Error scraping {}: {}", shop, e);
                    summary.reports.push(ShopReport {
                        shop: shop.to_string(),
                        outcome: ShopOutcome::ScrapeFailed(e.to_string()),
                    });
                    continue;
                }
            };
            log::info!("Found {} products.", products.len());

            let diff = self.store.compare(shop, &products)?;
            let changed = !diff.is_empty();
            let notification = if changed {
                log::info!(
                    "Changes detected! {} price change(s), {} new, {} removed",
                    diff.changes.len(),
                    diff.new_products.len(),
                    diff.removed_product_ids.len()
                );
                self.send(&diff).await
            } else {
                log::info!("No changes.");
                Notification::Skipped
            };

            if self.dry_run {
                log::info!("Dry run, snapshot for {} left untouched", shop);
            } else {
                self.store.update(shop, &products)?;
            }

            summary.reports.push(ShopReport {
                shop: shop.to_string(),
                outcome: ShopOutcome::Checked {
                    product_count: products.len(),
                    changed,
                    notification,
                },
            });
        }

        Ok(summary)
    }

    async fn send(&self, diff: &PriceDiff) -> Notification {
        if self.dry_run {
            log::info!("Dry run, message not sent:\n{}", TelegramNotifier::format(diff));
            return Notification::Skipped;
        }

        let Some(notifier) = &self.notifier else {
            return Notification::Skipped;
        };

        match notifier.notify(diff).await {
            Ok(true) => {
                log::info!("Telegram notification sent.");
                Notification::Sent
            }
            Ok(false) => Notification::Skipped,
            Err(e) => {
                log::error!("Error sending notification: {}", e);
                Notification::Failed(e.to_string())
            }
        }
    }
}
