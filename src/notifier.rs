//! Telegram notifications for price diffs

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{MonitorError, Result};
use crate::store::PriceDiff;

const API_BASE_URL: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Error body returned by the Bot API
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    description: Option<String>,
}

/// Sends price diffs to a Telegram chat through the Bot API
pub struct TelegramNotifier {
    pub(crate) client: Client,
    pub(crate) bot_token: String,
    pub(crate) chat_id: String,
    pub(crate) base_url: String,
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            base_url: API_BASE_URL.to_string(),
        }
    }

    /// Point the notifier at a different Bot API server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send the diff as an HTML message.
    ///
    /// Returns `Ok(false)` without contacting Telegram when the diff renders to an
    /// empty message.
    pub async fn notify(&self, diff: &PriceDiff) -> Result<bool> {
        let message = Self::format(diff);
        if message.is_empty() {
            return Ok(false);
        }

        let url = format!("{}/bot{}/sendMessage", self.base_url, self.bot_token);
        log::debug!(
            "Sending Telegram message ({} chars) to chat {}",
            message.len(),
            self.chat_id
        );

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text: &message,
                parse_mode: "HTML",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let description = response
                .json::<ApiErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.description)
                .unwrap_or_else(|| "no description".to_string());
            return Err(MonitorError::Telegram {
                status,
                description,
            });
        }

        Ok(true)
    }

    /// Render a diff as Telegram HTML. An empty diff renders as an empty string.
    pub fn format(diff: &PriceDiff) -> String {
        let shop = escape_html(&diff.shop_name);
        let mut lines: Vec<String> = Vec::new();

        if !diff.changes.is_empty() {
            lines.push(format!("<b>💰 Price changes in {}:</b>", shop));
            for change in &diff.changes {
                let arrow = if change.diff() < 0.0 { "📉" } else { "📈" };
                lines.push(format!(
                    "  {} {}: {:.2}€ → {:.2}€ ({:+.2}€)",
                    arrow,
                    escape_html(&change.product_name),
                    change.old_price,
                    change.new_price,
                    change.diff()
                ));
            }
        }

        if !diff.new_products.is_empty() {
            lines.push(format!("\n<b>🆕 New products in {}:</b>", shop));
            for product in &diff.new_products {
                lines.push(format!(
                    "  • {}: {:.2}€",
                    escape_html(&product.name),
                    product.price
                ));
            }
        }

        if !diff.removed_product_ids.is_empty() {
            lines.push(format!(
                "\n<b>❌ {} product(s) removed from {}</b>",
                diff.removed_product_ids.len(),
                shop
            ));
        }

        lines.join("\n")
    }
}

/// Escape the characters Telegram's HTML parse mode treats as markup
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
