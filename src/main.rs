//! Price Monitor - shop price tracking
//!
//! Checks every configured shop, reports price changes via Telegram and advances the
//! stored snapshot. Runs once by default, or periodically with `--interval-hours`.

use clap::Parser;
use price_monitor::config::DEFAULT_DATA_PATH;
use price_monitor::{Config, Monitor, ShopScraper};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::interval;

const MAX_INTERVAL_HOURS: u64 = 24 * 366;

/// Shop price monitor - diffs product listings and notifies via Telegram
#[derive(Parser, Debug)]
#[command(name = "price_monitor")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the JSON snapshot file
    #[arg(long, env = "PRICE_DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    data_path: PathBuf,

    /// Telegram bot token (notifications are disabled without it)
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    telegram_bot_token: Option<String>,

    /// Telegram chat to notify
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    telegram_chat_id: Option<String>,

    /// Log detected changes without notifying or updating the snapshot
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Repeat the check every N hours instead of running once (at most one year)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_HOURS))]
    interval_hours: Option<u64>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            data_path: args.data_path,
            telegram_bot_token: args.telegram_bot_token,
            telegram_chat_id: args.telegram_chat_id,
            dry_run: args.dry_run,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let interval_hours = args.interval_hours;
    let config = Config::from(args);

    log::info!("Starting price_monitor...");
    log::info!("Snapshot file: {}", config.data_path.display());

    let monitor = match Monitor::new(&config, ShopScraper::default_registry()) {
        Ok(monitor) => monitor,
        Err(e) => {
            log::error!("Failed to set up monitor: {}", e);
            std::process::exit(1);
        }
    };

    match interval_hours {
        Some(hours) => {
            log::info!("Running in daemon mode, checking every {} hour(s)", hours);
            run_daemon(&monitor, hours).await;
        }
        None => {
            if !run_pass(&monitor).await {
                std::process::exit(1);
            }
        }
    }
}

/// Run checks forever, one pass per tick. Passes never overlap.
async fn run_daemon(monitor: &Monitor, interval_hours: u64) {
    let mut ticker = interval(check_interval(interval_hours));

    loop {
        // First tick completes immediately
        ticker.tick().await;
        run_pass(monitor).await;
    }
}

/// Time between passes, clamped to at least one hour
fn check_interval(interval_hours: u64) -> Duration {
    Duration::from_secs(interval_hours.max(1).saturating_mul(3600))
}

/// Run one pass, returning false if it had to abort
async fn run_pass(monitor: &Monitor) -> bool {
    match monitor.run_once().await {
        Ok(summary) => {
            log::info!(
                "Checked {} shop(s): {} with changes, {} failed",
                summary.reports.len(),
                summary.changed_count(),
                summary.failed_count()
            );
            true
        }
        Err(e) => {
            log::error!(
                "Monitoring pass aborted ({}): {}",
                monitor.store().path().display(),
                e
            );
            false
        }
    }
}
