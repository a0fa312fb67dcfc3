mod config;
mod error;
mod logger;
mod models;
mod poller;
mod practicum;
mod status;
mod telegram;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::config::Config;
use crate::poller::Poller;
use crate::practicum::PracticumClient;
use crate::telegram::TelegramSender;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init_logging();

    let config = Config::from_env().context("Configuration check failed, bot not started")?;

    tracing::info!(
        endpoint = %config.endpoint,
        retry_period_secs = config.retry_period.as_secs(),
        http_timeout_secs = config.http_timeout.as_secs(),
        suppression = ?config.suppression,
        "Starting homework status bot"
    );

    let source = PracticumClient::new(&config).context("Failed to build review API client")?;
    let sender = TelegramSender::new(&config).context("Failed to build Telegram client")?;

    let start = Utc::now().timestamp() - config.lookback_secs;
    let poller = Poller::new(source, sender, &config, start);
    tracing::info!(from_date = poller.cursor(), "Polling started");

    poller.run().await;
    Ok(())
}
