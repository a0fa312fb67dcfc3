use std::env;
use std::fmt::Display;

use tracing_subscriber::EnvFilter;

use crate::error::CycleError;

pub fn init_logging() {
    let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let level = level.to_lowercase();

    let filter = match env::var("RUST_LOG") {
        Ok(rust_log) => EnvFilter::new(rust_log),
        Err(_) => EnvFilter::new(level),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();
}

// Poll loop observation points. Keep the loop itself free of log calls.

pub fn cycle_started(from_date: i64) {
    tracing::debug!(from_date, "Polling homework statuses");
}

pub fn cycle_succeeded(from_date: i64, next_from_date: i64, notified: usize) {
    tracing::info!(from_date, next_from_date, notified, "Poll cycle succeeded");
}

pub fn cursor_not_reported(from_date: i64) {
    tracing::warn!(from_date, "Response has no usable current_date, cursor kept");
}

pub fn cycle_failed(error: &CycleError, user_notified: bool) {
    tracing::error!(
        error = %error,
        kind = ?error.kind(),
        user_notified,
        "Poll cycle failed"
    );
}

pub fn notification_sent() {
    tracing::debug!("Chat message sent");
}

pub fn notification_failed(error: &impl Display) {
    tracing::error!(error = %error, "Failed to send chat message");
}
