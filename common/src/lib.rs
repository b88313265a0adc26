use dotenvy::dotenv;
use reqwest::Client;
use std::env;

pub mod constants;
pub mod error;
pub mod executor;
pub mod metrics;

pub use error::{ExecutionError, NotificationError, UpdateError};
pub use executor::{CommandOutput, LocalExecutor};

use constants::{GOTIFY_DEFAULT_PRIORITY, GOTIFY_DEFAULT_URL};

pub fn dotenv_init() {
    let _ = dotenv();
}

pub fn http_client() -> Client {
    Client::new()
}

/// Where and how to deliver Gotify messages
#[derive(Debug, Clone, PartialEq)]
pub struct GotifyConfig {
    pub url: String,
    pub key: String,
    pub priority: u8,
}

impl GotifyConfig {
    /// Read Gotify settings from the environment.
    ///
    /// Returns `Ok(None)` when no key is configured. Prefers GOTIFY_KEY and
    /// falls back to GOTIFY_KEY_FILE.
    pub fn from_env() -> Result<Option<Self>, NotificationError> {
        let url = env::var(constants::env::GOTIFY_URL)
            .unwrap_or_else(|_| GOTIFY_DEFAULT_URL.to_string());

        let key = match env::var(constants::env::GOTIFY_KEY) {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => match env::var(constants::env::GOTIFY_KEY_FILE) {
                Ok(path) => std::fs::read_to_string(&path)
                    .map_err(|source| NotificationError::KeyFileReadError { path, source })?
                    .trim()
                    .to_string(),
                Err(_) => return Ok(None),
            },
        };

        if key.is_empty() {
            return Ok(None);
        }

        Ok(Some(GotifyConfig {
            url,
            key,
            priority: GOTIFY_DEFAULT_PRIORITY,
        }))
    }
}

/// Send a Gotify message
pub async fn send_gotify(
    client: &Client,
    config: &GotifyConfig,
    title: &str,
    body: &str,
) -> Result<(), NotificationError> {
    let result = client
        .post(&config.url)
        .header("X-Gotify-Key", &config.key)
        .json(&serde_json::json!({
            "title": title,
            "message": body,
            "priority": config.priority
        }))
        .send()
        .await
        .and_then(|resp| resp.error_for_status());

    metrics::record_notification_sent("gotify", result.is_ok());
    result?;

    Ok(())
}
