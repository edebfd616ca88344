use anyhow::{Error, Result};
use async_trait::async_trait;
use core_logic::{NetworkError, Notifier, SilentNotifier};
use reqwest::Client;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram bot configuration
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl TelegramConfig {
    /// Reads `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    ///
    /// Returns `None` unless both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let bot_token = env::var("TELEGRAM_BOT_TOKEN").ok().filter(|v| !v.trim().is_empty())?;
        let chat_id = env::var("TELEGRAM_CHAT_ID").ok().filter(|v| !v.trim().is_empty())?;

        Some(Self {
            bot_token: bot_token.trim().to_string(),
            chat_id: chat_id.trim().to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

/// Telegram notification service
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Send a plain-text message to the configured chat.
    ///
    /// The text is escaped for Telegram's HTML parse mode.
    pub async fn send_message(&self, message: &str) -> Result<()> {
        let payload = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": escape_html(message),
            "parse_mode": "HTML",
        });

        let response = self
            .client
            .post(self.config.send_message_url())
            .json(&payload)
            .timeout(SEND_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::new(NetworkError::Timeout {
                        timeout_ms: SEND_TIMEOUT.as_millis() as u64,
                        endpoint: "telegram sendMessage".to_string(),
                    })
                } else {
                    Error::new(e).context("Failed to send Telegram request")
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            debug!("Telegram API error body: {}", text);
            return Err(Error::new(NetworkError::HttpError {
                status_code: status.as_u16(),
                endpoint: "telegram sendMessage".to_string(),
            }));
        }

        debug!("Telegram notification sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> bool {
        match self.send_message(message).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Telegram notification failed: {:#}", e);
                false
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Telegram when credentials are present, otherwise a silent notifier.
pub fn notifier_from_env() -> Arc<dyn Notifier> {
    match TelegramConfig::from_env() {
        Some(config) => Arc::new(TelegramNotifier::new(config)),
        None => {
            warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set, notifications disabled");
            Arc::new(SilentNotifier)
        }
    }
}
