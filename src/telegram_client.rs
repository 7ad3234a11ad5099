use crate::config::Config;
use crate::errors::{AppError, NotificationError};
use crate::message_format::format_lead_message;
use crate::models::{DeliveryResult, LeadRecord, TelegramApiResponse};
use serde_json::json;
use std::time::Duration;

/// Markup dialect the lead messages are escaped for.
pub const PARSE_MODE: &str = "MarkdownV2";

/// Client for relaying leads to a Telegram chat through the Bot API.
///
/// Holds the immutable configuration captured at construction. Every call makes
/// at most one request and never retries.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
    test_mode: bool,
}

impl TelegramClient {
    /// Creates a new `TelegramClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration holding the bot credential,
    ///   destination chat, test-mode flag, API base URL and timeout.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.telegram_timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create Telegram client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.telegram_api_base_url.clone(),
            bot_token: config.telegram_bot_token.clone(),
            chat_id: config.telegram_chat_id.clone(),
            test_mode: config.telegram_test_mode,
        })
    }

    /// True when both the bot credential and destination chat are present.
    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    /// Sends a lead notification to the configured chat.
    ///
    /// In test mode the rendered message is only logged. Failures are logged and
    /// returned in the `DeliveryResult`, never raised.
    pub async fn send_lead(&self, lead: &LeadRecord) -> DeliveryResult {
        match self.try_send_lead(lead).await {
            Ok(()) => DeliveryResult::delivered(),
            Err(e) => {
                tracing::error!("❌ Failed to send Telegram notification: {}", e);
                DeliveryResult::failed(e.to_string())
            }
        }
    }

    /// Checks the bot credential against the `getMe` method.
    ///
    /// Always performs a real request, test mode or not.
    pub async fn test_connection(&self) -> DeliveryResult {
        match self.try_get_me().await {
            Ok(()) => {
                tracing::info!("✓ Telegram connection test succeeded");
                DeliveryResult::delivered()
            }
            Err(e) => {
                tracing::error!("❌ Telegram connection test failed: {}", e);
                DeliveryResult::failed(e.to_string())
            }
        }
    }

    async fn try_send_lead(&self, lead: &LeadRecord) -> Result<(), NotificationError> {
        let (token, chat_id) = self.credentials()?;
        let message = format_lead_message(lead);

        if self.test_mode {
            tracing::info!("🧪 TEST MODE - Telegram message would be sent:\n{}", message);
            return Ok(());
        }

        tracing::info!("Sending lead notification to Telegram chat {}", chat_id);

        let body = json!({
            "chat_id": chat_id,
            "text": message,
            "parse_mode": PARSE_MODE,
            "disable_web_page_preview": true,
        });

        let response = self
            .client
            .post(self.method_url(token, "sendMessage"))
            .json(&body)
            .send()
            .await?;

        read_api_response(response).await?;

        tracing::info!("✓ Lead notification delivered to Telegram");
        Ok(())
    }

    async fn try_get_me(&self) -> Result<(), NotificationError> {
        let (token, _) = self.credentials()?;

        let response = self
            .client
            .get(self.method_url(token, "getMe"))
            .send()
            .await?;

        read_api_response(response).await
    }

    fn credentials(&self) -> Result<(&str, &str), NotificationError> {
        match (self.bot_token.as_deref(), self.chat_id.as_deref()) {
            (Some(token), Some(chat_id)) => Ok((token, chat_id)),
            _ => Err(NotificationError::Configuration),
        }
    }

    // The token is part of the path; never log this URL.
    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, token, method)
    }
}

/// Interprets a Bot API answer.
///
/// The HTTP status is not consulted: the API reports failures through the `ok`
/// flag and `description` of the JSON envelope, for 4xx answers as well.
async fn read_api_response(response: reqwest::Response) -> Result<(), NotificationError> {
    let status = response.status();
    let result: TelegramApiResponse = response.json().await.map_err(|e| {
        NotificationError::Transport(format!(
            "Failed to parse Telegram response ({}): {}",
            status,
            e.without_url()
        ))
    })?;

    if !result.ok {
        let description = result
            .description
            .unwrap_or_else(|| "Unknown error".to_string());
        tracing::warn!(
            "Telegram API returned ok=false (HTTP {}, error_code={:?})",
            status,
            result.error_code
        );
        return Err(NotificationError::RemoteService(description));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Payout;

    fn config(token: Option<&str>, chat_id: Option<&str>, test_mode: bool) -> Config {
        Config {
            port: 3000,
            telegram_bot_token: token.map(str::to_string),
            telegram_chat_id: chat_id.map(str::to_string),
            telegram_test_mode: test_mode,
            // Nothing listens here; tests below must not reach the network.
            telegram_api_base_url: "http://127.0.0.1:9".to_string(),
            telegram_timeout_secs: 1,
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
            max_body_bytes: 65536,
        }
    }

    fn lead() -> LeadRecord {
        LeadRecord {
            name: "John Doe".to_string(),
            location: "Dubai".to_string(),
            phone: "+971501234567".to_string(),
            email: "john.doe@example.com".to_string(),
            payout: Payout::Cash,
            source: "unit".to_string(),
            timestamp: "now".to_string(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = TelegramClient::new(&config(Some("t"), Some("c"), false)).unwrap();
        assert!(client.is_configured());
        assert!(!client.is_test_mode());
        assert_eq!(
            client.method_url("123:abc", "getMe"),
            "http://127.0.0.1:9/bot123:abc/getMe"
        );
    }

    #[tokio::test]
    async fn test_missing_chat_id_fails_without_io() {
        let client = TelegramClient::new(&config(Some("t"), None, false)).unwrap();
        let result = client.send_lead(&lead()).await;
        assert!(!result.success);
        assert_eq!(result.error, Some(NotificationError::Configuration.to_string()));
    }

    #[tokio::test]
    async fn test_configuration_checked_before_test_mode() {
        let client = TelegramClient::new(&config(None, Some("c"), true)).unwrap();
        let result = client.send_lead(&lead()).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_test_mode_succeeds_offline() {
        let client = TelegramClient::new(&config(Some("t"), Some("c"), true)).unwrap();
        assert_eq!(client.send_lead(&lead()).await, DeliveryResult::delivered());
    }
}
