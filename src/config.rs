use serde::Deserialize;

/// Default Telegram Bot API endpoint.
pub const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub telegram_bot_token: Option<String>, // Absent disables real delivery
    pub telegram_chat_id: Option<String>,
    pub telegram_test_mode: bool,
    pub telegram_api_base_url: String,
    pub telegram_timeout_secs: u64,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as absent. Missing bot credentials are not an
    /// error here: the notification client reports them per delivery attempt.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            port: get("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            telegram_test_mode: get("TELEGRAM_TEST_MODE")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            telegram_api_base_url: get("TELEGRAM_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE_URL.to_string())
                .trim()
                .trim_end_matches('/')
                .to_string(),
            telegram_timeout_secs: parse_or(get("TELEGRAM_TIMEOUT_SECS"), 30, "TELEGRAM_TIMEOUT_SECS")?,
            rate_limit_per_second: parse_or(get("RATE_LIMIT_PER_SECOND"), 10, "RATE_LIMIT_PER_SECOND")?,
            rate_limit_burst: parse_or(get("RATE_LIMIT_BURST"), 20, "RATE_LIMIT_BURST")?,
            max_body_bytes: parse_or(get("MAX_BODY_BYTES"), 64 * 1024, "MAX_BODY_BYTES")?,
        };

        let base_url = url::Url::parse(&config.telegram_api_base_url)
            .map_err(|e| anyhow::anyhow!("TELEGRAM_API_BASE_URL is not a valid URL: {}", e))?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            anyhow::bail!("TELEGRAM_API_BASE_URL must start with http:// or https://");
        }
        if config.telegram_timeout_secs == 0 {
            anyhow::bail!("TELEGRAM_TIMEOUT_SECS must be greater than zero");
        }
        if config.rate_limit_per_second == 0 || config.rate_limit_burst == 0 {
            anyhow::bail!("RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST must be greater than zero");
        }

        // Never log the bot token itself
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Telegram API base URL: {}", config.telegram_api_base_url);
        tracing::debug!("Server Port: {}", config.port);
        if !config.telegram_configured() {
            tracing::warn!(
                "TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set, lead notifications will fail"
            );
        }
        if config.telegram_test_mode {
            tracing::info!("🧪 Telegram test mode enabled, messages will only be logged");
        }

        Ok(config)
    }

    /// True when both the bot credential and the destination chat are present.
    pub fn telegram_configured(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    default: T,
    name: &str,
) -> anyhow::Result<T> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid positive number", name)),
        None => Ok(default),
    }
}
