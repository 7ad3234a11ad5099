use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel token value that switches the form to a free-text currency.
pub const OTHER_TOKEN: &str = "Other";

/// Source tag used when a submission does not say where it came from.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// UAE local time is a fixed UTC+04:00 with no daylight saving.
const UAE_UTC_OFFSET_SECS: i32 = 4 * 3600;

// ============ Payout ============

/// Digital currencies offered by the lead form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptoToken {
    Usdc,
    Eth,
    Sol,
    Usdt,
    Btc,
    Bnb,
    Xrp,
    Trx,
    Ada,
    Matic,
}

impl CryptoToken {
    pub const ALL: [CryptoToken; 10] = [
        CryptoToken::Usdc,
        CryptoToken::Eth,
        CryptoToken::Sol,
        CryptoToken::Usdt,
        CryptoToken::Btc,
        CryptoToken::Bnb,
        CryptoToken::Xrp,
        CryptoToken::Trx,
        CryptoToken::Ada,
        CryptoToken::Matic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CryptoToken::Usdc => "USDC",
            CryptoToken::Eth => "ETH",
            CryptoToken::Sol => "SOL",
            CryptoToken::Usdt => "USDT",
            CryptoToken::Btc => "BTC",
            CryptoToken::Bnb => "BNB",
            CryptoToken::Xrp => "XRP",
            CryptoToken::Trx => "TRX",
            CryptoToken::Ada => "ADA",
            CryptoToken::Matic => "MATIC",
        }
    }

    /// Exact, case-sensitive match against the listed codes.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|token| token.as_str() == code)
    }
}

impl fmt::Display for CryptoToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency chosen for a crypto payout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Currency {
    Listed(CryptoToken),
    /// Free-text currency: the override typed after selecting "Other", or an
    /// unlisted code relayed as submitted.
    Other(String),
    /// Crypto was chosen but no usable currency came with it.
    Unspecified,
}

impl Currency {
    /// Resolves whatever a submission carries, never rejecting it.
    ///
    /// Listed codes map to `Listed`, "Other" takes the override, and any other
    /// non-blank code is kept as free text.
    pub fn from_submission(token: Option<&str>, other_token: Option<&str>) -> Self {
        let other_token = other_token.map(str::trim).filter(|t| !t.is_empty());
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(OTHER_TOKEN) => other_token
                .map(|t| Currency::Other(t.to_string()))
                .unwrap_or(Currency::Unspecified),
            Some(code) => CryptoToken::parse(code)
                .map(Currency::Listed)
                .unwrap_or_else(|| Currency::Other(code.to_string())),
            None => Currency::Unspecified,
        }
    }

    /// Resolves a `token` / `otherToken` pair under the form's stricter rules.
    ///
    /// Returns `None` when the token is neither listed nor the "Other" sentinel,
    /// or when "Other" comes without a non-blank override.
    pub fn from_selection(token: &str, other_token: Option<&str>) -> Option<Self> {
        if token == OTHER_TOKEN {
            return other_token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| Currency::Other(t.to_string()));
        }
        CryptoToken::parse(token).map(Currency::Listed)
    }

    pub fn code(&self) -> &str {
        match self {
            Currency::Listed(token) => token.as_str(),
            Currency::Other(custom) => custom,
            Currency::Unspecified => "not specified",
        }
    }
}

/// Settlement method chosen by the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payout {
    Cash,
    Crypto { currency: Currency },
}

impl Payout {
    /// Wire name of the payout kind (`cash` / `crypto`).
    pub fn kind(&self) -> &'static str {
        match self {
            Payout::Cash => "cash",
            Payout::Crypto { .. } => "crypto",
        }
    }
}

// ============ Leads ============

/// Validated submission before it is stamped with a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSubmission {
    pub name: String,
    pub city: String,
    pub phone: String,
    pub email: String,
    pub payout: Payout,
    pub source: String,
    /// Short reference shown to the customer on the thank-you page.
    pub client_ref: Option<String>,
}

/// A lead as it is relayed to the messaging bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRecord {
    pub name: String,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub payout: Payout,
    pub source: String,
    pub timestamp: String,
}

impl LeadRecord {
    pub fn new(submission: LeadSubmission, submitted_at: DateTime<Utc>) -> Self {
        Self {
            name: submission.name,
            location: submission.city,
            phone: submission.phone,
            email: submission.email,
            payout: submission.payout,
            source: submission.source,
            timestamp: format_uae_timestamp(submitted_at),
        }
    }
}

/// Renders an instant in UAE local time, e.g.
/// `October 18, 2026 at 02:03:04 PM GST (UTC+04:00)`.
pub fn format_uae_timestamp(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(UAE_UTC_OFFSET_SECS) {
        Some(uae) => at
            .with_timezone(&uae)
            .format("%B %-d, %Y at %I:%M:%S %p GST (UTC%:z)")
            .to_string(),
        None => at.format("%B %-d, %Y at %I:%M:%S %p UTC").to_string(),
    }
}

// ============ Delivery ============

/// Outcome of one call to the messaging bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryResult {
    pub fn delivered() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Envelope returned by every Bot API method.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramApiResponse {
    #[serde(default)]
    pub ok: bool,
    pub error_code: Option<i64>,
    pub description: Option<String>,
}

// ============ HTTP responses ============

/// Body of `POST /api/submit-valuation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_error: Option<String>,
}

impl ValuationResponse {
    /// The lead was received; delivery outcome is reported alongside.
    pub fn accepted(delivery: DeliveryResult) -> Self {
        Self {
            success: true,
            error: None,
            telegram_sent: Some(delivery.success),
            telegram_error: delivery.error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramHealth {
    pub configured: bool,
    pub test_mode: bool,
    pub connection_test: DeliveryResult,
}

/// Body of `GET /api/submit-valuation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<TelegramHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
