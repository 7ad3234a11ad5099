//! Operator check for the Telegram integration.
//!
//! Runs a connection test against the configured bot, then relays a sample lead
//! through the same path the submission endpoint uses.

use chrono::Utc;
use valuation_lead_relay::config::Config;
use valuation_lead_relay::core::lead_form::LeadForm;
use valuation_lead_relay::core::models::LeadRecord;
use valuation_lead_relay::integrations::telegram_client::TelegramClient;

const SAMPLE_SOURCE: &str = "test_integration";

fn sample_form() -> LeadForm {
    LeadForm {
        name: "John Doe".to_string(),
        city: "Dubai".to_string(),
        other_city: None,
        phone: "+971501234567".to_string(),
        email: "john.doe@example.com".to_string(),
        payout_type: "crypto".to_string(),
        token: Some("USDC".to_string()),
        other_token: None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "valuation_lead_relay=info,test_telegram=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let client = TelegramClient::new(&config)?;

    tracing::info!("🧪 Testing Telegram integration...");

    tracing::info!("1. Testing Telegram connection...");
    let connection = client.test_connection().await;
    if !connection.success {
        anyhow::bail!(
            "Telegram connection failed: {}",
            connection.error.unwrap_or_default()
        );
    }
    tracing::info!("✅ Telegram connection successful");

    tracing::info!("2. Testing lead delivery...");
    let submission = sample_form().validate(SAMPLE_SOURCE).map_err(|errors| {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        anyhow::anyhow!("Sample lead is invalid: {}", messages.join(", "))
    })?;
    let lead = LeadRecord::new(submission, Utc::now());

    let delivery = client.send_lead(&lead).await;
    if !delivery.success {
        anyhow::bail!(
            "Lead delivery failed: {}",
            delivery.error.unwrap_or_default()
        );
    }
    tracing::info!("✅ Lead delivery successful");

    Ok(())
}
