use crate::errors::{AppError, ResultExt};
use crate::handlers::AppState;
use crate::models::{
    Currency, DeliveryResult, LeadRecord, LeadSubmission, Payout, ValuationResponse,
    UNKNOWN_SOURCE,
};
use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

/// POST /api/submit-valuation
///
/// Flow:
/// 1. Parse the JSON body (unparseable bodies are unexpected failures, 500).
/// 2. Check `name`, `city`, `phone`, `email` and `payout.type` are present (400).
/// 3. Stamp the lead with the current UAE time.
/// 4. Relay it to Telegram.
///
/// Once the input is valid the lead counts as received: delivery problems are
/// reported through `telegramSent` / `telegramError` with a 200.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `body` - Raw request body.
///
/// # Returns
///
/// * `Result<Json<ValuationResponse>, AppError>` - The submission result or an error.
pub async fn submit_valuation(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ValuationResponse>, AppError> {
    let submission_id = Uuid::new_v4();
    tracing::info!("📨 Received valuation submission {}", submission_id);

    let payload: Value =
        serde_json::from_slice(&body).context("Failed to parse valuation submission body")?;
    let submission = parse_submission(&payload)?;

    let client_ref = submission.client_ref.clone();
    let lead = LeadRecord::new(submission, Utc::now());

    let delivery = match state.telegram.as_ref() {
        Some(client) => client.send_lead(&lead).await,
        None => DeliveryResult::failed("Telegram client is not initialized"),
    };

    tracing::info!(
        submission_id = %submission_id,
        client_ref = client_ref.as_deref().unwrap_or("-"),
        name = %lead.name,
        city = %lead.location,
        email = %mask_email(&lead.email),
        payout_type = lead.payout.kind(),
        telegram_sent = delivery.success,
        "Valuation submission processed"
    );

    Ok(Json(ValuationResponse::accepted(delivery)))
}

/// Turns an untyped submission body into a `LeadSubmission`.
///
/// Only presence is checked; shape is the form's job. Non-string or blank
/// values count as absent. Any payout type other than `crypto` is relayed as
/// cash, and a crypto token outside the listed set is carried as free text.
pub fn parse_submission(payload: &Value) -> Result<LeadSubmission, AppError> {
    let name = non_blank_str(payload, "name");
    let city = non_blank_str(payload, "city");
    let phone = non_blank_str(payload, "phone");
    let email = non_blank_str(payload, "email");
    let payout = payload.get("payout");
    let payout_type = payout.and_then(|p| non_blank_str(p, "type"));

    let (Some(name), Some(city), Some(phone), Some(email), Some(payout_type), Some(payout)) =
        (name, city, phone, email, payout_type, payout)
    else {
        return Err(AppError::BadRequest(MISSING_REQUIRED_FIELDS.to_string()));
    };

    let payout = match payout_type {
        "crypto" => Payout::Crypto {
            currency: Currency::from_submission(
                non_blank_str(payout, "token"),
                non_blank_str(payout, "otherToken"),
            ),
        },
        _ => Payout::Cash,
    };

    Ok(LeadSubmission {
        name: name.to_string(),
        city: city.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        payout,
        source: non_blank_str(payload, "source")
            .unwrap_or(UNKNOWN_SOURCE)
            .to_string(),
        client_ref: non_blank_str(payload, "clientRef").map(str::to_string),
    })
}

fn non_blank_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Keeps the first two characters and the domain: `jane@x.com` -> `ja***@x.com`.
pub fn mask_email(email: &str) -> String {
    static MASK_REGEX: OnceLock<Regex> = OnceLock::new();
    MASK_REGEX
        .get_or_init(|| Regex::new(r"(.{2}).*(@.*)").expect("mask regex is valid"))
        .replace(email, "$1***$2")
        .into_owned()
}
