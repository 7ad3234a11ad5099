//! Chat message rendering for relayed leads.
//!
//! Messages are sent with Telegram's MarkdownV2 parse mode, so every
//! user-supplied value and every literal reserved character is escaped.

use crate::models::{Currency, LeadRecord, Payout};

/// Characters with markup meaning in MarkdownV2.
pub const MARKDOWN_RESERVED: [char; 19] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '=', '|', '{', '}', '.', '!', '-',
    '\\',
];

/// Prefixes every reserved character with a backslash.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if MARKDOWN_RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Folds line breaks and other control characters to spaces so a field value
/// always stays on its own line.
pub fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// A user-supplied value ready to embed in the message.
fn field(text: &str) -> String {
    escape_markdown(&single_line(text))
}

/// Payout line of the message, e.g. `💵 Cash` or `💰 Crypto \(USDC\)`.
pub fn payout_line(payout: &Payout) -> String {
    match payout {
        Payout::Cash => "💵 Cash".to_string(),
        Payout::Crypto { currency } => {
            let code = match currency {
                Currency::Listed(token) => token.as_str().to_string(),
                Currency::Other(_) | Currency::Unspecified => field(currency.code()),
            };
            format!("💰 Crypto \\({}\\)", code)
        }
    }
}

/// Renders a lead as a MarkdownV2 chat message.
pub fn format_lead_message(lead: &LeadRecord) -> String {
    format!(
        "🚗 *New Car Valuation Lead*\n\
         \n\
         👤 *Name:* {name}\n\
         📍 *Location:* {location}\n\
         📞 *Phone:* {phone}\n\
         📧 *Email:* {email}\n\
         {payout}\n\
         \n\
         🔗 *Source:* {source}\n\
         ⏰ *Time:* {time}\n\
         \n\
         \\-\\-\\-\n\
         *Auto\\-generated from car valuation form*",
        name = field(&lead.name),
        location = field(&lead.location),
        phone = field(&lead.phone),
        email = field(&lead.email),
        payout = payout_line(&lead.payout),
        source = field(&lead.source),
        time = field(&lead.timestamp),
    )
}
