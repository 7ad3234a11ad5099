/// Property-based tests using proptest
/// Tests invariants of message rendering and form validation for all inputs
use proptest::prelude::*;
use valuation_lead_relay::core::lead_form::{is_valid_email, is_valid_phone};
use valuation_lead_relay::core::message_format::{
    escape_markdown, format_lead_message, single_line, MARKDOWN_RESERVED,
};
use valuation_lead_relay::core::models::{Currency, LeadRecord, Payout};

/// Drops the backslash in front of every escaped character.
fn unescape(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn lead(name: String, location: String, payout: Payout) -> LeadRecord {
    LeadRecord {
        name,
        location,
        phone: "+971501234567".to_string(),
        email: "jane@x.com".to_string(),
        payout,
        source: "proptest".to_string(),
        timestamp: "October 18, 2026 at 02:03:04 PM GST (UTC+04:00)".to_string(),
    }
}

// Property: escaping is total and reversible
proptest! {
    #[test]
    fn escape_never_leaves_reserved_char_unprefixed(text in "\\PC*") {
        let escaped = escape_markdown(&text);
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                // Every backslash introduces exactly one reserved character
                let next = chars.next();
                prop_assert!(next.map_or(false, |n| MARKDOWN_RESERVED.contains(&n)));
            } else {
                prop_assert!(!MARKDOWN_RESERVED.contains(&c));
            }
        }
    }

    #[test]
    fn escape_preserves_content(text in "\\PC*") {
        prop_assert_eq!(unescape(&escape_markdown(&text)), text);
    }

    #[test]
    fn escape_of_plain_text_is_identity(text in "[a-zA-Z0-9 ,:@]*") {
        prop_assert_eq!(escape_markdown(&text), text);
    }
}

// Property: message structure is independent of field contents
proptest! {
    #[test]
    fn message_keeps_labels_and_line_count(
        name in "(\\PC|\\n|\\r)*",
        location in "(\\PC|\\n|\\r)*",
        custom in "(\\PC|\\n|\\r)*",
    ) {
        let payout = Payout::Crypto { currency: Currency::Other(custom) };
        let message = format_lead_message(&lead(name.clone(), location, payout));
        let lines: Vec<&str> = message.lines().collect();
        prop_assert_eq!(lines.len(), 13);
        prop_assert_eq!(lines[0], "🚗 *New Car Valuation Lead*");
        prop_assert_eq!(
            lines[2].to_string(),
            format!("👤 *Name:* {}", escape_markdown(&single_line(&name)))
        );
        prop_assert!(lines[3].starts_with("📍 *Location:* "));
        prop_assert!(lines[6].starts_with("💰 Crypto \\("));
        prop_assert!(lines[8].starts_with("🔗 *Source:* "));
        prop_assert_eq!(lines[12], "*Auto\\-generated from car valuation form*");
    }

    #[test]
    fn message_is_deterministic(name in "\\PC*", location in "\\PC*") {
        let record = lead(name, location, Payout::Cash);
        prop_assert_eq!(format_lead_message(&record), format_lead_message(&record.clone()));
    }

    #[test]
    fn other_currency_uses_override(custom in "[A-Za-z0-9.\\-]{1,12}") {
        let message = format_lead_message(&lead(
            "Jane".to_string(),
            "Dubai".to_string(),
            Payout::Crypto { currency: Currency::Other(custom.clone()) },
        ));
        let expected = format!("💰 Crypto \\({}\\)", escape_markdown(&custom));
        prop_assert!(message.contains(&expected));
    }
}

// Property: form validators never panic
proptest! {
    #[test]
    fn phone_validation_never_panics(phone in "\\PC*") {
        let _ = is_valid_phone(&phone);
    }

    #[test]
    fn email_validation_never_panics(email in "\\PC*") {
        let _ = is_valid_email(&email);
    }

    #[test]
    fn international_numbers_accepted(country in 1u16..=999u16, number in 1000000u64..=9999999999u64) {
        let phone = format!("+{}{}", country, number);
        prop_assert!(is_valid_phone(&phone));
    }

    #[test]
    fn simple_emails_accepted(
        local in "[a-z]{1,10}",
        domain in "[a-z]{1,10}",
        tld in "[a-z]{2,4}"
    ) {
        let email = format!("{}@{}.{}", local, domain, tld);
        prop_assert!(is_valid_email(&email));
    }
}
