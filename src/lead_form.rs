//! Lead-capture form schema.
//!
//! Mirrors the rules the valuation form enforces before it posts a submission,
//! and produces the normalized submission the form would send.

use crate::models::{Currency, LeadSubmission, Payout, OTHER_TOKEN};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Cities offered by the form; "Other" asks for a typed city.
pub const EMIRATES: [&str; 8] = [
    "Dubai",
    "Abu Dhabi",
    "Sharjah",
    "Ajman",
    "Ras Al Khaimah",
    "Umm Al Quwain",
    "Fujairah",
    "Other",
];

const OTHER_CITY: &str = "Other";

/// Raw values of the valuation form.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadForm {
    pub name: String,
    pub city: String,
    #[serde(default)]
    pub other_city: Option<String>,
    pub phone: String,
    pub email: String,
    pub payout_type: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub other_token: Option<String>,
}

/// A single rule violation, keyed by form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl LeadForm {
    /// Validates every field and collects all violations.
    ///
    /// On success the city is normalized ("Other" becomes the typed city) and a
    /// fresh client reference is attached.
    pub fn validate(&self, source: &str) -> Result<LeadSubmission, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.chars().count() < 2 {
            errors.push(FieldError::new("name", "Please enter your full name"));
        }

        let other_city = non_blank(self.other_city.as_deref());
        if !EMIRATES.contains(&self.city.as_str()) {
            errors.push(FieldError::new("city", "Select your city"));
        } else if self.city == OTHER_CITY && other_city.is_none() {
            errors.push(FieldError::new("otherCity", "Type your city/emirate"));
        }

        let phone = self.phone.trim();
        if !is_valid_phone(phone) {
            errors.push(FieldError::new("phone", "Enter a valid phone number"));
        }

        let email = self.email.trim();
        if !is_valid_email(email) {
            errors.push(FieldError::new("email", "Enter a valid email"));
        }

        let payout = match self.payout_type.as_str() {
            "cash" => Some(Payout::Cash),
            "crypto" => self.crypto_payout(&mut errors),
            _ => {
                errors.push(FieldError::new("payoutType", "Choose payout method"));
                None
            }
        };

        match payout {
            Some(payout) if errors.is_empty() => {
                let city = match other_city {
                    Some(typed) if self.city == OTHER_CITY => typed.to_string(),
                    _ => self.city.clone(),
                };
                Ok(LeadSubmission {
                    name: name.to_string(),
                    city,
                    phone: phone.to_string(),
                    email: email.to_string(),
                    payout,
                    source: source.to_string(),
                    client_ref: Some(client_reference()),
                })
            }
            _ => Err(errors),
        }
    }

    fn crypto_payout(&self, errors: &mut Vec<FieldError>) -> Option<Payout> {
        let Some(token) = non_blank(self.token.as_deref()) else {
            errors.push(FieldError::new("token", "Select a digital currency"));
            return None;
        };

        match Currency::from_selection(token, self.other_token.as_deref()) {
            Some(currency) => Some(Payout::Crypto { currency }),
            None if token == OTHER_TOKEN => {
                errors.push(FieldError::new("otherToken", "Type your preferred currency"));
                None
            }
            None => {
                errors.push(FieldError::new("token", "Select a digital currency"));
                None
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Loose international phone check: optional `+`, a digit, then at least seven
/// digits, spaces, dashes or parentheses.
pub fn is_valid_phone(phone: &str) -> bool {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    PHONE_REGEX
        .get_or_init(|| Regex::new(r"^\+?\d[\d\s\-()]{7,}$").expect("phone regex is valid"))
        .is_match(phone)
}

/// Standard `local@domain.tld` email shape.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX
        .get_or_init(|| {
            Regex::new(
                r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
            )
            .expect("email regex is valid")
        })
        .is_match(email)
}

/// Six upper-case alphanumerics the customer can quote on the thank-you page.
pub fn client_reference() -> String {
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CryptoToken;

    fn form() -> LeadForm {
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

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_form() {
        let submission = form().validate("hero_form_compact").unwrap();
        assert_eq!(submission.city, "Dubai");
        assert_eq!(submission.source, "hero_form_compact");
        assert_eq!(
            submission.payout,
            Payout::Crypto {
                currency: Currency::Listed(CryptoToken::Usdc)
            }
        );
        let client_ref = submission.client_ref.unwrap();
        assert_eq!(client_ref.len(), 6);
        assert_eq!(client_ref, client_ref.to_uppercase());
    }

    #[test]
    fn test_other_city_is_normalized() {
        let mut values = form();
        values.city = "Other".to_string();
        values.other_city = Some("Al Ain".to_string());
        assert_eq!(values.validate("s").unwrap().city, "Al Ain");

        values.other_city = Some("   ".to_string());
        let errors = values.validate("s").unwrap_err();
        assert_eq!(errors, vec![FieldError::new("otherCity", "Type your city/emirate")]);
    }

    #[test]
    fn test_unknown_city_rejected() {
        let mut values = form();
        values.city = "Riyadh".to_string();
        assert_eq!(fields(&values.validate("s").unwrap_err()), vec!["city"]);
    }

    #[test]
    fn test_collects_all_errors() {
        let values = LeadForm {
            name: "J".to_string(),
            city: String::new(),
            phone: "12".to_string(),
            email: "nope".to_string(),
            payout_type: String::new(),
            ..LeadForm::default()
        };
        assert_eq!(
            fields(&values.validate("s").unwrap_err()),
            vec!["name", "city", "phone", "email", "payoutType"]
        );
    }

    #[test]
    fn test_crypto_requires_token() {
        let mut values = form();
        values.token = None;
        assert_eq!(
            values.validate("s").unwrap_err(),
            vec![FieldError::new("token", "Select a digital currency")]
        );

        values.token = Some("SHIB".to_string());
        assert_eq!(fields(&values.validate("s").unwrap_err()), vec!["token"]);
    }

    #[test]
    fn test_other_token_requires_override() {
        let mut values = form();
        values.token = Some("Other".to_string());
        assert_eq!(
            values.validate("s").unwrap_err(),
            vec![FieldError::new("otherToken", "Type your preferred currency")]
        );

        values.other_token = Some("DOGE".to_string());
        assert_eq!(
            values.validate("s").unwrap().payout,
            Payout::Crypto {
                currency: Currency::Other("DOGE".to_string())
            }
        );
    }

    #[test]
    fn test_cash_ignores_token_fields() {
        let mut values = form();
        values.payout_type = "cash".to_string();
        values.token = Some("Other".to_string());
        assert_eq!(values.validate("s").unwrap().payout, Payout::Cash);
    }

    #[test]
    fn test_phone_shapes() {
        assert!(is_valid_phone("+971501234567"));
        assert!(is_valid_phone("050 123 4567"));
        assert!(is_valid_phone("(050) 123-4567"));
        assert!(!is_valid_phone("1234567"));
        assert!(!is_valid_phone("+ 971501234567"));
        assert!(!is_valid_phone("phone: 0501234567"));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("jane@x.com"));
        assert!(is_valid_email("test.user+tag@subdomain.example.co.uk"));
        assert!(!is_valid_email("missing@domain"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("two@@example.com"));
    }

    #[test]
    fn test_form_deserializes_from_camel_case() {
        let values: LeadForm = serde_json::from_str(
            r#"{"name":"Jane","city":"Other","otherCity":"Al Ain","phone":"+971501234567",
                "email":"jane@x.com","payoutType":"cash"}"#,
        )
        .unwrap();
        assert_eq!(values.other_city.as_deref(), Some("Al Ain"));
        assert_eq!(values.payout_type, "cash");
    }
}
