//! # Card Details
//!
//! Card fields submitted with a card payment, plus the pure helpers that
//! derive the stored last4/brand. The gateway is simulated, so nothing here
//! attempts a real Luhn check or expiry parse; the payment record only
//! needs a display-friendly summary of the instrument.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ValidationError, ValidationResult};

/// Card fields as submitted by the checkout form.
///
/// Field names follow the wire format of the storefront client
/// (`cardNumber`, `expiry`, `cvc`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CardDetails {
    #[serde(rename = "cardNumber")]
    pub card_number: String,
    pub expiry: String,
    pub cvc: String,
}

impl CardDetails {
    /// Validates that all card fields are present and plausibly shaped.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.card_number.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "cardNumber",
            });
        }
        if self.expiry.trim().is_empty() {
            return Err(ValidationError::Required { field: "expiry" });
        }
        if self.cvc.trim().is_empty() {
            return Err(ValidationError::Required { field: "cvc" });
        }

        if digits(&self.card_number).len() < 12 {
            return Err(ValidationError::InvalidFormat {
                field: "cardNumber",
                reason: "must contain at least 12 digits",
            });
        }

        Ok(())
    }

    /// Last four digits of the card number, for the payment record.
    pub fn last4(&self) -> String {
        let d = digits(&self.card_number);
        d.chars().skip(d.len().saturating_sub(4)).collect()
    }

    /// Card brand derived from the leading digit.
    ///
    /// Good enough for a simulated gateway; a real integration would take
    /// the brand from the gateway response instead.
    pub fn brand(&self) -> &'static str {
        match digits(&self.card_number).chars().next() {
            Some('4') => "visa",
            Some('5') => "mastercard",
            Some('3') => "amex",
            Some('6') => "discover",
            _ => "card",
        }
    }
}

fn digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(number: &str) -> CardDetails {
        CardDetails {
            card_number: number.to_string(),
            expiry: "12/30".to_string(),
            cvc: "123".to_string(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(card("4242 4242 4242 4242").validate().is_ok());
    }

    #[test]
    fn test_validate_missing_fields() {
        let mut c = card("4242424242424242");
        c.cvc = String::new();
        assert!(c.validate().is_err());

        assert!(card("").validate().is_err());
        assert!(card("4242").validate().is_err());
    }

    #[test]
    fn test_last4_ignores_separators() {
        assert_eq!(card("4242-4242-4242-4242").last4(), "4242");
        assert_eq!(card("5555 5555 5555 4444").last4(), "4444");
    }

    #[test]
    fn test_brand_from_leading_digit() {
        assert_eq!(card("4242424242424242").brand(), "visa");
        assert_eq!(card("5555555555554444").brand(), "mastercard");
        assert_eq!(card("378282246310005").brand(), "amex");
        assert_eq!(card("9999999999999999").brand(), "card");
    }

    #[test]
    fn test_wire_field_names() {
        let json = r#"{"cardNumber":"4242424242424242","expiry":"12/30","cvc":"123"}"#;
        let c: CardDetails = serde_json::from_str(json).unwrap();
        assert_eq!(c.last4(), "4242");
    }
}
