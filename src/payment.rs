//! Payment simulation.
//!
//! Deterministic authorization against a fixed table of test cards. No I/O;
//! the only per-call variation is the freshly generated transaction id.

use std::fmt;

use uuid::Uuid;

use crate::checkout::forms::{infer_brand, CardBrand};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclineReason {
    InsufficientFunds,
    NotRecognized,
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeclineReason::InsufficientFunds => "insufficient funds",
            DeclineReason::NotRecognized => "card not recognized for simulation",
        };
        write!(f, "{text}")
    }
}

/// Outcome of a simulated authorization. `transaction_id` is present iff
/// the payment was approved.
#[derive(Clone, Debug)]
pub struct Authorization {
    pub approved: bool,
    pub message: String,
    pub card_brand: Option<CardBrand>,
    pub transaction_id: Option<String>,
    pub decline_reason: Option<DeclineReason>,
}

fn lookup(digits: &str) -> Option<(CardBrand, bool)> {
    match digits {
        "4111111111111111" => Some((CardBrand::Visa, true)),
        "5555555555554444" => Some((CardBrand::Mastercard, true)),
        "3782822463100050" => Some((CardBrand::Amex, true)),
        "4000000000000002" => Some((CardBrand::Visa, false)),
        "5555555555554445" => Some((CardBrand::Mastercard, false)),
        _ => None,
    }
}

fn new_transaction_id() -> String {
    format!("TXN-{}", Uuid::new_v4().simple())
}

/// Authorizes a card number. Separators are stripped; the brand is inferred
/// from the leading digit for display whether or not the table knows the
/// card.
pub fn authorize(card_number: &str) -> Authorization {
    let digits: String = card_number.chars().filter(|c| c.is_ascii_digit()).collect();
    let brand = infer_brand(&digits);
    match lookup(&digits) {
        Some((_, true)) => {
            let brand_name = brand.map_or_else(|| "unknown".to_string(), |b| b.to_string());
            Authorization {
                approved: true,
                message: format!("Payment approved with {brand_name} card"),
                card_brand: brand,
                transaction_id: Some(new_transaction_id()),
                decline_reason: None,
            }
        }
        Some((_, false)) => Authorization {
            approved: false,
            message: "Payment declined, insufficient funds".to_string(),
            card_brand: brand,
            transaction_id: None,
            decline_reason: Some(DeclineReason::InsufficientFunds),
        },
        None => Authorization {
            approved: false,
            message: "Card not recognized for simulation".to_string(),
            card_brand: brand,
            transaction_id: None,
            decline_reason: Some(DeclineReason::NotRecognized),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_approved_cards() {
        for (number, brand) in [
            ("4111111111111111", CardBrand::Visa),
            ("5555555555554444", CardBrand::Mastercard),
            ("3782822463100050", CardBrand::Amex),
        ] {
            let auth = authorize(number);
            assert!(auth.approved, "{number} should approve");
            assert_eq!(auth.card_brand, Some(brand));
            assert!(auth.transaction_id.is_some());
            assert!(auth.decline_reason.is_none());
        }
    }

    #[test]
    fn test_declined_cards_keep_brand() {
        let auth = authorize("4000000000000002");
        assert!(!auth.approved);
        assert_eq!(auth.card_brand, Some(CardBrand::Visa));
        assert_eq!(auth.decline_reason, Some(DeclineReason::InsufficientFunds));
        assert!(auth.transaction_id.is_none());

        let auth = authorize("5555555555554445");
        assert!(!auth.approved);
        assert_eq!(auth.card_brand, Some(CardBrand::Mastercard));
    }

    #[test]
    fn test_unknown_card_is_not_recognized() {
        let auth = authorize("9999999999999999");
        assert!(!auth.approved);
        assert_eq!(auth.decline_reason, Some(DeclineReason::NotRecognized));
        assert_eq!(auth.card_brand, None);
    }

    #[test]
    fn test_separators_are_stripped() {
        let auth = authorize("4111 1111 1111 1111");
        assert!(auth.approved);
    }

    #[test]
    fn test_transaction_ids_are_unique() {
        let ids: HashSet<String> = (0..50)
            .filter_map(|_| authorize("4111111111111111").transaction_id)
            .collect();
        assert_eq!(ids.len(), 50);
    }
}
