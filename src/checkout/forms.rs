//! Shipping and payment forms with field-level validation.
//!
//! Validation returns structured per-field error maps so a form can render
//! errors next to the offending inputs; nothing here panics or throws.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Shipping details collected in the first checkout step. All fields except
/// `notes` are required. Serializes in the camelCase shape the backend
/// expects under `shipping_data`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    #[validate(custom = "not_blank")]
    pub full_name: String,
    #[validate(custom = "not_blank")]
    pub email: String,
    #[validate(custom = "not_blank")]
    pub phone: String,
    #[validate(custom = "not_blank")]
    pub address: String,
    #[validate(custom = "not_blank")]
    pub city: String,
    #[validate(custom = "not_blank")]
    pub zip_code: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Card details collected in the payment step. The card number may contain
/// separators; validation and authorization both work on the digits alone.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
pub struct PaymentInfo {
    #[validate(custom = "valid_card_number")]
    pub card_number: String,
    #[validate(custom = "valid_expiry")]
    pub expiry: String,
    #[validate(custom = "valid_cvv")]
    pub cvv: String,
    #[validate(custom = "not_blank")]
    pub card_holder_name: String,
}

impl PaymentInfo {
    pub fn digits(&self) -> String {
        self.card_number.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    pub fn brand(&self) -> Option<CardBrand> {
        infer_brand(&self.digits())
    }
}

/// Card brand shown next to the number input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardBrand::Visa => "VISA",
            CardBrand::Mastercard => "MASTERCARD",
            CardBrand::Amex => "AMEX",
        };
        write!(f, "{name}")
    }
}

/// Infers the brand from the leading digit, for display purposes only.
/// Works on any number, whether or not the simulator recognizes it.
pub fn infer_brand(digits: &str) -> Option<CardBrand> {
    match digits.chars().next() {
        Some('4') => Some(CardBrand::Visa),
        Some('5') => Some(CardBrand::Mastercard),
        Some('3') => Some(CardBrand::Amex),
        _ => None,
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("required", "this field is required"));
    }
    Ok(())
}

fn valid_card_number(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if (13..=19).contains(&digits) {
        Ok(())
    } else {
        Err(validation_error("card_number", "card number must be 13 to 19 digits"))
    }
}

fn valid_expiry(value: &str) -> Result<(), ValidationError> {
    let err = || validation_error("expiry", "expiry must be MM/YY and not in the past");
    let (month, year) = value.split_once('/').ok_or_else(err)?;
    let month: u32 = month.trim().parse().map_err(|_| err())?;
    let year: i32 = year.trim().parse().map_err(|_| err())?;
    if !(1..=12).contains(&month) || !(0..=99).contains(&year) {
        return Err(err());
    }
    let now = Utc::now();
    let current_year = now.year() % 100;
    if year < current_year || (year == current_year && month < now.month()) {
        return Err(err());
    }
    Ok(())
}

fn valid_cvv(value: &str) -> Result<(), ValidationError> {
    let all_digits = value.chars().all(|c| c.is_ascii_digit());
    if all_digits && (3..=4).contains(&value.len()) {
        Ok(())
    } else {
        Err(validation_error("cvv", "CVV must be 3 or 4 digits"))
    }
}
