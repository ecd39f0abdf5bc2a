//! Value objects for the storefront

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Money value object. Amounts are decimal, tagged with a currency code.
/// The store operates in Colombian pesos, so `cop` is the usual constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self { amount, currency: currency.to_string() }
    }

    pub fn cop(amount: Decimal) -> Self {
        Self::new(amount, "COP")
    }

    pub fn zero(currency: &str) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch);
        }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }

    pub fn multiply(&self, qty: u32) -> Money {
        Money::new(self.amount * Decimal::from(qty), &self.currency)
    }

    /// Scales the amount by a decimal factor, e.g. a tax rate.
    pub fn scaled(&self, factor: Decimal) -> Money {
        Money::new(self.amount * factor, &self.currency)
    }

    /// Formats the amount in the es-CO convention: `$ 1.234,56`.
    pub fn format(&self) -> String {
        let text = format!("{:.2}", self.amount.round_dp(2));
        let (sign, text) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest.to_string()),
            None => ("", text),
        };
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (text, "00".to_string()),
        };
        let mut grouped = String::new();
        let len = int_part.len();
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        format!("{sign}$ {grouped},{frac_part}")
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero("COP")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[derive(Debug, Clone, Error)]
pub enum MoneyError {
    #[error("currency mismatch")]
    CurrencyMismatch,
}

/// Account role as reported by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
    Client,
}

impl Role {
    /// Staff roles may reach the management dashboards.
    pub fn can_manage(self) -> bool {
        matches!(self, Role::Admin | Role::Seller)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::Client => "client",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_add() {
        let a = Money::cop(Decimal::new(100, 0));
        let b = Money::cop(Decimal::new(50, 0));
        assert_eq!(a.add(&b).unwrap().amount(), Decimal::new(150, 0));
    }

    #[test]
    fn test_money_add_rejects_currency_mismatch() {
        let a = Money::cop(Decimal::ONE);
        let b = Money::new(Decimal::ONE, "USD");
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn test_money_scaled() {
        let subtotal = Money::cop(Decimal::from(100_000u32));
        let tax = subtotal.scaled(Decimal::new(19, 2));
        assert_eq!(tax.amount(), Decimal::from(19_000u32));
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(Money::cop(Decimal::from(119_000u32)).format(), "$ 119.000,00");
        assert_eq!(Money::cop(Decimal::new(123456789, 2)).format(), "$ 1.234.567,89");
        assert_eq!(Money::cop(Decimal::new(50, 0)).format(), "$ 50,00");
    }

    #[test]
    fn test_role_can_manage() {
        assert!(Role::Admin.can_manage());
        assert!(Role::Seller.can_manage());
        assert!(!Role::Client.can_manage());
    }
}
