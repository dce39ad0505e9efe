//! Type-safe price representation in minor currency units.
//!
//! Prices are stored as whole cents so that cart arithmetic never touches
//! floating point. Conversion to a decimal amount only happens for display,
//! via `rust_decimal`.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A price in the smallest currency unit (e.g., cents for USD).
///
/// Serializes as a bare integer, matching the catalog and snapshot formats.
///
/// ```
/// use mini_catalog_core::Price;
///
/// let unit = Price::from_cents(1000);
/// assert_eq!(unit.times(2), Price::from_cents(2000));
/// assert_eq!(unit.times(2).display(), "$20.00");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero in any currency.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount in cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Price of `quantity` units. Saturates instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Format for display in US dollars (e.g., "$1,000.00").
    #[must_use]
    pub fn display(self) -> String {
        self.display_in(CurrencyCode::USD)
    }

    /// Format for display with the symbol of `currency`.
    ///
    /// Always renders exactly two fractional digits and groups the whole
    /// part in thousands with commas.
    #[must_use]
    pub fn display_in(self, currency: CurrencyCode) -> String {
        let fixed = format!("{:.2}", self.as_decimal().abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let sign = if self.0 < 0 { "-" } else { "" };

        format!(
            "{sign}{}{}.{fraction}",
            currency.symbol(),
            group_thousands(whole)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<i64> for Price {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

/// Format an amount in cents as US dollars.
///
/// Negative amounts are outside the cart's contract but still render with a
/// leading minus sign.
///
/// ```
/// use mini_catalog_core::format_price;
///
/// assert_eq!(format_price(100_000), "$1,000.00");
/// assert_eq!(format_price(1), "$0.01");
/// assert_eq!(format_price(0), "$0.00");
/// ```
#[must_use]
pub fn format_price(cents: i64) -> String {
    Price::from_cents(cents).display()
}

/// Insert a comma between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Error returned when parsing an unsupported currency code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported currency code: {0}")]
pub struct CurrencyCodeError(String);

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(CurrencyCodeError(s.to_string())),
        }
    }
}
