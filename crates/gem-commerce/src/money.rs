//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. The backend speaks
//! decimal numbers (`49.99`); the [`decimal`] serde helpers convert at the
//! edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Shorthand for a USD amount in cents.
    pub fn usd(amount_cents: i64) -> Self {
        Self::new(amount_cents, Currency::USD)
    }

    /// Create a Money value from a decimal amount, rounding to the nearest
    /// minor unit.
    ///
    /// ```
    /// use gem_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(49.99, Currency::USD);
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_cents = (amount * multiplier as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        format!("{}{}{}", sign, self.currency.symbol(), self.abs_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        format!("{}{}", sign, self.abs_amount())
    }

    fn abs_amount(&self) -> String {
        let places = self.currency.decimal_places();
        let abs = self.amount_cents.unsigned_abs();
        if places == 0 {
            return abs.to_string();
        }
        let divisor = 10_u64.pow(places);
        format!(
            "{}.{:0width$}",
            abs / divisor,
            abs % divisor,
            width = places as usize
        )
    }

    /// Add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Subtract another Money value, returning None on currency mismatch or overflow.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_sub(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// `percent`% of this amount, rounded half-up to the minor unit.
    ///
    /// ```
    /// use gem_commerce::money::Money;
    /// assert_eq!(Money::usd(10_000).percentage(10), Money::usd(1_000));
    /// assert_eq!(Money::usd(1_005).percentage(10), Money::usd(101));
    /// ```
    pub fn percentage(&self, percent: u32) -> Money {
        let scaled = i128::from(self.amount_cents) * i128::from(percent);
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        // |rounded| <= |amount| * percent / 100, so this only saturates for
        // percentages above 100 on amounts near i64::MAX.
        let cents = i64::try_from(rounded).unwrap_or(if rounded >= 0 { i64::MAX } else { i64::MIN });
        Money::new(cents, self.currency)
    }

    /// Sum Money values, returning None on currency mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Serde helpers mapping [`Money`] to a bare decimal number on the wire.
///
/// Wire amounts carry no currency; they are read as USD, the storefront's
/// only currency.
pub mod decimal {
    use super::{Currency, Money};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(D::Error::custom("amount must be a finite number"));
        }
        Ok(Money::from_decimal(value, Currency::USD))
    }

    /// Same mapping for `Option<Money>`; `null` and missing map to `None`.
    pub mod option {
        use super::super::{Currency, Money};
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => serializer.serialize_some(&m.to_decimal()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            match Option::<f64>::deserialize(deserializer)? {
                Some(value) if !value.is_finite() => {
                    Err(D::Error::custom("amount must be a finite number"))
                }
                Some(value) => Ok(Some(Money::from_decimal(value, Currency::USD))),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(49.99, Currency::USD).amount_cents, 4999);
        assert_eq!(Money::from_decimal(100.0, Currency::JPY).amount_cents, 100);
        // 0.1 + 0.2 style noise rounds away.
        assert_eq!(Money::from_decimal(0.1 + 0.2, Currency::USD).amount_cents, 30);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::usd(4999).display(), "$49.99");
        assert_eq!(Money::usd(5).display(), "$0.05");
        assert_eq!(Money::usd(-999).display(), "-$9.99");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
        assert_eq!(Money::usd(11999).display_amount(), "119.99");
    }

    #[test]
    fn test_try_add_and_subtract() {
        let a = Money::usd(1000);
        let b = Money::usd(300);
        assert_eq!(a.try_add(&b), Some(Money::usd(1300)));
        assert_eq!(a.try_subtract(&b), Some(Money::usd(700)));
    }

    #[test]
    fn test_currency_mismatch_is_none() {
        let usd = Money::usd(1000);
        let eur = Money::new(1000, Currency::EUR);
        assert_eq!(usd.try_add(&eur), None);
        assert_eq!(usd.try_subtract(&eur), None);
        assert_eq!(Money::try_sum([usd, eur].iter(), Currency::USD), None);
    }

    #[test]
    fn test_overflow_is_none() {
        let big = Money::usd(i64::MAX);
        assert_eq!(big.try_add(&Money::usd(1)), None);
        assert_eq!(big.try_multiply(2), None);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(Money::usd(10_000).percentage(10).amount_cents, 1_000);
        assert_eq!(Money::usd(20_000).percentage(20).amount_cents, 4_000);
        assert_eq!(Money::usd(1_005).percentage(10).amount_cents, 101); // 100.5 -> 101
        assert_eq!(Money::usd(1_004).percentage(10).amount_cents, 100); // 100.4 -> 100
        assert_eq!(Money::usd(0).percentage(10).amount_cents, 0);
    }

    #[test]
    fn test_ordering_by_amount() {
        assert!(Money::usd(10_000) < Money::usd(10_001));
        let prices = [Money::usd(4_999), Money::usd(12_000), Money::usd(350)];
        assert_eq!(prices.iter().max(), Some(&Money::usd(12_000)));
        assert_eq!(prices.iter().min(), Some(&Money::usd(350)));
    }

    #[test]
    fn test_try_sum() {
        let values = [Money::usd(100), Money::usd(250), Money::usd(5)];
        assert_eq!(Money::try_sum(values.iter(), Currency::USD), Some(Money::usd(355)));
        assert_eq!(Money::try_sum([].iter(), Currency::USD), Some(Money::usd(0)));
    }

    #[test]
    fn test_decimal_wire_format() {
        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Wire {
            #[serde(with = "decimal")]
            price: Money,
            #[serde(with = "decimal::option", default)]
            sale: Option<Money>,
        }

        let parsed: Wire = serde_json::from_str(r#"{"price": 49.99}"#).unwrap();
        assert_eq!(parsed.price, Money::usd(4999));
        assert_eq!(parsed.sale, None);

        let json = serde_json::to_string(&Wire {
            price: Money::usd(11999),
            sale: Some(Money::usd(999)),
        })
        .unwrap();
        assert_eq!(json, r#"{"price":119.99,"sale":9.99}"#);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
