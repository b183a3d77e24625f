//! Field validation for medicine records.
//!
//! Each `validate_*` function either returns the accepted value or a
//! [`ValidationError`] describing why it was rejected. [`FieldErrors`]
//! collects the failures of a whole form keyed by field name.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Maximum length of a medicine name.
pub const NAME_MAX_LEN: usize = 100;
/// Maximum length of a category label.
pub const CATEGORY_MAX_LEN: usize = 50;
/// Maximum total digits of a price.
pub const PRICE_MAX_DIGITS: u32 = 10;
/// Fractional digits of a price.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// A single rejected field value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Quantity cannot be negative.")]
    NegativeQuantity,

    #[error("Expiry date cannot be in the past.")]
    PastExpiry,

    #[error("Price cannot be negative.")]
    NegativePrice,

    #[error("Reorder level cannot be negative.")]
    NegativeReorderLevel,

    #[error("This field is required.")]
    Required,

    #[error("Ensure this value has at most {max} characters (it has {actual}).")]
    TooLong { max: usize, actual: usize },

    #[error("Enter a whole number.")]
    NotInteger,

    #[error("Enter a number.")]
    NotNumber,

    #[error("Enter a valid date (YYYY-MM-DD).")]
    InvalidDate,

    #[error("Ensure that there are no more than {0} digits in total.")]
    TooManyDigits(u32),

    #[error("Ensure that there are no more than {0} decimal places.")]
    TooManyDecimalPlaces(u32),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Per-field validation messages for a submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against a field.
    pub fn add(&mut self, field: &str, error: &ValidationError) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(error.to_string());
    }

    /// Keep `Ok` values, recording `Err` values against `field`.
    pub fn check<T>(&mut self, field: &str, result: ValidationResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.add(field, &e);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|v| v.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Reject negative stock quantities.
pub fn validate_quantity(quantity: i64) -> ValidationResult<i64> {
    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity);
    }
    Ok(quantity)
}

/// Reject expiry dates earlier than `today`. Expiring today is accepted.
pub fn validate_expiry(expiry: NaiveDate, today: NaiveDate) -> ValidationResult<NaiveDate> {
    if expiry < today {
        return Err(ValidationError::PastExpiry);
    }
    Ok(expiry)
}

/// Reject negative or over-precise prices; normalizes to two decimal places.
pub fn validate_price(price: Decimal) -> ValidationResult<Decimal> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::NegativePrice);
    }
    let normalized = price.normalize();
    if normalized.scale() > PRICE_DECIMAL_PLACES {
        return Err(ValidationError::TooManyDecimalPlaces(PRICE_DECIMAL_PLACES));
    }

    let mut price = normalized;
    price.rescale(PRICE_DECIMAL_PLACES);
    let digits = price.mantissa().unsigned_abs().to_string().len() as u32;
    if digits > PRICE_MAX_DIGITS {
        return Err(ValidationError::TooManyDigits(PRICE_MAX_DIGITS));
    }
    Ok(price)
}

/// Reject negative reorder thresholds.
pub fn validate_reorder_level(level: i64) -> ValidationResult<i64> {
    if level < 0 {
        return Err(ValidationError::NegativeReorderLevel);
    }
    Ok(level)
}

/// Required text with a maximum length, trimmed.
pub fn validate_text(value: &str, max_len: usize) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }
    let actual = trimmed.chars().count();
    if actual > max_len {
        return Err(ValidationError::TooLong {
            max: max_len,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

pub fn validate_name(name: &str) -> ValidationResult<String> {
    validate_text(name, NAME_MAX_LEN)
}

pub fn validate_category(category: &str) -> ValidationResult<String> {
    validate_text(category, CATEGORY_MAX_LEN)
}

/// Parse a required whole number.
pub fn parse_integer(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required);
    }
    raw.parse::<i64>().map_err(|_| ValidationError::NotInteger)
}

/// Parse a required decimal number.
pub fn parse_decimal(raw: &str) -> ValidationResult<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required);
    }
    Decimal::from_str(raw).map_err(|_| ValidationError::NotNumber)
}

/// Parse a required ISO-8601 calendar date.
pub fn parse_date(raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quantity() {
        assert_eq!(validate_quantity(0), Ok(0));
        assert_eq!(validate_quantity(25), Ok(25));
        assert_eq!(validate_quantity(-1), Err(ValidationError::NegativeQuantity));
    }

    #[test]
    fn test_expiry() {
        let today = date(2026, 3, 15);
        assert_eq!(validate_expiry(today, today), Ok(today));
        assert_eq!(validate_expiry(date(2027, 1, 1), today), Ok(date(2027, 1, 1)));
        assert_eq!(
            validate_expiry(date(2026, 3, 14), today),
            Err(ValidationError::PastExpiry)
        );
    }

    #[test]
    fn test_price() {
        let price = validate_price(Decimal::from_str("12.5").unwrap()).unwrap();
        assert_eq!(price.to_string(), "12.50");
        assert_eq!(validate_price(Decimal::ZERO).unwrap().to_string(), "0.00");
        // Trailing zeros beyond two places are not extra precision
        assert_eq!(
            validate_price(Decimal::from_str("3.1000").unwrap()).unwrap().to_string(),
            "3.10"
        );

        assert_eq!(
            validate_price(Decimal::from_str("-0.01").unwrap()),
            Err(ValidationError::NegativePrice)
        );
        assert_eq!(
            validate_price(Decimal::from_str("1.005").unwrap()),
            Err(ValidationError::TooManyDecimalPlaces(2))
        );
        assert_eq!(
            validate_price(Decimal::from_str("123456789.00").unwrap()),
            Err(ValidationError::TooManyDigits(10))
        );
        assert!(validate_price(Decimal::from_str("99999999.99").unwrap()).is_ok());
    }

    #[test]
    fn test_text_fields() {
        assert_eq!(validate_name("  Paracetamol "), Ok("Paracetamol".to_string()));
        assert_eq!(validate_name("   "), Err(ValidationError::Required));
        assert_eq!(
            validate_category(&"x".repeat(51)),
            Err(ValidationError::TooLong { max: 50, actual: 51 })
        );
        assert!(validate_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_integer(" 42 "), Ok(42));
        assert_eq!(parse_integer("4.2"), Err(ValidationError::NotInteger));
        assert_eq!(parse_integer(""), Err(ValidationError::Required));
        assert_eq!(parse_decimal("abc"), Err(ValidationError::NotNumber));
        assert_eq!(parse_date("2027-02-30"), Err(ValidationError::InvalidDate));
        assert_eq!(parse_date("2027-02-28"), Ok(date(2027, 2, 28)));
    }

    #[test]
    fn test_field_errors_collects_messages() {
        let mut errors = FieldErrors::new();
        assert!(errors.check("quantity", validate_quantity(5)).is_some());
        assert!(errors.is_empty());

        assert!(errors.check("quantity", validate_quantity(-5)).is_none());
        errors.add("quantity", &ValidationError::Required);

        assert_eq!(
            errors.get("quantity").unwrap(),
            &["Quantity cannot be negative.".to_string(), "This field is required.".to_string()]
        );
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({"quantity": ["Quantity cannot be negative.", "This field is required."]})
        );
    }

    proptest! {
        #[test]
        fn prop_negative_quantity_rejected(q in i64::MIN..0) {
            prop_assert_eq!(validate_quantity(q), Err(ValidationError::NegativeQuantity));
        }

        #[test]
        fn prop_non_negative_quantity_accepted(q in 0i64..i64::MAX) {
            prop_assert_eq!(validate_quantity(q), Ok(q));
        }

        #[test]
        fn prop_past_expiry_rejected(days_before in 1i64..3650) {
            let today = date(2026, 6, 1);
            let expiry = today - chrono::Duration::days(days_before);
            prop_assert_eq!(validate_expiry(expiry, today), Err(ValidationError::PastExpiry));
        }
    }
}
