//! Medicine stock models.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{
    parse_date, parse_decimal, parse_integer, validate_category, validate_expiry, validate_name,
    validate_price, validate_quantity, validate_reorder_level, FieldErrors,
};

/// Reorder threshold used when a form leaves it blank.
pub const DEFAULT_REORDER_LEVEL: i64 = 10;

/// Days ahead of today within which a medicine counts as expiring soon.
pub const EXPIRY_WINDOW_DAYS: i64 = 30;

/// A persisted medicine record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    /// Assigned on creation, never changes
    pub id: i64,
    pub name: String,
    /// Grouping label used for filtering and dashboard aggregates
    pub category: String,
    /// Units currently in stock
    pub quantity: i64,
    /// Unit price with two fractional digits
    pub price: Decimal,
    pub expiry_date: NaiveDate,
    /// Quantity below which the medicine needs restocking
    pub reorder_level: i64,
}

/// Validated field values for a create or a full-record update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMedicine {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub price: Decimal,
    pub expiry_date: NaiveDate,
    pub reorder_level: i64,
}

/// Last day of the expiring-soon window starting at `today`.
pub fn expiry_cutoff(today: NaiveDate) -> NaiveDate {
    today + Duration::days(EXPIRY_WINDOW_DAYS)
}

impl Medicine {
    /// Quantity has dropped below this record's reorder level.
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.reorder_level
    }

    /// Expires within [`EXPIRY_WINDOW_DAYS`] of `today` (or already has).
    pub fn is_expiring_soon(&self, today: NaiveDate) -> bool {
        self.expiry_date <= expiry_cutoff(today)
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// Case-insensitive substring match on name or category.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.category.to_lowercase().contains(&query)
    }
}

/// A medicine annotated with its alert flags for display.
///
/// The flags are computed from the record and a date; nothing is written
/// back to storage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MedicineView {
    #[serde(flatten)]
    pub medicine: Medicine,
    pub low_stock: bool,
    pub expiring_soon: bool,
}

impl MedicineView {
    pub fn new(medicine: Medicine, today: NaiveDate) -> Self {
        let low_stock = medicine.is_low_stock();
        let expiring_soon = medicine.is_expiring_soon(today);
        Self {
            medicine,
            low_stock,
            expiring_soon,
        }
    }
}

/// Raw submitted form values, as typed by the user.
///
/// Every field defaults to empty so that missing inputs surface as
/// "required" field errors instead of a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MedicineForm {
    pub name: String,
    pub category: String,
    pub quantity: String,
    pub price: String,
    pub expiry_date: String,
    /// Blank means [`DEFAULT_REORDER_LEVEL`]
    pub reorder_level: String,
}

impl MedicineForm {
    /// Run every field rule and collect all failures.
    pub fn clean(&self, today: NaiveDate) -> Result<NewMedicine, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = errors.check("name", validate_name(&self.name));
        let category = errors.check("category", validate_category(&self.category));
        let quantity = errors.check(
            "quantity",
            parse_integer(&self.quantity).and_then(validate_quantity),
        );
        let price = errors.check("price", parse_decimal(&self.price).and_then(validate_price));
        let expiry_date = errors.check(
            "expiry_date",
            parse_date(&self.expiry_date).and_then(|d| validate_expiry(d, today)),
        );
        let reorder_level = if self.reorder_level.trim().is_empty() {
            Some(DEFAULT_REORDER_LEVEL)
        } else {
            errors.check(
                "reorder_level",
                parse_integer(&self.reorder_level).and_then(validate_reorder_level),
            )
        };

        match (name, category, quantity, price, expiry_date, reorder_level) {
            (
                Some(name),
                Some(category),
                Some(quantity),
                Some(price),
                Some(expiry_date),
                Some(reorder_level),
            ) if errors.is_empty() => Ok(NewMedicine {
                name,
                category,
                quantity,
                price,
                expiry_date,
                reorder_level,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&Medicine> for MedicineForm {
    /// Pre-fill an edit form from a stored record.
    fn from(medicine: &Medicine) -> Self {
        Self {
            name: medicine.name.clone(),
            category: medicine.category.clone(),
            quantity: medicine.quantity.to_string(),
            price: medicine.price.to_string(),
            expiry_date: medicine.expiry_date.format("%Y-%m-%d").to_string(),
            reorder_level: medicine.reorder_level.to_string(),
        }
    }
}
