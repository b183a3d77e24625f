//! Medicine database operations.

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{Database, DbError, DbResult};
use crate::models::{Medicine, NewMedicine};

const SELECT_COLUMNS: &str =
    "SELECT id, name, category, quantity, price, expiry_date, reorder_level FROM medicines";

/// Optional narrowing for record listings. Empty filter = every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MedicineFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Only records expiring on or before this date
    pub expiring_before: Option<NaiveDate>,
}

impl Database {
    /// Insert a new medicine and return it with its assigned id.
    pub fn insert_medicine(&self, medicine: &NewMedicine) -> DbResult<Medicine> {
        self.conn.execute(
            r#"
            INSERT INTO medicines (
                name, category, quantity, price, expiry_date, reorder_level
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                medicine.name,
                medicine.category,
                medicine.quantity,
                medicine.price.to_string(),
                medicine.expiry_date,
                medicine.reorder_level,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(with_id(id, medicine))
    }

    /// Get a medicine by id.
    pub fn get_medicine(&self, id: i64) -> DbResult<Option<Medicine>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let result = self
            .conn
            .query_row(&sql, [id], MedicineRow::from_row)
            .optional()?;

        result.map(|row| row.try_into()).transpose()
    }

    /// Replace every field of an existing medicine.
    pub fn update_medicine(&self, id: i64, medicine: &NewMedicine) -> DbResult<Medicine> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE medicines SET
                name = ?2,
                category = ?3,
                quantity = ?4,
                price = ?5,
                expiry_date = ?6,
                reorder_level = ?7,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                medicine.name,
                medicine.category,
                medicine.quantity,
                medicine.price.to_string(),
                medicine.expiry_date,
                medicine.reorder_level,
            ],
        )?;
        if rows_affected == 0 {
            return Err(DbError::NotFound(format!("medicine {}", id)));
        }
        Ok(with_id(id, medicine))
    }

    /// Delete a medicine. Returns false when no such id exists.
    pub fn delete_medicine(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medicines WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// All medicines in insertion order.
    pub fn list_medicines(&self) -> DbResult<Vec<Medicine>> {
        let sql = format!("{} ORDER BY id", SELECT_COLUMNS);
        self.query_medicines(&sql, [])
    }

    /// Medicines whose name or category contains `query`, case-insensitively.
    pub fn search_medicines(&self, query: &str) -> DbResult<Vec<Medicine>> {
        Ok(self
            .list_medicines()?
            .into_iter()
            .filter(|m| m.matches(query))
            .collect())
    }

    /// Medicines narrowed by category and/or expiry cut-off.
    pub fn list_medicines_filtered(&self, filter: &MedicineFilter) -> DbResult<Vec<Medicine>> {
        let sql = format!(
            "{} WHERE (?1 IS NULL OR category = ?1) AND (?2 IS NULL OR expiry_date <= ?2) ORDER BY id",
            SELECT_COLUMNS
        );
        self.query_medicines(&sql, params![filter.category, filter.expiring_before])
    }

    /// Medicines below their own reorder level.
    pub fn low_stock_medicines(&self) -> DbResult<Vec<Medicine>> {
        let sql = format!("{} WHERE quantity < reorder_level ORDER BY id", SELECT_COLUMNS);
        self.query_medicines(&sql, [])
    }

    /// Medicines expiring on or before `cutoff`, soonest first.
    pub fn expiring_medicines(&self, cutoff: NaiveDate) -> DbResult<Vec<Medicine>> {
        let sql = format!(
            "{} WHERE expiry_date <= ?1 ORDER BY expiry_date, id",
            SELECT_COLUMNS
        );
        self.query_medicines(&sql, [cutoff])
    }

    fn query_medicines<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> DbResult<Vec<Medicine>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, MedicineRow::from_row)?;

        let mut medicines = Vec::new();
        for row in rows {
            medicines.push(row?.try_into()?);
        }
        Ok(medicines)
    }
}

fn with_id(id: i64, medicine: &NewMedicine) -> Medicine {
    Medicine {
        id,
        name: medicine.name.clone(),
        category: medicine.category.clone(),
        quantity: medicine.quantity,
        price: medicine.price,
        expiry_date: medicine.expiry_date,
        reorder_level: medicine.reorder_level,
    }
}

/// Intermediate row struct for database mapping.
struct MedicineRow {
    id: i64,
    name: String,
    category: String,
    quantity: i64,
    price: String,
    expiry_date: NaiveDate,
    reorder_level: i64,
}

impl MedicineRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            quantity: row.get(3)?,
            price: row.get(4)?,
            expiry_date: row.get(5)?,
            reorder_level: row.get(6)?,
        })
    }
}

impl TryFrom<MedicineRow> for Medicine {
    type Error = DbError;

    fn try_from(row: MedicineRow) -> Result<Self, Self::Error> {
        Ok(Medicine {
            id: row.id,
            name: row.name,
            category: row.category,
            quantity: row.quantity,
            price: Decimal::from_str(&row.price)?,
            expiry_date: row.expiry_date,
            reorder_level: row.reorder_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn new_medicine(name: &str, category: &str, quantity: i64, expiry: &str) -> NewMedicine {
        NewMedicine {
            name: name.into(),
            category: category.into(),
            quantity,
            price: Decimal::from_str("4.75").unwrap(),
            expiry_date: NaiveDate::parse_from_str(expiry, "%Y-%m-%d").unwrap(),
            reorder_level: 10,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let created = db
            .insert_medicine(&new_medicine("Paracetamol", "Analgesic", 5, "2027-01-31"))
            .unwrap();
        assert!(created.id > 0);

        let retrieved = db.get_medicine(created.id).unwrap().unwrap();
        assert_eq!(retrieved, created);
        assert_eq!(retrieved.price.to_string(), "4.75");
    }

    #[test]
    fn test_get_missing() {
        let db = setup_db();
        assert!(db.get_medicine(42).unwrap().is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let db = setup_db();
        let a = db
            .insert_medicine(&new_medicine("Paracetamol", "Analgesic", 5, "2027-01-31"))
            .unwrap();
        // Duplicate names are allowed
        let b = db
            .insert_medicine(&new_medicine("Paracetamol", "Analgesic", 8, "2027-02-28"))
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(db.list_medicines().unwrap().len(), 2);
    }

    #[test]
    fn test_update_replaces_fields() {
        let db = setup_db();
        let created = db
            .insert_medicine(&new_medicine("Paracetamol", "Analgesic", 5, "2027-01-31"))
            .unwrap();

        let replacement = new_medicine("Paracetamol 500mg", "Pain Relief", 50, "2028-01-31");
        let updated = db.update_medicine(created.id, &replacement).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(db.get_medicine(created.id).unwrap().unwrap(), updated);
        assert_eq!(updated.category, "Pain Relief");
    }

    #[test]
    fn test_update_missing_does_not_insert() {
        let db = setup_db();
        let result = db.update_medicine(7, &new_medicine("X", "Y", 1, "2027-01-01"));

        assert!(matches!(result, Err(DbError::NotFound(_))));
        assert!(db.list_medicines().unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let db = setup_db();
        let created = db
            .insert_medicine(&new_medicine("Paracetamol", "Analgesic", 5, "2027-01-31"))
            .unwrap();

        assert!(db.delete_medicine(created.id).unwrap());
        assert!(!db.delete_medicine(created.id).unwrap());
        assert!(db.get_medicine(created.id).unwrap().is_none());
    }

    #[test]
    fn test_list_insertion_order() {
        let db = setup_db();
        for name in ["Zinc", "Aspirin", "Metformin"] {
            db.insert_medicine(&new_medicine(name, "General", 20, "2027-01-31"))
                .unwrap();
        }
        let names: Vec<String> = db.list_medicines().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Zinc", "Aspirin", "Metformin"]);
    }

    #[test]
    fn test_search_name_or_category() {
        let db = setup_db();
        db.insert_medicine(&new_medicine("Paracetamol", "Analgesic", 5, "2027-01-31"))
            .unwrap();
        db.insert_medicine(&new_medicine("Amoxicillin", "Antibiotic", 30, "2027-01-31"))
            .unwrap();
        db.insert_medicine(&new_medicine("Ibuprofen", "Analgesic", 12, "2027-01-31"))
            .unwrap();

        assert_eq!(db.search_medicines("PARA").unwrap().len(), 1);
        assert_eq!(db.search_medicines("analg").unwrap().len(), 2);
        // "cillin" only in a name, "bio" only in a category
        assert_eq!(db.search_medicines("cillin").unwrap()[0].name, "Amoxicillin");
        assert_eq!(db.search_medicines("bio").unwrap()[0].name, "Amoxicillin");
        assert!(db.search_medicines("insulin").unwrap().is_empty());
        assert_eq!(db.search_medicines("").unwrap().len(), 3);
    }

    #[test]
    fn test_low_stock_uses_reorder_level() {
        let db = setup_db();
        db.insert_medicine(&new_medicine("Paracetamol", "Analgesic", 5, "2027-01-31"))
            .unwrap();
        let mut high_threshold = new_medicine("Insulin", "Hormone", 15, "2027-01-31");
        high_threshold.reorder_level = 20;
        db.insert_medicine(&high_threshold).unwrap();
        db.insert_medicine(&new_medicine("Ibuprofen", "Analgesic", 10, "2027-01-31"))
            .unwrap();

        let names: Vec<String> = db
            .low_stock_medicines()
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Paracetamol", "Insulin"]);
    }

    #[test]
    fn test_expiring_sorted_by_date() {
        let db = setup_db();
        db.insert_medicine(&new_medicine("Later", "A", 5, "2026-02-20"))
            .unwrap();
        db.insert_medicine(&new_medicine("Sooner", "A", 5, "2026-01-10"))
            .unwrap();
        db.insert_medicine(&new_medicine("Far", "A", 5, "2027-01-10"))
            .unwrap();

        let cutoff = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let names: Vec<String> = db
            .expiring_medicines(cutoff)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Sooner", "Later"]);
    }

    #[test]
    fn test_filtered_listing() {
        let db = setup_db();
        db.insert_medicine(&new_medicine("Paracetamol", "Analgesic", 5, "2026-03-01"))
            .unwrap();
        db.insert_medicine(&new_medicine("Amoxicillin", "Antibiotic", 30, "2027-01-31"))
            .unwrap();

        let all = db.list_medicines_filtered(&MedicineFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let by_category = db
            .list_medicines_filtered(&MedicineFilter {
                category: Some("Antibiotic".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].name, "Amoxicillin");

        let by_expiry = db
            .list_medicines_filtered(&MedicineFilter {
                expiring_before: NaiveDate::from_ymd_opt(2026, 6, 1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_expiry.len(), 1);
        assert_eq!(by_expiry[0].name, "Paracetamol");
    }
}
