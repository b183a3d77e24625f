//! Inventory operations behind the CRUD screens.
//!
//! Every mutating or listing operation takes the [`Actor`] performing it;
//! the read-only export used by the public API does not.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::dashboard::{summarize, Dashboard};
use crate::db::{Database, DbError, MedicineFilter};
use crate::models::{Actor, Medicine, MedicineForm, MedicineView};
use crate::validation::FieldErrors;

/// Inventory errors.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    #[error("Medicine {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// First step of a two-step delete: the record about to be removed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeleteConfirmation {
    pub medicine: Medicine,
    pub confirm: String,
}

/// Inventory service over a database handle.
pub struct Inventory<'a> {
    db: &'a Database,
}

impl<'a> Inventory<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List medicines, optionally narrowed to names/categories containing `query`.
    ///
    /// An empty query lists everything.
    pub fn list(
        &self,
        query: Option<&str>,
        actor: &Actor,
        today: NaiveDate,
    ) -> InventoryResult<Vec<MedicineView>> {
        let medicines = match query.filter(|q| !q.is_empty()) {
            Some(q) => self.db.search_medicines(q)?,
            None => self.db.list_medicines()?,
        };
        tracing::debug!(
            user = actor.username(),
            query = ?query,
            count = medicines.len(),
            "Listed medicines"
        );

        Ok(medicines
            .into_iter()
            .map(|m| MedicineView::new(m, today))
            .collect())
    }

    /// Fetch one medicine, e.g. to pre-fill an edit form.
    pub fn get(&self, id: i64, _actor: &Actor) -> InventoryResult<Medicine> {
        self.db
            .get_medicine(id)?
            .ok_or(InventoryError::NotFound(id))
    }

    /// Validate and store a new medicine.
    pub fn create(
        &self,
        form: &MedicineForm,
        actor: &Actor,
        today: NaiveDate,
    ) -> InventoryResult<Medicine> {
        let fields = form.clean(today).map_err(|errors| {
            tracing::warn!(user = actor.username(), %errors, "Rejected new medicine");
            InventoryError::Validation(errors)
        })?;

        let medicine = self.db.insert_medicine(&fields)?;
        tracing::info!(
            user = actor.username(),
            id = medicine.id,
            name = %medicine.name,
            "Medicine added"
        );
        Ok(medicine)
    }

    /// Validate and replace every field of an existing medicine.
    pub fn update(
        &self,
        id: i64,
        form: &MedicineForm,
        actor: &Actor,
        today: NaiveDate,
    ) -> InventoryResult<Medicine> {
        if self.db.get_medicine(id)?.is_none() {
            return Err(InventoryError::NotFound(id));
        }

        let fields = form.clean(today).map_err(|errors| {
            tracing::warn!(user = actor.username(), id, %errors, "Rejected medicine update");
            InventoryError::Validation(errors)
        })?;

        let medicine = self.db.update_medicine(id, &fields).map_err(|e| match e {
            DbError::NotFound(_) => InventoryError::NotFound(id),
            other => InventoryError::Database(other),
        })?;
        tracing::info!(user = actor.username(), id, "Medicine updated");
        Ok(medicine)
    }

    /// Show what a delete would remove. Storage is untouched.
    pub fn request_delete(&self, id: i64, actor: &Actor) -> InventoryResult<DeleteConfirmation> {
        let medicine = self.get(id, actor)?;
        let confirm = format!(
            "Are you sure you want to delete \"{}\"? This cannot be undone.",
            medicine.name
        );
        Ok(DeleteConfirmation { medicine, confirm })
    }

    /// Irreversibly remove a medicine after confirmation.
    pub fn confirm_delete(&self, id: i64, actor: &Actor) -> InventoryResult<()> {
        if !self.db.delete_medicine(id)? {
            return Err(InventoryError::NotFound(id));
        }
        tracing::info!(user = actor.username(), id, "Medicine deleted");
        Ok(())
    }

    /// Every record, for the read-only export.
    pub fn export(&self, filter: &MedicineFilter) -> InventoryResult<Vec<Medicine>> {
        Ok(self.db.list_medicines_filtered(filter)?)
    }

    /// Summary figures over the live record set.
    pub fn dashboard(&self, _actor: &Actor, today: NaiveDate) -> InventoryResult<Dashboard> {
        let medicines = self.db.list_medicines()?;
        Ok(summarize(&medicines, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
    }

    fn setup() -> (Database, Actor) {
        let db = Database::open_in_memory().unwrap();
        db.create_user("staff", "pw").unwrap();
        let (_, actor) = db.login("staff", "pw", Duration::hours(1)).unwrap().unwrap();
        (db, actor)
    }

    fn form(name: &str, category: &str, quantity: &str, expiry: &str) -> MedicineForm {
        MedicineForm {
            name: name.into(),
            category: category.into(),
            quantity: quantity.into(),
            price: "10.00".into(),
            expiry_date: expiry.into(),
            reorder_level: "10".into(),
        }
    }

    #[test]
    fn test_create_then_list() {
        let (db, actor) = setup();
        let inventory = Inventory::new(&db);

        let created = inventory
            .create(&form("Paracetamol", "Analgesic", "5", "2026-05-20"), &actor, today())
            .unwrap();

        let listed = inventory.list(None, &actor, today()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].medicine, created);
        assert!(listed[0].low_stock);
        assert!(listed[0].expiring_soon);
    }

    #[test]
    fn test_create_invalid_persists_nothing() {
        let (db, actor) = setup();
        let inventory = Inventory::new(&db);

        let negative = form("Paracetamol", "Analgesic", "-1", "2026-05-20");
        let result = inventory.create(&negative, &actor, today());
        match result {
            Err(InventoryError::Validation(errors)) => {
                assert!(errors.get("quantity").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let expired = form("Paracetamol", "Analgesic", "5", "2026-04-30");
        let result = inventory.create(&expired, &actor, today());
        assert!(matches!(result, Err(InventoryError::Validation(_))));

        assert!(db.list_medicines().unwrap().is_empty());
    }

    #[test]
    fn test_list_with_query() {
        let (db, actor) = setup();
        let inventory = Inventory::new(&db);
        inventory
            .create(&form("Paracetamol", "Analgesic", "50", "2027-01-01"), &actor, today())
            .unwrap();
        inventory
            .create(&form("Cetirizine", "Antihistamine", "50", "2027-01-01"), &actor, today())
            .unwrap();

        assert_eq!(inventory.list(Some("cet"), &actor, today()).unwrap().len(), 2);
        assert_eq!(inventory.list(Some("ANTIHIST"), &actor, today()).unwrap().len(), 1);
        assert_eq!(inventory.list(Some(""), &actor, today()).unwrap().len(), 2);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (db, actor) = setup();
        let inventory = Inventory::new(&db);

        let result = inventory.update(99, &form("X", "Y", "1", "2027-01-01"), &actor, today());
        assert!(matches!(result, Err(InventoryError::NotFound(99))));
        assert!(db.list_medicines().unwrap().is_empty());
    }

    #[test]
    fn test_update_invalid_leaves_record() {
        let (db, actor) = setup();
        let inventory = Inventory::new(&db);
        let created = inventory
            .create(&form("Paracetamol", "Analgesic", "50", "2027-01-01"), &actor, today())
            .unwrap();

        let negative = form("Paracetamol", "Analgesic", "-4", "2027-01-01");
        let result = inventory.update(created.id, &negative, &actor, today());
        assert!(matches!(result, Err(InventoryError::Validation(_))));
        assert_eq!(inventory.get(created.id, &actor).unwrap(), created);
    }

    #[test]
    fn test_two_step_delete() {
        let (db, actor) = setup();
        let inventory = Inventory::new(&db);
        let created = inventory
            .create(&form("Paracetamol", "Analgesic", "50", "2027-01-01"), &actor, today())
            .unwrap();

        let confirmation = inventory.request_delete(created.id, &actor).unwrap();
        assert_eq!(confirmation.medicine, created);
        assert!(confirmation.confirm.contains("Paracetamol"));
        assert_eq!(inventory.list(None, &actor, today()).unwrap().len(), 1);

        inventory.confirm_delete(created.id, &actor).unwrap();
        assert!(inventory.list(None, &actor, today()).unwrap().is_empty());

        assert!(matches!(
            inventory.confirm_delete(created.id, &actor),
            Err(InventoryError::NotFound(_))
        ));
        assert!(matches!(
            inventory.request_delete(created.id, &actor),
            Err(InventoryError::NotFound(_))
        ));
    }
}
