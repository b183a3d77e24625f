//! Reply text for the database-backed intents.
//!
//! Replies use `**bold**` emphasis and `\n` line breaks.

use chrono::NaiveDate;

use crate::models::{Medicine, EXPIRY_WINDOW_DAYS};

pub const NOT_FOUND_REPLY: &str = "I couldn't find that medicine in the inventory.";
pub const ALL_STOCKED_REPLY: &str = "All medicines are sufficiently stocked.";

/// First record (in iteration order) whose lowercased name occurs in the query.
pub fn find_mentioned<'m>(medicines: &'m [Medicine], query: &str) -> Option<&'m Medicine> {
    let lowered = query.to_lowercase();
    medicines
        .iter()
        .find(|m| lowered.contains(&m.name.to_lowercase()))
}

pub fn quantity_reply(medicine: Option<&Medicine>) -> String {
    let Some(m) = medicine else {
        return NOT_FOUND_REPLY.to_string();
    };

    let mut reply = format!(
        "There are **{}** units of **{}** left.",
        m.quantity, m.name
    );
    if m.is_low_stock() {
        reply.push_str(&format!(
            "\n⚠️ Stock is below the reorder level of {}. Please restock soon.",
            m.reorder_level
        ));
    }
    reply
}

pub fn low_stock_reply(low: &[Medicine]) -> String {
    if low.is_empty() {
        return ALL_STOCKED_REPLY.to_string();
    }

    let mut reply = String::from("**Medicines below reorder level:**");
    for m in low {
        reply.push_str(&format!(
            "\n- **{}** — qty {}, reorder level {}",
            m.name, m.quantity, m.reorder_level
        ));
    }
    reply
}

pub fn expiry_reply(expiring: &[Medicine], today: NaiveDate) -> String {
    if expiring.is_empty() {
        return format!(
            "No medicines are expiring within the next {} days.",
            EXPIRY_WINDOW_DAYS
        );
    }

    let mut reply = format!(
        "**Medicines expiring within {} days:**",
        EXPIRY_WINDOW_DAYS
    );
    for m in expiring {
        reply.push_str(&format!(
            "\n- **{}** — expires {}, qty {}",
            m.name,
            m.expiry_date.format("%Y-%m-%d"),
            m.quantity
        ));
        if m.is_expired(today) {
            reply.push_str(" (EXPIRED)");
        }
    }
    reply.push_str("\nFollow FEFO: dispense the earliest-expiring stock first.");
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn med(name: &str, quantity: i64, reorder_level: i64, expiry: NaiveDate) -> Medicine {
        Medicine {
            id: 1,
            name: name.into(),
            category: "General".into(),
            quantity,
            price: Decimal::new(500, 2),
            expiry_date: expiry,
            reorder_level,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quantity_with_restock_warning() {
        let m = med("Paracetamol", 5, 10, date(2027, 1, 1));
        let reply = quantity_reply(Some(&m));
        assert!(reply.contains("**5**"));
        assert!(reply.contains("Paracetamol"));
        assert!(reply.contains("restock"));
    }

    #[test]
    fn test_quantity_without_warning() {
        let m = med("Paracetamol", 50, 10, date(2027, 1, 1));
        assert!(!quantity_reply(Some(&m)).contains("restock"));
        assert_eq!(quantity_reply(None), NOT_FOUND_REPLY);
    }

    #[test]
    fn test_find_mentioned_first_in_order() {
        let medicines = vec![
            med("Aspirin", 1, 10, date(2027, 1, 1)),
            med("Aspirin Plus", 2, 10, date(2027, 1, 1)),
        ];
        let found = find_mentioned(&medicines, "how many aspirin plus left").unwrap();
        assert_eq!(found.quantity, 1);
        assert!(find_mentioned(&medicines, "how many ibuprofen").is_none());
    }

    #[test]
    fn test_low_stock_lines() {
        assert_eq!(low_stock_reply(&[]), ALL_STOCKED_REPLY);
        let reply = low_stock_reply(&[med("Insulin", 3, 20, date(2027, 1, 1))]);
        assert!(reply.contains("- **Insulin** — qty 3, reorder level 20"));
    }

    #[test]
    fn test_expiry_marks_expired() {
        let today = date(2026, 3, 10);
        let reply = expiry_reply(
            &[
                med("Old Syrup", 4, 10, date(2026, 3, 1)),
                med("Amoxicillin", 40, 10, date(2026, 3, 20)),
            ],
            today,
        );
        assert!(reply.contains("- **Old Syrup** — expires 2026-03-01, qty 4 (EXPIRED)"));
        assert!(reply.contains("- **Amoxicillin** — expires 2026-03-20, qty 40\n"));
        assert!(reply.contains("FEFO"));
    }

    #[test]
    fn test_expiry_none() {
        let reply = expiry_reply(&[], date(2026, 3, 10));
        assert_eq!(reply, "No medicines are expiring within the next 30 days.");
    }
}
