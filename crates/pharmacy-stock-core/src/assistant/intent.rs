//! Keyword intent classification.
//!
//! Routes are checked in order and the first route with a keyword contained
//! in the lowercased query wins.

use serde::Serialize;

/// What the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    QuantityLookup,
    LowStock,
    Expiry,
    MedicalAdvice,
    /// Nothing matched; handed to the gateway as-is
    General,
}

/// A keyword set mapped to an intent.
#[derive(Debug, Clone, Copy)]
pub struct IntentRoute {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
}

impl IntentRoute {
    /// True if any keyword occurs in an already-lowercased query.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Routing table in priority order.
pub const ROUTES: &[IntentRoute] = &[
    IntentRoute {
        intent: Intent::QuantityLookup,
        keywords: &["how many", "left", "quantity", "qty", "units"],
    },
    IntentRoute {
        intent: Intent::LowStock,
        keywords: &["reorder", "restock", "low stock", "below reorder"],
    },
    IntentRoute {
        intent: Intent::Expiry,
        keywords: &["expire", "expiring", "expiry", "expiration"],
    },
    IntentRoute {
        intent: Intent::MedicalAdvice,
        keywords: &[
            "prescribe",
            "prescription",
            "dosage",
            "dose",
            "take",
            "side effect",
            "tablet",
            "capsule",
            "syrup",
            "treatment",
            "symptom",
            "medicine for",
        ],
    },
];

/// Classify a free-text query.
pub fn classify(query: &str) -> Intent {
    let lowered = query.to_lowercase();
    ROUTES
        .iter()
        .find(|route| route.matches(&lowered))
        .map(|route| route.intent)
        .unwrap_or(Intent::General)
}
