//! Prompts for the pharmacy inventory assistant.
//!
//! Every prompt carries a flat-text snapshot of the current inventory so the
//! model can cite stock data when it is relevant to the question.

use serde::{Deserialize, Serialize};

/// Disclaimer that must close every medical-guidance reply.
pub const MEDICAL_DISCLAIMER: &str = "⚠️ Disclaimer: This is general information only, not a prescription. \
Please consult a licensed doctor or pharmacist before taking any medication.";

/// Short reply the model is told to give when a question is off-topic.
pub const OFF_TOPIC_REPLY: &str =
    "I can help with pharmacy stock and general medicine questions. Please ask about those.";

/// Fixed prompt used by the gateway connectivity check.
pub const PING_PROMPT: &str = "Reply with the single word: pong";

/// Header line of the inventory snapshot table.
pub const SNAPSHOT_HEADER: &str = "Name | Category | Quantity | Price | Expiry | Reorder Level";

/// One inventory row as it appears in a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub price: String,
    pub expiry_date: String,
    pub reorder_level: i64,
}

/// Render the inventory as a pipe-separated text table.
pub fn format_inventory_snapshot(lines: &[InventoryLine]) -> String {
    if lines.is_empty() {
        return "(inventory is empty)".to_string();
    }

    let mut out = String::from(SNAPSHOT_HEADER);
    for line in lines {
        out.push('\n');
        out.push_str(&format!(
            "{} | {} | {} | {} | {} | {}",
            line.name,
            line.category,
            line.quantity,
            line.price,
            line.expiry_date,
            line.reorder_level
        ));
    }
    out
}

/// Prompt for questions about dosage, prescriptions, side effects and similar.
pub fn build_medical_prompt(query: &str, snapshot: &str) -> String {
    format!(
        r#"You are a helpful pharmacy assistant for a pharmacy stock management system.

Current inventory:
{snapshot}

User question: "{query}"

Instructions:
1. If any medicine in the inventory is relevant to the question, mention its name, available quantity and price.
2. Give general medical guidance about the question (common usage, typical adult dosage ranges, common side effects, precautions).
3. Keep the answer short and easy to read.
4. End your answer with exactly this line:
{MEDICAL_DISCLAIMER}"#
    )
}

/// Prompt for anything the keyword router does not recognise.
pub fn build_general_prompt(query: &str, snapshot: &str) -> String {
    format!(
        r#"You are a helpful pharmacy assistant for a pharmacy stock management system.

Current inventory:
{snapshot}

User question: "{query}"

If the question is related to the pharmacy, its stock or medicines, answer it helpfully and use the inventory data where relevant.
Otherwise reply only with: "{OFF_TOPIC_REPLY}""#
    )
}

/// Append the medical disclaimer unless the reply already carries it.
pub fn ensure_disclaimer(reply: &str) -> String {
    if reply.contains(MEDICAL_DISCLAIMER) {
        reply.to_string()
    } else {
        format!("{}\n\n{}", reply.trim_end(), MEDICAL_DISCLAIMER)
    }
}
