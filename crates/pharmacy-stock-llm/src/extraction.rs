//! Reply extraction from gateway output.

use serde::Deserialize;

use crate::gateway::{GatewayError, GatewayResult};

/// Raw `generateContent` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Pull the text of the first candidate, joining its parts.
pub fn extract_reply_text(response: &GenerateContentResponse) -> GatewayResult<String> {
    let content = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .ok_or(GatewayError::EmptyResponse)?;

    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(text)
}

/// Escape sequences the service sometimes emits in place of the rupee sign.
const RUPEE_ESCAPES: &[&str] = &["\\u20b9", "\\u20B9", "&#8377;", "&#x20b9;", "&#x20B9;"];

/// Normalize a gateway reply for display.
///
/// Replaces literal rupee escape sequences with `₹` and trims surrounding
/// whitespace.
pub fn normalize_reply(text: &str) -> String {
    let mut out = text.to_string();
    for escape in RUPEE_ESCAPES {
        if out.contains(escape) {
            out = out.replace(escape, "₹");
        }
    }
    out.trim().to_string()
}
