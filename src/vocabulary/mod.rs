pub mod gemini;

pub use gemini::GeminiClient;

use crate::core::{
    FlicktionaryError,
    VocabularyItem,
};

/// Parse a vocabulary list pasted by the user or returned by the generator.
///
/// Accepts a JSON array, optionally wrapped in a Markdown code fence.
pub fn parse_vocabulary(text: &str) -> Result<Vec<VocabularyItem>, FlicktionaryError> {
    let json = strip_code_fence(text.trim());
    serde_json::from_str::<Vec<VocabularyItem>>(json)
        .map_err(|e| FlicktionaryError::InvalidVocabulary(e.to_string()))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
