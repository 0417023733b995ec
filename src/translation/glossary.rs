/*!
 * Glossary parsing for model output.
 *
 * The glossary is produced by a non-deterministic model and is not guaranteed
 * to be well-formed JSON, so parsing falls back in three steps:
 * - parse the whole segment as a JSON array of term objects
 * - parse the span between the first `[` and the last `]`
 * - give up and return a single "Unknown" sentinel term
 */

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

/// A term extracted by the model.
///
/// The model is prompted with `english`/`chinese` keys; both spellings are
/// accepted when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    /// Source-language term
    #[serde(default, alias = "english")]
    pub term: String,

    /// Chinese rendering of the term
    #[serde(default, alias = "chinese")]
    pub translation: String,

    /// Short explanation of the term
    #[serde(default)]
    pub explanation: String,
}

impl GlossaryTerm {
    pub fn new(
        term: impl Into<String>,
        translation: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            translation: translation.into(),
            explanation: explanation.into(),
        }
    }

    /// Placeholder returned when the glossary could not be parsed
    pub fn unknown() -> Self {
        Self::new("Unknown", "未知", "extraction failed")
    }
}

/// Parse the glossary segment of a model reply. Never fails.
pub fn parse_glossary(raw: &str) -> Vec<GlossaryTerm> {
    let raw = raw.trim();

    if let Ok(terms) = serde_json::from_str::<Vec<GlossaryTerm>>(raw) {
        info!("Glossary extracted, {} terms", terms.len());
        return terms;
    }

    warn!("Glossary segment is not valid JSON, trying to locate the array");
    let (Some(start), Some(end)) = (raw.find('['), raw.rfind(']')) else {
        error!("No JSON array found in glossary segment");
        return vec![GlossaryTerm::unknown()];
    };
    if end <= start {
        error!("No JSON array found in glossary segment");
        return vec![GlossaryTerm::unknown()];
    }

    match serde_json::from_str::<Vec<GlossaryTerm>>(&raw[start..=end]) {
        Ok(terms) => {
            info!("Glossary extracted after cleanup, {} terms", terms.len());
            terms
        }
        Err(e) => {
            error!("Cleaned glossary segment is still not valid JSON: {}", e);
            vec![GlossaryTerm::unknown()]
        }
    }
}

/// Split a complete reply at the first separator.
///
/// Returns the trimmed translation and the raw glossary segment, or `None`
/// when the separator does not occur.
pub fn split_translation_glossary<'a>(content: &'a str, separator: &str) -> Option<(String, &'a str)> {
    if separator.is_empty() {
        return None;
    }
    content
        .split_once(separator)
        .map(|(translation, glossary)| (translation.trim().to_string(), glossary))
}
