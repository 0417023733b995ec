//! Request and response bodies of the translation endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::TranslationError;
use crate::translation::{GlossaryTerm, OutputFormat, TranslationRequest, TranslationResult};

/// Body of `POST /translate` and `POST /translate/stream`.
///
/// All fields are optional at the wire level so that missing ones produce a
/// readable validation error instead of a serde rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateBody {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default, alias = "output_format")]
    pub output_format: Option<String>,

    #[serde(
        default,
        alias = "include_glossary",
        alias = "include_vocabulary",
        deserialize_with = "deserialize_flag"
    )]
    pub include_glossary: Option<bool>,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub streaming: Option<bool>,
}

impl TranslateBody {
    /// Validate the body. `force_streaming` is set by the streaming routes.
    pub fn into_request(
        self,
        max_text_length: usize,
        force_streaming: bool,
    ) -> Result<TranslationRequest, TranslationError> {
        let text = self.text.ok_or_else(|| {
            TranslationError::Validation("missing required field 'text'".to_string())
        })?;

        let output_format = match self.output_format.as_deref() {
            Some(value) => value.parse::<OutputFormat>()?,
            None => OutputFormat::default(),
        };

        TranslationRequest::new(
            text,
            self.include_glossary.unwrap_or(false),
            output_format,
            force_streaming || self.streaming.unwrap_or(false),
            max_text_length,
        )
    }
}

// Accepts `true`/`false` as well as their string spellings.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => None,
        Some(Flag::Bool(value)) => Some(value),
        Some(Flag::Text(value)) => Some(matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        )),
    })
}

/// Successful buffered response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub success: bool,
    pub translation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glossary: Option<Vec<GlossaryTerm>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

impl TranslateResponse {
    /// Glossary is only included when it was requested and is non-empty
    pub fn new(
        result: TranslationResult,
        want_glossary: bool,
        document_url: Option<String>,
    ) -> Self {
        let glossary = (want_glossary && !result.glossary.is_empty()).then_some(result.glossary);
        Self {
            success: true,
            translation: result.translated_text,
            glossary,
            document_url,
        }
    }
}
