//! Request and result types shared by the buffered and streaming paths.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::glossary::GlossaryTerm;
use crate::errors::TranslationError;

/// How the buffered result is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON body only
    #[default]
    Json,
    /// JSON body plus a downloadable Word document
    Document,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Document => write!(f, "document"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "document" | "word" | "docx" => Ok(Self::Document),
            _ => Err(TranslationError::Validation(format!(
                "invalid outputFormat '{}', expected 'json' or 'document'",
                s
            ))),
        }
    }
}

/// A validated translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    text: String,
    want_glossary: bool,
    output_format: OutputFormat,
    streaming: bool,
}

impl TranslationRequest {
    /// Build a request, enforcing the length limit and that documents are never streamed
    pub fn new(
        text: impl Into<String>,
        want_glossary: bool,
        output_format: OutputFormat,
        streaming: bool,
        max_text_length: usize,
    ) -> Result<Self, TranslationError> {
        let text = text.into();
        let length = text.chars().count();
        if length > max_text_length {
            return Err(TranslationError::Validation(format!(
                "text length must not exceed {} characters (got {})",
                max_text_length, length
            )));
        }

        if streaming && output_format == OutputFormat::Document {
            return Err(TranslationError::Validation(
                "outputFormat 'document' is not supported for streaming requests".to_string(),
            ));
        }

        Ok(Self {
            text,
            want_glossary,
            output_format,
            streaming,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn want_glossary(&self) -> bool {
        self.want_glossary
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn streaming(&self) -> bool {
        self.streaming
    }
}

/// Result of a buffered translation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub glossary: Vec<GlossaryTerm>,
}

impl TranslationResult {
    pub fn new(translated_text: impl Into<String>, glossary: Vec<GlossaryTerm>) -> Self {
        Self {
            translated_text: translated_text.into(),
            glossary,
        }
    }

    /// Empty result
    pub fn empty() -> Self {
        Self::default()
    }
}
