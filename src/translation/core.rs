/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, which turns English text into
 * a Chinese translation (and optionally a glossary) through a provider, either
 * as one buffered result or as a live stream of events.
 */

use async_stream::stream;
use futures::{Stream, StreamExt};
use log::{debug, error, info, warn};
use std::pin::Pin;
use std::sync::Arc;

use super::demux::{StreamDemultiplexer, StreamEvent};
use super::glossary::{parse_glossary, split_translation_glossary};
use super::prompts::PromptTemplate;
use super::request::TranslationResult;
use crate::errors::TranslationError;
use crate::providers::Provider;

/// Live sequence of translation events, ending with `Complete` or `Error`
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Translation service backed by a chat-completion provider
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Upstream provider, shared between requests
    provider: Arc<dyn Provider>,
    /// Prompt templates (carry the separator)
    prompts: PromptTemplate,
}

impl TranslationService {
    /// Create a new translation service
    pub fn new(provider: Arc<dyn Provider>, separator: impl Into<String>) -> Self {
        Self {
            provider,
            prompts: PromptTemplate::new(separator),
        }
    }

    /// The separator marker between translation and glossary
    pub fn separator(&self) -> &str {
        self.prompts.separator()
    }

    /// Translate `text` and wait for the complete reply
    pub async fn translate(
        &self,
        text: &str,
        want_glossary: bool,
    ) -> Result<TranslationResult, TranslationError> {
        if text.trim().is_empty() {
            warn!("Attempted to translate empty text");
            return Ok(TranslationResult::empty());
        }

        info!(
            "Translating {} chars (glossary: {})",
            text.chars().count(),
            want_glossary
        );
        let prompt = self.prompts.build(text, want_glossary);
        let content = self.provider.complete(&prompt).await.map_err(|e| {
            error!("Upstream translation request failed: {}", e);
            TranslationError::from(e)
        })?;

        if !want_glossary {
            info!("Translation completed");
            return Ok(TranslationResult::new(content, Vec::new()));
        }

        match split_translation_glossary(&content, self.separator()) {
            Some((translation, raw_glossary)) => {
                let glossary = parse_glossary(raw_glossary);
                Ok(TranslationResult::new(translation, glossary))
            }
            None => {
                warn!("No glossary section found in the response");
                Ok(TranslationResult::new(content, Vec::new()))
            }
        }
    }

    /// Translate `text`, relaying the reply as it arrives.
    ///
    /// The upstream call is made when the stream is first polled. Dropping the
    /// stream stops consumption and releases the upstream response.
    pub fn translate_stream(&self, text: &str, want_glossary: bool) -> EventStream {
        let provider = Arc::clone(&self.provider);
        let separator = self.separator().to_string();
        let prompt = self.prompts.build(text, want_glossary);
        let empty = text.trim().is_empty();
        let text_chars = text.chars().count();

        let events = stream! {
            if empty {
                warn!("Attempted to translate empty text");
                yield StreamEvent::Complete {
                    final_text: Some(String::new()),
                    glossary: None,
                };
                return;
            }

            info!(
                "Streaming translation of {} chars (glossary: {})",
                text_chars, want_glossary
            );
            let mut fragments = match provider.complete_stream(&prompt).await {
                Ok(fragments) => fragments,
                Err(e) => {
                    error!("Upstream streaming request failed: {}", e);
                    yield StreamEvent::error(TranslationError::from(e).to_string());
                    return;
                }
            };

            let mut demux = StreamDemultiplexer::new(separator);
            while let Some(fragment) = fragments.next().await {
                match fragment {
                    Ok(fragment) => {
                        for event in demux.push(&fragment) {
                            yield event;
                        }
                    }
                    Err(e) => {
                        error!("Upstream stream failed: {}", e);
                        yield StreamEvent::error(TranslationError::from(e).to_string());
                        return;
                    }
                }
            }

            debug!(
                "Upstream reply complete: {} chars, separator found: {}",
                demux.accumulated_raw().chars().count(),
                demux.separator_found()
            );
            for event in demux.finish() {
                yield event;
            }
        };

        Box::pin(events)
    }
}
