/*!
 * Provider implementations for the upstream chat-completion service.
 *
 * This module contains:
 * - `openai`: OpenAI-compatible chat completions client (DeepSeek by default)
 * - `sse`: decoding of the upstream event stream into text fragments
 * - `mock`: scripted provider used by tests
 */

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::pin::Pin;

use crate::errors::ProviderError;

/// Lazy sequence of raw text fragments produced by a streaming completion
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// The two-message chat history sent upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPrompt {
    /// System instruction
    pub system: String,
    /// User message
    pub user: String,
}

impl ChatPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Common trait for all chat-completion providers
///
/// Implementations are shared between concurrent requests, so they must not
/// keep per-request state.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a prompt and return the whole message content
    ///
    /// # Arguments
    /// * `prompt` - The system and user messages
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The content of the first choice or an error
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ProviderError>;

    /// Complete a prompt as a stream of text fragments
    ///
    /// The returned stream ends when the upstream signals the end of the
    /// completion. A transport failure is yielded as a single `Err` item.
    async fn complete_stream(&self, prompt: &ChatPrompt) -> Result<FragmentStream, ProviderError>;
}

pub mod mock;
pub mod openai;
pub mod sse;
