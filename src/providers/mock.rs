/*!
 * Mock provider implementation for testing.
 *
 * The mock replays scripted content instead of calling an upstream service:
 * - `MockProvider::working(content)` - returns the content, streamed in small fragments
 * - `MockProvider::fragments(parts)` - streams exactly the given fragments
 * - `MockProvider::failing()` - every call fails with an API error
 * - `MockProvider::broken_stream(parts)` - streams the parts, then fails mid-stream
 */

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{ChatPrompt, FragmentStream, Provider};
use crate::errors::ProviderError;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Succeeds with the given fragments (joined for non-streaming calls)
    Working { fragments: Vec<String> },
    /// Always fails with an API error
    Failing,
    /// Streams the fragments, then reports a transport failure
    BrokenStream { fragments: Vec<String> },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of calls received
    request_count: Arc<AtomicUsize>,
    /// Prompts received, in order
    prompts: Arc<Mutex<Vec<ChatPrompt>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock that answers with `content`
    ///
    /// Streaming calls deliver the content in fragments of three characters.
    pub fn working(content: &str) -> Self {
        let chars: Vec<char> = content.chars().collect();
        let fragments = chars
            .chunks(3)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect();
        Self::new(MockBehavior::Working { fragments })
    }

    /// Create a working mock that streams exactly these fragments
    pub fn fragments<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MockBehavior::Working {
            fragments: parts.into_iter().map(Into::into).collect(),
        })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock whose stream breaks after the given fragments
    pub fn broken_stream<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MockBehavior::BrokenStream {
            fragments: parts.into_iter().map(Into::into).collect(),
        })
    }

    /// Number of calls made to this provider
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// The most recent prompt received
    pub fn last_prompt(&self) -> Option<ChatPrompt> {
        self.prompts.lock().last().cloned()
    }

    fn record(&self, prompt: &ChatPrompt) {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.clone());
    }

    fn failure() -> ProviderError {
        ProviderError::ApiError {
            status_code: 500,
            message: "Mock provider failure".to_string(),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ProviderError> {
        self.record(prompt);

        match &self.behavior {
            MockBehavior::Working { fragments } => Ok(fragments.concat().trim().to_string()),
            MockBehavior::Failing | MockBehavior::BrokenStream { .. } => Err(Self::failure()),
        }
    }

    async fn complete_stream(&self, prompt: &ChatPrompt) -> Result<FragmentStream, ProviderError> {
        self.record(prompt);

        match &self.behavior {
            MockBehavior::Working { fragments } => {
                let items: Vec<Result<String, ProviderError>> =
                    fragments.iter().cloned().map(Ok).collect();
                Ok(Box::pin(stream::iter(items)))
            }
            MockBehavior::Failing => Err(Self::failure()),
            MockBehavior::BrokenStream { fragments } => {
                let mut items: Vec<Result<String, ProviderError>> =
                    fragments.iter().cloned().map(Ok).collect();
                items.push(Err(ProviderError::ConnectionError(
                    "connection reset by peer".to_string(),
                )));
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }
}
