use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::sse::fragment_stream;
use super::{ChatPrompt, FragmentStream, Provider};
use crate::app_config::UpstreamConfig;
use crate::errors::ProviderError;

/// Client for OpenAI-compatible chat completion APIs (DeepSeek by default)
#[derive(Debug)]
pub struct OpenAi {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Full chat-completions URL
    endpoint: String,
    /// Model to request
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Output token ceiling
    max_tokens: u32,
}

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// The model to use
    pub model: String,

    /// The messages for the conversation
    pub messages: Vec<ChatMessage>,

    /// Temperature for generation
    pub temperature: f32,

    /// Maximum number of tokens to generate
    pub max_tokens: u32,

    /// Whether the reply is streamed
    pub stream: bool,
}

/// Message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Non-streaming chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// Individual choice in a response
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// The assistant message
    pub message: Option<ChatMessageContent>,
}

/// Assistant message content
#[derive(Debug, Deserialize)]
pub struct ChatMessageContent {
    /// Message text
    pub content: Option<String>,
}

impl ChatCompletionRequest {
    /// Create a new request
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: 0.1,
            max_tokens,
            stream: false,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Request a streamed reply
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

impl OpenAi {
    /// Create a new client from the upstream configuration
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Build the request payload for a prompt
    pub fn build_request(&self, prompt: &ChatPrompt, stream: bool) -> ChatCompletionRequest {
        ChatCompletionRequest::new(&self.model, self.max_tokens)
            .add_message("system", &prompt.system)
            .add_message("user", &prompt.user)
            .temperature(self.temperature)
            .stream(stream)
    }

    /// Extract the content of the first choice
    pub fn extract_text(response: ChatCompletionResponse) -> Result<String, ProviderError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                ProviderError::ParseError("response has no choices[0].message.content".to_string())
            })
    }

    async fn send(&self, request: &ChatCompletionRequest) -> Result<reqwest::Response, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::AuthenticationError(
                "upstream API key is not configured".to_string(),
            ));
        }

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key));
        if request.stream {
            builder = builder.header(header::ACCEPT, "text/event-stream");
        }

        let response = builder
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Upstream API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for OpenAi {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ProviderError> {
        let request = self.build_request(prompt, false);
        info!(
            "Sending translation request upstream (model: {}, prompt length: {} chars)",
            request.model,
            prompt.user.chars().count()
        );

        let response = self.send(&request).await?;
        let body = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Self::extract_text(body)
    }

    async fn complete_stream(&self, prompt: &ChatPrompt) -> Result<FragmentStream, ProviderError> {
        let request = self.build_request(prompt, true);
        info!(
            "Sending streaming translation request upstream (model: {}, prompt length: {} chars)",
            request.model,
            prompt.user.chars().count()
        );

        let response = self.send(&request).await?;
        debug!("Upstream accepted streaming request with status {}", response.status());

        Ok(fragment_stream(response.bytes_stream()))
    }
}
