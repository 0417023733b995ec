/*!
 * Common test utilities for the glossator test suite
 */

use anyhow::Result;
use axum::Router;
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use glossator::app_config::ServerConfig;
use glossator::document::DocumentRenderer;
use glossator::providers::Provider;
use glossator::providers::mock::MockProvider;
use glossator::server::{AppState, create_router};
use glossator::translation::{EventStream, SegmentKind, StreamEvent, TranslationService};

/// Separator used by the test services
pub const SEPARATOR: &str = "==Terms==";

/// Text length limit used by the test server
pub const TEST_MAX_TEXT_LENGTH: usize = 200;

/// Glossary JSON as the model is prompted to produce it
pub const GLOSSARY_JSON: &str = r#"[{"english":"Machine Learning","chinese":"机器学习","explanation":"从数据中学习的技术"},{"english":"Neural Network","chinese":"神经网络","explanation":"受大脑启发的计算模型"}]"#;

/// Route log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// A model reply made of a translation, the separator and a glossary
pub fn reply_with_glossary(translation: &str) -> String {
    format!("{}\n{}\n{}", translation, SEPARATOR, GLOSSARY_JSON)
}

/// Translation service backed by the given mock
pub fn test_service(provider: &Arc<MockProvider>) -> TranslationService {
    let provider: Arc<dyn Provider> = provider.clone();
    TranslationService::new(provider, SEPARATOR)
}

/// Handler state writing documents into `download_dir`
pub fn test_state(provider: &Arc<MockProvider>, download_dir: &Path) -> AppState {
    let server = ServerConfig {
        download_dir: download_dir.to_path_buf(),
        max_text_length: TEST_MAX_TEXT_LENGTH,
        ..ServerConfig::default()
    };
    let renderer = DocumentRenderer::new(download_dir, "test footer");
    AppState::new(test_service(provider), renderer, server)
}

/// Full router over a mock provider
pub fn test_router(provider: &Arc<MockProvider>, download_dir: &Path) -> Router {
    create_router(test_state(provider, download_dir))
}

/// Drain an event stream
pub async fn collect_events(stream: EventStream) -> Vec<StreamEvent> {
    stream.collect().await
}

/// Concatenate the chunks of one kind
pub fn joined_chunks(events: &[StreamEvent], wanted: SegmentKind) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            StreamEvent::Chunk { kind, text } if *kind == wanted => Some(text.as_str()),
            _ => None,
        })
        .collect()
}
