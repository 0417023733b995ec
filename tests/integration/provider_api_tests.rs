/*!
 * Upstream client tests against a mock HTTP server
 */

use futures::StreamExt;
use mockito::Matcher;

use glossator::app_config::UpstreamConfig;
use glossator::errors::ProviderError;
use glossator::providers::openai::OpenAi;
use glossator::providers::{ChatPrompt, Provider};

use crate::common;

const PATH: &str = "/chat/completions";

fn client_for(server: &mockito::ServerGuard) -> OpenAi {
    let config = UpstreamConfig {
        endpoint: format!("{}{}", server.url(), PATH),
        api_key: "sk-test".to_string(),
        timeout_secs: 5,
        ..UpstreamConfig::default()
    };
    OpenAi::new(&config)
}

fn prompt() -> ChatPrompt {
    ChatPrompt::new("You are a translator.", "Hello")
}

#[tokio::test]
async fn test_complete_withSuccessEnvelope_shouldReturnContent() {
    common::init_logging();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "deepseek-chat",
            "stream": false,
            "messages": [
                {"role": "system", "content": "You are a translator."},
                {"role": "user", "content": "Hello"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":" 你好 "}}]}"#)
        .create_async()
        .await;

    let content = client_for(&server).complete(&prompt()).await.unwrap();

    assert_eq!(content, "你好");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_complete_withErrorStatus_shouldReturnApiError() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(401)
        .with_body(r#"{"error":{"message":"invalid api key"}}"#)
        .create_async()
        .await;

    let err = client_for(&server).complete(&prompt()).await.unwrap_err();

    match err {
        ProviderError::ApiError { status_code, message } => {
            assert_eq!(status_code, 401);
            assert!(message.contains("invalid api key"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_withMalformedEnvelope_shouldReturnParseError() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"unexpected": true}"#)
        .create_async()
        .await;

    let err = client_for(&server).complete(&prompt()).await.unwrap_err();

    assert!(matches!(err, ProviderError::ParseError(_)));
}

#[tokio::test]
async fn test_completeStream_withEventStreamBody_shouldYieldFragments() {
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"你好\"}}]}\n\n",
        ": keep-alive\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"==Terms==[]\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("accept", "text/event-stream")
        .match_body(Matcher::PartialJson(serde_json::json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let stream = client_for(&server).complete_stream(&prompt()).await.unwrap();
    let fragments: Vec<String> = stream.map(|r| r.unwrap()).collect().await;

    assert_eq!(fragments, vec!["你好", "==Terms==[]"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_completeStream_withErrorStatus_shouldFailBeforeStreaming() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(503)
        .with_body("overloaded")
        .create_async()
        .await;

    let result = client_for(&server).complete_stream(&prompt()).await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 503, .. })));
}
