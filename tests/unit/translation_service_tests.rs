/*!
 * Tests for the translation service (buffered and streaming paths)
 */

use std::sync::Arc;

use glossator::errors::{ProviderError, TranslationError};
use glossator::providers::mock::MockProvider;
use glossator::translation::{GlossaryTerm, PromptTemplate, SegmentKind, StreamEvent};

use crate::common::{self, collect_events, joined_chunks, reply_with_glossary, test_service, SEPARATOR};

#[tokio::test]
async fn test_translate_withoutGlossary_shouldReturnContentAsIs() {
    common::init_logging();
    let provider = Arc::new(MockProvider::working("你好，世界"));
    let service = test_service(&provider);

    let result = service.translate("Hello, world", false).await.unwrap();

    assert_eq!(result.translated_text, "你好，世界");
    assert!(result.glossary.is_empty());

    let prompt = provider.last_prompt().unwrap();
    assert_eq!(prompt.system, PromptTemplate::TRANSLATOR);
    assert_eq!(prompt.user, "Hello, world");
}

#[tokio::test]
async fn test_translate_withGlossary_shouldSplitAndParse() {
    let provider = Arc::new(MockProvider::working(&reply_with_glossary("机器学习是一种技术。")));
    let service = test_service(&provider);

    let result = service.translate("Machine learning is a technique.", true).await.unwrap();

    assert_eq!(result.translated_text, "机器学习是一种技术。");
    assert_eq!(result.glossary.len(), 2);
    assert_eq!(
        result.glossary[0],
        GlossaryTerm::new("Machine Learning", "机器学习", "从数据中学习的技术")
    );

    let prompt = provider.last_prompt().unwrap();
    assert_eq!(prompt.system, PromptTemplate::TRANSLATOR_WITH_GLOSSARY);
    assert!(prompt.user.contains(SEPARATOR));
    assert!(prompt.user.contains("Machine learning is a technique."));
}

#[tokio::test]
async fn test_translate_withMissingSeparator_shouldReturnWholeContent() {
    let provider = Arc::new(MockProvider::working("只有译文，没有词汇表"));
    let service = test_service(&provider);

    let result = service.translate("Only a translation", true).await.unwrap();

    assert_eq!(result.translated_text, "只有译文，没有词汇表");
    assert!(result.glossary.is_empty());
}

#[tokio::test]
async fn test_translate_withEmptyText_shouldSkipUpstream() {
    let provider = Arc::new(MockProvider::working("unused"));
    let service = test_service(&provider);

    let result = service.translate("   ", true).await.unwrap();

    assert!(result.translated_text.is_empty());
    assert!(result.glossary.is_empty());
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translate_withFailingProvider_shouldReturnProviderError() {
    let provider = Arc::new(MockProvider::failing());
    let service = test_service(&provider);

    let err = service.translate("Hello", false).await.unwrap_err();

    assert!(matches!(
        err,
        TranslationError::Provider(ProviderError::ApiError { status_code: 500, .. })
    ));
}

#[tokio::test]
async fn test_translateStream_withMarkerInsideFragment_shouldSplitEvents() {
    let provider = Arc::new(MockProvider::fragments([
        "你好",
        "世界==Te",
        r#"rms==[{"english":"a","#,
        r#""chinese":"b","explanation":"c"}]"#,
    ]));
    let service = test_service(&provider);

    let events = collect_events(service.translate_stream("Hello world", true)).await;

    assert_eq!(joined_chunks(&events, SegmentKind::Translation), "你好世界");
    assert_eq!(
        joined_chunks(&events, SegmentKind::Glossary),
        r#"[{"english":"a","chinese":"b","explanation":"c"}]"#
    );
    assert_eq!(
        events.last(),
        Some(&StreamEvent::Complete {
            final_text: Some("你好世界".to_string()),
            glossary: Some(vec![GlossaryTerm::new("a", "b", "c")]),
        })
    );
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

#[tokio::test]
async fn test_translateStream_withoutGlossary_shouldRelayWholeText() {
    let text = "这是一段足够长的译文，用来确认在结束之前就会有内容被转发出去。";
    let provider = Arc::new(MockProvider::working(text));
    let service = test_service(&provider);

    let events = collect_events(service.translate_stream("Some text", false)).await;

    assert_eq!(joined_chunks(&events, SegmentKind::Translation), text);
    assert!(events.len() > 2);
    assert!(matches!(
        events.last(),
        Some(StreamEvent::Complete { final_text: Some(t), glossary: None }) if t == text
    ));
}

#[tokio::test]
async fn test_translateStream_withEmptyText_shouldCompleteWithoutUpstream() {
    let provider = Arc::new(MockProvider::working("unused"));
    let service = test_service(&provider);

    let events = collect_events(service.translate_stream("", true)).await;

    assert_eq!(
        events,
        vec![StreamEvent::Complete {
            final_text: Some(String::new()),
            glossary: None,
        }]
    );
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translateStream_withFailingProvider_shouldEmitSingleError() {
    let provider = Arc::new(MockProvider::failing());
    let service = test_service(&provider);

    let events = collect_events(service.translate_stream("Hello", true)).await;

    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], StreamEvent::Error { message } if message.contains("Mock provider failure")));
}

#[tokio::test]
async fn test_translateStream_withBrokenStream_shouldEndWithError() {
    let provider = Arc::new(MockProvider::broken_stream(["部分译文", "还在继续输出更多的内容而且足够长"]));
    let service = test_service(&provider);

    let events = collect_events(service.translate_stream("Hello", false)).await;

    assert!(matches!(
        events.last(),
        Some(StreamEvent::Error { message }) if message.contains("connection reset")
    ));
    assert!(!events.iter().any(|e| matches!(e, StreamEvent::Complete { .. })));
}

#[tokio::test]
async fn test_translateStream_shouldNotCallUpstreamUntilPolled() {
    let provider = Arc::new(MockProvider::working("你好"));
    let service = test_service(&provider);

    let stream = service.translate_stream("Hello", false);
    assert_eq!(provider.request_count(), 0);

    drop(stream);
    assert_eq!(provider.request_count(), 0);
}
