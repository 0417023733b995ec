/*!
 * Tests for glossary parsing
 */

use proptest::prelude::*;

use glossator::translation::{parse_glossary, split_translation_glossary, GlossaryTerm};

use crate::common;

#[test]
fn test_parse_glossary_withPromptedKeys_shouldMapToTerms() {
    let terms = parse_glossary(r#"[{"english":"a","chinese":"b","explanation":"c"}]"#);

    assert_eq!(terms, vec![GlossaryTerm::new("a", "b", "c")]);
}

#[test]
fn test_parse_glossary_withCanonicalKeys_shouldMapToTerms() {
    let terms = parse_glossary(r#"[{"term":"GPU","translation":"图形处理器","explanation":"并行计算硬件"}]"#);

    assert_eq!(terms, vec![GlossaryTerm::new("GPU", "图形处理器", "并行计算硬件")]);
}

#[test]
fn test_parse_glossary_withSurroundingProse_shouldExtractArray() {
    let raw = format!("\nHere are the terms:\n```json\n{}\n```\nHope this helps!", common::GLOSSARY_JSON);
    let terms = parse_glossary(&raw);

    assert_eq!(terms.len(), 2);
    assert_eq!(terms[0].term, "Machine Learning");
    assert_eq!(terms[1].translation, "神经网络");
}

#[test]
fn test_parse_glossary_withMissingFields_shouldDefaultToEmpty() {
    let terms = parse_glossary(r#"[{"english":"API"}]"#);

    assert_eq!(terms, vec![GlossaryTerm::new("API", "", "")]);
}

#[test]
fn test_parse_glossary_withEmptyArray_shouldReturnNoTerms() {
    assert!(parse_glossary("  [] ").is_empty());
}

#[test]
fn test_parse_glossary_withGarbage_shouldReturnSentinel() {
    for raw in ["", "no json here", "[not, valid", "] backwards [", "[{\"english\": 1}]"] {
        assert_eq!(parse_glossary(raw), vec![GlossaryTerm::unknown()], "input {:?}", raw);
    }
}

#[test]
fn test_unknown_shouldCarryFixedValues() {
    let unknown = GlossaryTerm::unknown();

    assert_eq!(unknown.term, "Unknown");
    assert_eq!(unknown.translation, "未知");
    assert_eq!(unknown.explanation, "extraction failed");
}

#[test]
fn test_split_translation_glossary_withSeparator_shouldSplitOnFirst() {
    let content = r#"Hi.==SEP==[{"english":"a","chinese":"b","explanation":"c"}]"#;
    let (translation, raw) = split_translation_glossary(content, "==SEP==").unwrap();

    assert_eq!(translation, "Hi.");
    assert_eq!(parse_glossary(raw), vec![GlossaryTerm::new("a", "b", "c")]);

    let (first, rest) = split_translation_glossary(" x ==SEP== y ==SEP== z", "==SEP==").unwrap();
    assert_eq!(first, "x");
    assert_eq!(rest, " y ==SEP== z");
}

#[test]
fn test_split_translation_glossary_withoutSeparator_shouldReturnNone() {
    assert!(split_translation_glossary("只有译文", "==Terms==").is_none());
    assert!(split_translation_glossary("anything", "").is_none());
}

proptest! {
    #[test]
    fn prop_parse_glossary_roundTrip(
        entries in prop::collection::vec(("[a-zA-Z ]{0,12}", "[中文词汇]{0,6}", "\\PC{0,20}"), 0..6)
    ) {
        let terms: Vec<GlossaryTerm> = entries
            .into_iter()
            .map(|(t, c, e)| GlossaryTerm::new(t, c, e))
            .collect();
        let raw = serde_json::to_string(&terms).unwrap();

        prop_assert_eq!(parse_glossary(&raw), terms);
    }

    #[test]
    fn prop_parse_glossary_neverPanics(raw in ".{0,80}") {
        let terms = parse_glossary(&raw);
        // Empty only when the input really held an empty array
        prop_assert!(!terms.is_empty() || raw.contains('['));
    }
}
