/*!
 * Prompt templates for English to Chinese translation.
 *
 * Two modes are supported: plain translation, and translation followed by the
 * separator marker and a JSON glossary of key terms.
 */

use crate::providers::ChatPrompt;

/// Prompt builder for translation requests.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Marker requested between the translation and the glossary
    separator: String,
}

impl PromptTemplate {
    /// System prompt for plain translation.
    pub const TRANSLATOR: &'static str = "You are a professional Chinese-English translation assistant. \
Please accurately translate the English text provided by the user into Chinese. \
Return only the translation result, without adding any extra content.";

    /// System prompt for translation with term extraction.
    pub const TRANSLATOR_WITH_GLOSSARY: &'static str = "You are a professional Chinese-English translation assistant \
who is also skilled at extracting technical terms.";

    /// User prompt for translation with term extraction.
    /// Placeholders: {separator}, {text}
    pub const GLOSSARY_REQUEST: &'static str = r#"Please complete the following tasks:
1. Accurately translate the following English text into Chinese.
2. Extract 3-5 of the most important technical terms or key concepts from both the English text and its translation.
3. Return format: First provide the Chinese translation, then add the special marker '{separator}', followed by a JSON-formatted list of the extracted terms.

English Text:{text}

Example of vocabulary in JSON format:
[{
    "english": "Machine Learning",
    "chinese": "机器学习",
    "explanation": "计算机通过数据自动学习而不依赖明确编程的技术"
}]
Please strictly follow the above format when returning the result, and do not add any extra explanations"#;

    /// Create a new prompt template using the given separator.
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// The separator the glossary prompt asks for
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Build the chat prompt for a text.
    pub fn build(&self, text: &str, include_glossary: bool) -> ChatPrompt {
        if include_glossary {
            let user = Self::GLOSSARY_REQUEST
                .replace("{separator}", &self.separator)
                .replace("{text}", text);
            ChatPrompt::new(Self::TRANSLATOR_WITH_GLOSSARY, user)
        } else {
            ChatPrompt::new(Self::TRANSLATOR, text)
        }
    }
}
