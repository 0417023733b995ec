/*!
 * Translation service for English to Chinese translation using a chat model.
 *
 * It is split into several submodules:
 *
 * - `core`: Translation service (buffered and streaming paths)
 * - `demux`: Incremental splitting of a streamed reply into translation and glossary
 * - `glossary`: Tolerant parsing of the model's glossary JSON
 * - `prompts`: Prompt templates
 * - `request`: Request and result types
 */

// Re-export main types for easier usage
pub use self::core::{EventStream, TranslationService};
pub use self::demux::{SegmentKind, StreamDemultiplexer, StreamEvent};
pub use self::glossary::{parse_glossary, split_translation_glossary, GlossaryTerm};
pub use self::prompts::PromptTemplate;
pub use self::request::{OutputFormat, TranslationRequest, TranslationResult};

// Submodules
pub mod core;
pub mod demux;
pub mod glossary;
pub mod prompts;
pub mod request;
