/*!
 * # Glossator - English to Chinese translation API
 *
 * An HTTP service that translates English text into Chinese through an
 * OpenAI-compatible chat model and optionally extracts a glossary of key terms.
 *
 * ## Features
 *
 * - Buffered translation with JSON or Word document output
 * - Live streaming translation over server-sent events
 * - Incremental splitting of the model reply into translation and glossary,
 *   independent of how the upstream fragments its output
 * - Tolerant parsing of the glossary JSON
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Translation services:
 *   - `translation::core`: Buffered and streaming translation
 *   - `translation::demux`: Stream demultiplexer
 *   - `translation::glossary`: Glossary parsing
 *   - `translation::prompts`: Prompt templates
 *   - `translation::request`: Request and result types
 * - `providers`: Upstream chat-completion clients:
 *   - `providers::openai`: OpenAI-compatible API client
 *   - `providers::sse`: Server-sent event decoding
 *   - `providers::mock`: Scripted provider
 * - `document`: Word document rendering
 * - `server`: axum HTTP surface
 * - `file_utils`: Download directory utilities
 * - `app_controller`: Composition root and server lifecycle
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod server;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, RenderError, TranslationError};
pub use translation::{GlossaryTerm, StreamEvent, TranslationService};
