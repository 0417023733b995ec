/*!
 * Decoding of the upstream server-sent event stream.
 *
 * The upstream sends newline-delimited `data: <json>` frames and finishes with
 * `data: [DONE]`. Network reads carry no framing guarantees, so lines (and
 * multi-byte characters) may be split across reads.
 */

use async_stream::stream;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use log::{debug, warn};
use serde::Deserialize;
use std::fmt::Display;

use super::FragmentStream;
use crate::errors::ProviderError;

/// Terminal marker payload
pub const DONE_MARKER: &str = "[DONE]";

const DATA_PREFIX: &str = "data:";

/// One decoded upstream line
#[derive(Debug, Clone, PartialEq)]
pub enum SseFrame {
    /// Non-empty content delta
    Content(String),
    /// End of the completion
    Done,
    /// Nothing to forward (blank line, comment, empty delta, malformed frame)
    Skip,
}

#[derive(Debug, Deserialize)]
struct ChunkEnvelope {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Splits a byte stream into complete lines
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every line completed by them
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line[..line.len() - 1]).into_owned());
        }
        lines
    }

    /// Return the unterminated trailing line, if any
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

/// Interpret a single line of the upstream stream
pub fn parse_frame(line: &str) -> SseFrame {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() || line.starts_with(':') {
        return SseFrame::Skip;
    }

    let payload = match line.strip_prefix(DATA_PREFIX) {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    };

    if payload.trim() == DONE_MARKER {
        return SseFrame::Done;
    }

    match serde_json::from_str::<ChunkEnvelope>(payload) {
        Ok(envelope) => envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .filter(|content| !content.is_empty())
            .map_or(SseFrame::Skip, SseFrame::Content),
        Err(e) => {
            warn!("Unable to parse upstream stream line ({}): {}", e, payload);
            SseFrame::Skip
        }
    }
}

/// Adapt an upstream byte stream into a stream of content fragments
///
/// The returned stream ends after `[DONE]`; bytes after the marker are not read.
pub fn fragment_stream<S, E>(bytes: S) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let stream = stream! {
        let mut bytes = Box::pin(bytes);
        let mut decoder = SseLineDecoder::new();
        let mut done = false;

        while !done {
            let chunk = match bytes.next().await {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    yield Err(ProviderError::ConnectionError(e.to_string()));
                    return;
                }
                None => break,
            };

            for line in decoder.feed(&chunk) {
                match parse_frame(&line) {
                    SseFrame::Content(text) => {
                        yield Ok::<String, ProviderError>(text);
                    }
                    SseFrame::Done => {
                        done = true;
                        break;
                    }
                    SseFrame::Skip => {}
                }
            }
        }

        if !done {
            if let Some(line) = decoder.finish() {
                match parse_frame(&line) {
                    SseFrame::Content(text) => {
                        yield Ok(text);
                    }
                    SseFrame::Done => done = true,
                    SseFrame::Skip => {}
                }
            }
        }

        if done {
            debug!("Upstream stream finished with {}", DONE_MARKER);
        } else {
            warn!("Upstream stream ended without {}", DONE_MARKER);
        }
    };

    Box::pin(stream)
}
