/*!
 * Incremental splitting of a streamed model reply.
 *
 * The model answers with `<translation><separator><glossary JSON>`, delivered as
 * arbitrary fragments. The demultiplexer turns those fragments into typed
 * events as they arrive. Translation text is held back only while it could
 * still be the beginning of the separator.
 */

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::glossary::{parse_glossary, GlossaryTerm};

/// Which part of the reply a chunk belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Translation,
    Glossary,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Translation => "translation",
            SegmentKind::Glossary => "glossary",
        }
    }
}

/// Event produced while streaming a translation
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A piece of the translation or of the raw glossary text
    Chunk { kind: SegmentKind, text: String },
    /// The reply is complete
    Complete {
        final_text: Option<String>,
        glossary: Option<Vec<GlossaryTerm>>,
    },
    /// The reply failed; nothing follows
    Error { message: String },
}

impl StreamEvent {
    pub fn translation(text: impl Into<String>) -> Self {
        Self::Chunk {
            kind: SegmentKind::Translation,
            text: text.into(),
        }
    }

    pub fn glossary(text: impl Into<String>) -> Self {
        Self::Chunk {
            kind: SegmentKind::Glossary,
            text: text.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Whether the sequence ends with this event
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Complete { .. } | StreamEvent::Error { .. })
    }
}

// Wire form: {"type":"chunk","translation":"…"}, {"type":"complete","done":true,…},
// {"type":"error","error":"…"}
impl Serialize for StreamEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            StreamEvent::Chunk { kind, text } => {
                map.serialize_entry("type", "chunk")?;
                map.serialize_entry(kind.as_str(), text)?;
            }
            StreamEvent::Complete { final_text, glossary } => {
                map.serialize_entry("type", "complete")?;
                map.serialize_entry("done", &true)?;
                if let Some(text) = final_text {
                    map.serialize_entry("translation", text)?;
                }
                if let Some(terms) = glossary {
                    map.serialize_entry("glossary", terms)?;
                }
            }
            StreamEvent::Error { message } => {
                map.serialize_entry("type", "error")?;
                map.serialize_entry("error", message)?;
            }
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemuxState {
    /// Separator not seen yet
    Seeking,
    /// Everything from now on is glossary text
    Found,
}

/// Splits a fragment stream at the first occurrence of a separator marker
#[derive(Debug)]
pub struct StreamDemultiplexer {
    separator: String,
    separator_chars: usize,
    accumulated_raw: String,
    state: DemuxState,
    pending: String,
}

impl StreamDemultiplexer {
    /// Create a demultiplexer for the given separator.
    ///
    /// An empty separator never matches: every fragment is translation text.
    pub fn new(separator: impl Into<String>) -> Self {
        let separator = separator.into();
        let separator_chars = separator.chars().count();
        Self {
            separator,
            separator_chars,
            accumulated_raw: String::new(),
            state: DemuxState::Seeking,
            pending: String::new(),
        }
    }

    /// Everything received so far
    pub fn accumulated_raw(&self) -> &str {
        &self.accumulated_raw
    }

    /// Whether the separator has been seen
    pub fn separator_found(&self) -> bool {
        self.state == DemuxState::Found
    }

    /// Consume one fragment and return the events it releases
    pub fn push(&mut self, fragment: &str) -> Vec<StreamEvent> {
        if fragment.is_empty() {
            return Vec::new();
        }
        self.accumulated_raw.push_str(fragment);

        if self.state == DemuxState::Found {
            return vec![StreamEvent::glossary(fragment)];
        }
        if self.separator.is_empty() {
            return vec![StreamEvent::translation(fragment)];
        }

        self.pending.push_str(fragment);

        if let Some(index) = self.pending.find(&self.separator) {
            let before = self.pending[..index].to_string();
            let after = self.pending[index + self.separator.len()..].to_string();
            self.pending.clear();
            self.state = DemuxState::Found;

            let mut events = Vec::with_capacity(2);
            if !before.is_empty() {
                events.push(StreamEvent::translation(before));
            }
            if !after.is_empty() {
                events.push(StreamEvent::glossary(after));
            }
            return events;
        }

        let pending_chars = self.pending.chars().count();
        if pending_chars < 2 * self.separator_chars {
            return Vec::new();
        }

        // Keep the last `separator_chars - 1` characters: they may start the marker.
        let releasable = pending_chars - (self.separator_chars - 1);
        let flush_chars = fragment.chars().count().min(releasable);
        let split_at = self
            .pending
            .char_indices()
            .nth(flush_chars)
            .map_or(self.pending.len(), |(offset, _)| offset);

        let rest = self.pending.split_off(split_at);
        let flushed = std::mem::replace(&mut self.pending, rest);
        vec![StreamEvent::translation(flushed)]
    }

    /// End of the upstream reply: flush what is held back and complete
    pub fn finish(mut self) -> Vec<StreamEvent> {
        let mut events = Vec::with_capacity(2);
        if self.state == DemuxState::Seeking && !self.pending.is_empty() {
            events.push(StreamEvent::translation(std::mem::take(&mut self.pending)));
        }

        let (final_text, glossary) = if self.state == DemuxState::Found {
            match self.accumulated_raw.split_once(&self.separator) {
                Some((translation, raw_glossary)) => {
                    (translation.trim().to_string(), Some(parse_glossary(raw_glossary)))
                }
                None => (self.accumulated_raw.trim().to_string(), None),
            }
        } else {
            (self.accumulated_raw.trim().to_string(), None)
        };

        events.push(StreamEvent::Complete {
            final_text: Some(final_text),
            glossary,
        });
        events
    }
}
