//! The streaming event vocabulary shared between the scanner, the document
//! builder, the emitter, and the text composer.
//!
//! Structure is represented by start/end event pairs; scalars and aliases
//! are leaves. Any value-producing event may carry an anchor, and scalar
//! and container starts may carry an explicit tag.

use crate::error::Result;

/// Canonical tag marking a scalar as literal text, exempt from implicit
/// typing. Quoted scalars carry it on the way in; the serializer attaches
/// it to text values on the way out so the composer can quote them when a
/// plain rendering would read back as a different type.
pub const TAG_STR: &str = "tag:yaml.org,2002:str";

/// One atomic step of the streaming protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    /// Reference to a previously anchored value.
    Alias { anchor: String },
    /// A leaf value, textual at this level; typing happens downstream.
    Scalar {
        value: String,
        anchor: Option<String>,
        tag: Option<String>,
    },
    SequenceStart {
        anchor: Option<String>,
        tag: Option<String>,
    },
    SequenceEnd,
    MappingStart {
        anchor: Option<String>,
        tag: Option<String>,
    },
    MappingEnd,
}

impl Event {
    /// A plain scalar event with no anchor or tag.
    pub fn scalar(value: impl Into<String>) -> Event {
        Event::Scalar {
            value: value.into(),
            anchor: None,
            tag: None,
        }
    }

    /// A sequence start with no anchor or tag.
    pub fn sequence_start() -> Event {
        Event::SequenceStart {
            anchor: None,
            tag: None,
        }
    }

    /// A mapping start with no anchor or tag.
    pub fn mapping_start() -> Event {
        Event::MappingStart {
            anchor: None,
            tag: None,
        }
    }

    /// Whether this event may appear where a value is expected: a document
    /// root, a sequence element, or a mapping key or value.
    pub fn is_value_start(&self) -> bool {
        matches!(
            self,
            Event::Scalar { .. }
                | Event::Alias { .. }
                | Event::SequenceStart { .. }
                | Event::MappingStart { .. }
        )
    }
}

/// The seam through which emitted events reach an engine. The bundled
/// [`TextComposer`](crate::composer::TextComposer) renders them as text;
/// tests substitute sinks that record the stream.
pub trait EventSink {
    fn event(&mut self, event: &Event) -> Result<()>;
}
