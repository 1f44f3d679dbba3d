//! Event-driven document construction.
//!
//! The builder is a push-down automaton: each open container is an explicit
//! frame on an owned stack, and the top frame is the single place a newly
//! completed value is delivered. No recursion tracks the event stream's
//! nesting, so depth is bounded only by memory.

use std::collections::HashMap;

use crate::error::{Result, StructuralError};
use crate::event::{Event, TAG_STR};
use crate::scalar::resolve;
use crate::scanner::stream_parse;
use crate::value::Value;

/// Post-processing hooks keyed by explicit tag. When a tagged value is
/// completed, the matching handler replaces it before delivery; untagged
/// values and unknown tags pass through unchanged. The table is read-only
/// during a build and can be shared between calls.
pub type TagHandlers = HashMap<String, Box<dyn Fn(Value) -> Value + Send + Sync>>;

enum Frame {
    Document {
        root: Option<Value>,
    },
    Sequence {
        items: Vec<Value>,
        tag: Option<String>,
    },
    /// One frame serves both halves of a mapping entry: `pending_key` is
    /// empty while a key is awaited and holds the coerced key text while
    /// its value is awaited.
    Mapping {
        entries: Vec<(String, Value)>,
        pending_key: Option<String>,
        tag: Option<String>,
    },
}

/// Consumes one event at a time and accumulates completed documents.
///
/// ```
/// use yamlet_core::{DocumentBuilder, Event, Value};
///
/// let mut builder = DocumentBuilder::new();
/// for event in [
///     Event::StreamStart,
///     Event::DocumentStart,
///     Event::scalar("42"),
///     Event::DocumentEnd,
///     Event::StreamEnd,
/// ] {
///     builder.on_event(event).unwrap();
/// }
/// assert_eq!(builder.finish().unwrap(), vec![Value::Int(42)]);
/// ```
pub struct DocumentBuilder<'h> {
    stack: Vec<Frame>,
    documents: Vec<Value>,
    handlers: Option<&'h TagHandlers>,
}

impl Default for DocumentBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h> DocumentBuilder<'h> {
    pub fn new() -> Self {
        DocumentBuilder {
            stack: Vec::new(),
            documents: Vec::new(),
            handlers: None,
        }
    }

    /// A builder that routes tagged values through the given handler table.
    pub fn with_handlers(handlers: &'h TagHandlers) -> Self {
        DocumentBuilder {
            stack: Vec::new(),
            documents: Vec::new(),
            handlers: Some(handlers),
        }
    }

    /// Feed the next event. Any violation of the protocol's nesting or
    /// alternation rules aborts the build; the builder must not be fed
    /// further events after an error.
    pub fn on_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::StreamStart | Event::StreamEnd => Ok(()),
            Event::DocumentStart => {
                if !self.stack.is_empty() {
                    return Err(violation("unexpected start of document", "document"));
                }
                self.stack.push(Frame::Document { root: None });
                Ok(())
            }
            Event::DocumentEnd => match self.stack.pop() {
                Some(Frame::Document { root }) => {
                    self.documents.push(root.unwrap_or(Value::Null));
                    Ok(())
                }
                _ => Err(violation("unexpected end of document", "document")),
            },
            Event::Scalar { value, tag, .. } => {
                let resolved = if tag.as_deref() == Some(TAG_STR) {
                    Value::Str(value)
                } else {
                    resolve(&value)
                };
                let resolved = self.apply_tag(resolved, tag.as_deref());
                self.deliver(resolved)
            }
            // Aliases are not resolved; the reference collapses to null.
            Event::Alias { .. } => self.deliver(Value::Null),
            Event::SequenceStart { tag, .. } => {
                self.expect_value_position("block sequence")?;
                self.stack.push(Frame::Sequence {
                    items: Vec::new(),
                    tag,
                });
                Ok(())
            }
            Event::SequenceEnd => match self.stack.pop() {
                Some(Frame::Sequence { items, tag }) => {
                    let value = self.apply_tag(Value::Seq(items), tag.as_deref());
                    self.deliver(value)
                }
                _ => Err(violation("unexpected end of sequence", "block sequence")),
            },
            Event::MappingStart { tag, .. } => {
                self.expect_value_position("block mapping")?;
                self.stack.push(Frame::Mapping {
                    entries: Vec::new(),
                    pending_key: None,
                    tag,
                });
                Ok(())
            }
            Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Mapping {
                    entries,
                    pending_key,
                    tag,
                }) => {
                    if pending_key.is_some() {
                        return Err(violation("did not find expected value", "block mapping"));
                    }
                    let value = self.apply_tag(Value::Map(entries), tag.as_deref());
                    self.deliver(value)
                }
                _ => Err(violation("unexpected end of mapping", "block mapping")),
            },
        }
    }

    /// Close out the build. Fails if any document or container is still
    /// open, which means the stream ended mid-structure.
    pub fn finish(self) -> Result<Vec<Value>> {
        if !self.stack.is_empty() {
            return Err(violation("unexpected end of stream", "document"));
        }
        Ok(self.documents)
    }

    /// Hand a completed value to the current frame.
    fn deliver(&mut self, value: Value) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Document { root }) => {
                if root.is_some() {
                    return Err(violation("found a second document root", "document"));
                }
                *root = Some(value);
                Ok(())
            }
            Some(Frame::Sequence { items, .. }) => {
                items.push(value);
                Ok(())
            }
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => {
                match pending_key.take() {
                    None => *pending_key = Some(key_text(&value)),
                    Some(key) => map_insert(entries, key, value),
                }
                Ok(())
            }
            None => Err(violation("found a value outside any document", "document")),
        }
    }

    fn expect_value_position(&self, context: &str) -> Result<()> {
        match self.stack.last() {
            Some(Frame::Document { root: Some(_) }) => {
                Err(violation("found a second document root", context))
            }
            Some(_) => Ok(()),
            None => Err(violation("found a value outside any document", context)),
        }
    }

    fn apply_tag(&self, value: Value, tag: Option<&str>) -> Value {
        match (tag, self.handlers) {
            (Some(tag), Some(handlers)) => match handlers.get(tag) {
                Some(handler) => handler(value),
                None => value,
            },
            _ => value,
        }
    }
}

fn violation(reason: &str, context: &str) -> crate::error::Error {
    StructuralError::new(reason, context, None).into()
}

/// Mapping keys are always text. Text keys pass through; anything else is
/// coerced to its compact rendering, which is lossy and deliberate.
fn key_text(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Insert preserving insertion order; a duplicate key replaces the value in
/// place so the key keeps its original position.
fn map_insert(entries: &mut Vec<(String, Value)>, key: String, value: Value) {
    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        entries.push((key, value));
    }
}

/// Parse structured text into one value per document.
///
/// ```
/// use yamlet_core::{parse, Value};
///
/// let docs = parse("greeting: hello").unwrap();
/// assert_eq!(docs[0].get("greeting"), Some(&Value::Str("hello".to_string())));
/// ```
pub fn parse(input: &str) -> Result<Vec<Value>> {
    let mut builder = DocumentBuilder::new();
    stream_parse(input, |event| builder.on_event(event))?;
    builder.finish()
}

/// Like [`parse`], routing tagged values through the given handler table.
pub fn parse_with(input: &str, handlers: &TagHandlers) -> Result<Vec<Value>> {
    let mut builder = DocumentBuilder::with_handlers(handlers);
    stream_parse(input, |event| builder.on_event(event))?;
    builder.finish()
}
