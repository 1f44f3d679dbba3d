//! Scoped event emission toward an engine.
//!
//! [`Emitter`] wraps an [`EventSink`] and validates outgoing events against
//! a scope stack, so a malformed producer fails fast instead of writing
//! half a document. The scoped combinators pair every start with its end on
//! every exit path, including error propagation out of the block.

use crate::error::{Error, Result};
use crate::event::{Event, EventSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Stream,
    Document { root_done: bool },
    Sequence,
    /// The next value completes a key.
    MappingKey,
    /// The next value completes the pending key's value.
    MappingValue,
}

/// Validating event emitter over an arbitrary sink.
///
/// ```
/// use yamlet_core::{Emitter, TextComposer};
///
/// let mut out = String::new();
/// {
///     let composer = TextComposer::new(|chunk: &str| out.push_str(chunk));
///     let mut e = Emitter::new(composer);
///     e.stream(|e| e.document(|e| e.scalar("foo"))).unwrap();
/// }
/// assert_eq!(out, "--- foo\n...\n");
/// ```
pub struct Emitter<S> {
    sink: S,
    scopes: Vec<Scope>,
}

impl<S: EventSink> Emitter<S> {
    pub fn new(sink: S) -> Self {
        Emitter {
            sink,
            scopes: Vec::new(),
        }
    }

    /// Consume the emitter, returning the sink.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// The single funnel every emission passes through: validate against
    /// the scope stack, then forward to the sink.
    pub fn event(&mut self, event: Event) -> Result<()> {
        self.transition(&event)?;
        self.sink.event(&event)
    }

    pub fn stream_start(&mut self) -> Result<()> {
        self.event(Event::StreamStart)
    }

    pub fn stream_end(&mut self) -> Result<()> {
        self.event(Event::StreamEnd)
    }

    pub fn document_start(&mut self) -> Result<()> {
        self.event(Event::DocumentStart)
    }

    pub fn document_end(&mut self) -> Result<()> {
        self.event(Event::DocumentEnd)
    }

    pub fn sequence_start(&mut self) -> Result<()> {
        self.event(Event::sequence_start())
    }

    pub fn sequence_end(&mut self) -> Result<()> {
        self.event(Event::SequenceEnd)
    }

    pub fn mapping_start(&mut self) -> Result<()> {
        self.event(Event::mapping_start())
    }

    pub fn mapping_end(&mut self) -> Result<()> {
        self.event(Event::MappingEnd)
    }

    pub fn scalar(&mut self, value: impl Into<String>) -> Result<()> {
        self.event(Event::scalar(value))
    }

    pub fn tagged_scalar(&mut self, value: impl Into<String>, tag: impl Into<String>) -> Result<()> {
        self.event(Event::Scalar {
            value: value.into(),
            anchor: None,
            tag: Some(tag.into()),
        })
    }

    pub fn alias(&mut self, anchor: impl Into<String>) -> Result<()> {
        self.event(Event::Alias {
            anchor: anchor.into(),
        })
    }

    /// Run `block` between stream start and end. The end event is emitted
    /// whether or not the block succeeds; the block's error wins.
    pub fn stream<T>(&mut self, block: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.stream_start()?;
        let result = block(self);
        let end = self.stream_end();
        match result {
            Ok(value) => end.map(|_| value),
            Err(err) => Err(err),
        }
    }

    /// Run `block` between document start and end; see [`Emitter::stream`].
    pub fn document<T>(&mut self, block: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.document_start()?;
        let result = block(self);
        let end = self.document_end();
        match result {
            Ok(value) => end.map(|_| value),
            Err(err) => Err(err),
        }
    }

    /// Run `block` between sequence start and end; see [`Emitter::stream`].
    pub fn sequence<T>(&mut self, block: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.sequence_start()?;
        let result = block(self);
        let end = self.sequence_end();
        match result {
            Ok(value) => end.map(|_| value),
            Err(err) => Err(err),
        }
    }

    /// Run `block` between mapping start and end; see [`Emitter::stream`].
    pub fn mapping<T>(&mut self, block: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.mapping_start()?;
        let result = block(self);
        let end = self.mapping_end();
        match result {
            Ok(value) => end.map(|_| value),
            Err(err) => Err(err),
        }
    }

    fn transition(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::StreamStart => {
                if !self.scopes.is_empty() {
                    return Err(Error::Emitter);
                }
                self.scopes.push(Scope::Stream);
                Ok(())
            }
            Event::StreamEnd => match self.scopes.pop() {
                Some(Scope::Stream) => Ok(()),
                _ => Err(Error::Emitter),
            },
            Event::DocumentStart => match self.scopes.last() {
                Some(Scope::Stream) => {
                    self.scopes.push(Scope::Document { root_done: false });
                    Ok(())
                }
                _ => Err(Error::Emitter),
            },
            Event::DocumentEnd => match self.scopes.pop() {
                Some(Scope::Document { .. }) => Ok(()),
                _ => Err(Error::Emitter),
            },
            Event::Scalar { .. } | Event::Alias { .. } => self.value_delivered(),
            Event::SequenceStart { .. } => {
                self.expect_value()?;
                self.scopes.push(Scope::Sequence);
                Ok(())
            }
            Event::SequenceEnd => match self.scopes.pop() {
                Some(Scope::Sequence) => self.value_delivered(),
                _ => Err(Error::Emitter),
            },
            Event::MappingStart { .. } => {
                self.expect_value()?;
                self.scopes.push(Scope::MappingKey);
                Ok(())
            }
            // Closing while a key awaits its value is the same misuse as
            // closing with no mapping open: the only legal next event was a
            // value-producing one.
            Event::MappingEnd => match self.scopes.pop() {
                Some(Scope::MappingKey) => self.value_delivered(),
                _ => Err(Error::Emitter),
            },
        }
    }

    fn expect_value(&self) -> Result<()> {
        match self.scopes.last() {
            Some(Scope::Document { root_done: false })
            | Some(Scope::Sequence)
            | Some(Scope::MappingKey)
            | Some(Scope::MappingValue) => Ok(()),
            _ => Err(Error::Emitter),
        }
    }

    /// A complete value just landed in the current scope: fill the document
    /// root, extend the sequence, or flip the mapping between halves.
    fn value_delivered(&mut self) -> Result<()> {
        let Some(scope) = self.scopes.last_mut() else {
            return Err(Error::Emitter);
        };
        match *scope {
            Scope::Document { root_done } => {
                if root_done {
                    return Err(Error::Emitter);
                }
                *scope = Scope::Document { root_done: true };
                Ok(())
            }
            Scope::Sequence => Ok(()),
            Scope::MappingKey => {
                *scope = Scope::MappingValue;
                Ok(())
            }
            Scope::MappingValue => {
                *scope = Scope::MappingKey;
                Ok(())
            }
            Scope::Stream => Err(Error::Emitter),
        }
    }
}
