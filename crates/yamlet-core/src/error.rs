//! Error types for parsing, emission, and serialization.

use std::fmt;
use thiserror::Error;

/// A malformed document or an ill-nested event sequence, reported by the
/// scanner or the document builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralError {
    /// What went wrong.
    pub reason: String,
    /// The production being parsed when it went wrong, e.g. "block mapping".
    pub context: String,
    /// 1-based source line, when the failure site is known.
    pub line: Option<usize>,
}

impl StructuralError {
    pub fn new(
        reason: impl Into<String>,
        context: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        StructuralError {
            reason: reason.into(),
            context: context.into(),
            line,
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, while parsing a {}", self.reason, self.context)?;
        if let Some(line) = self.line {
            write!(f, ", on line {line}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StructuralError {}

/// Errors that can occur while parsing, emitting, or serializing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input text or an ill-nested event stream.
    #[error("{0}")]
    Structural(#[from] StructuralError),

    /// An event was emitted in a state where only a value-producing event
    /// is legal.
    #[error("expected SCALAR, SEQUENCE-START, MAPPING-START, or ALIAS")]
    Emitter,

    /// The serializer gave up on a pathological value tree.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Passthrough from the filesystem helpers.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout yamlet-core.
pub type Result<T> = std::result::Result<T, Error>;
