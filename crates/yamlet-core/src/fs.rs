//! Filesystem helpers layered over `parse` and `stringify`.
//!
//! Thin synchronous shims: read the whole file, run the codec, and let IO
//! errors pass through untouched.

use std::path::Path;

use crate::builder::{parse, parse_with, TagHandlers};
use crate::error::Result;
use crate::serializer::stringify;
use crate::value::Value;

/// Read and parse a file, one value per document.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

/// Like [`read_file`], routing tagged values through the handler table.
pub fn read_file_with(path: impl AsRef<Path>, handlers: &TagHandlers) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)?;
    parse_with(&text, handlers)
}

/// Serialize values and write them to a file, one document per value.
pub fn write_file(path: impl AsRef<Path>, values: &[Value]) -> Result<()> {
    let text = stringify(values)?;
    std::fs::write(path, text)?;
    Ok(())
}
