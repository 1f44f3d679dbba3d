//! Value-tree serialization through the emitter.
//!
//! The inverse of the document builder: walk an owned value tree and drive
//! the emitter's scoped combinators. Ownership makes the tree acyclic, so
//! the only runaway-structure risk left is sheer depth, which is bounded
//! explicitly rather than by the thread's stack.

use crate::composer::TextComposer;
use crate::emitter::Emitter;
use crate::error::{Error, Result};
use crate::event::{EventSink, TAG_STR};
use crate::value::{float_text, timestamp_text, Value};

const MAX_DEPTH: usize = 512;

/// Serialize one value as a document body through the emitter. The caller
/// owns the surrounding stream/document scope.
pub fn serialize<S: EventSink>(value: &Value, emitter: &mut Emitter<S>) -> Result<()> {
    serialize_node(value, emitter, 0)
}

fn serialize_node<S: EventSink>(value: &Value, e: &mut Emitter<S>, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::Serialization(format!(
            "value tree exceeds the maximum nesting depth of {MAX_DEPTH}"
        )));
    }
    match value {
        Value::Null => e.scalar("~"),
        Value::Bool(true) => e.scalar("true"),
        Value::Bool(false) => e.scalar("false"),
        Value::Int(i) => e.scalar(i.to_string()),
        Value::Float(f) => e.scalar(float_text(*f)),
        Value::Timestamp(t) => e.scalar(timestamp_text(t)),
        Value::Str(s) => e.tagged_scalar(s.clone(), TAG_STR),
        Value::Seq(items) => e.sequence(|e| {
            for item in items {
                serialize_node(item, e, depth + 1)?;
            }
            Ok(())
        }),
        Value::Map(entries) => e.mapping(|e| {
            for (key, val) in entries {
                e.tagged_scalar(key.clone(), TAG_STR)?;
                serialize_node(val, e, depth + 1)?;
            }
            Ok(())
        }),
    }
}

/// Render values as text, one document per value.
///
/// ```
/// use yamlet_core::{stringify, Value};
///
/// let text = stringify(&[Value::Str("foo".to_string())]).unwrap();
/// assert_eq!(text, "--- foo\n...\n");
/// ```
pub fn stringify(values: &[Value]) -> Result<String> {
    let mut out = String::new();
    {
        let composer = TextComposer::new(|chunk: &str| out.push_str(chunk));
        let mut emitter = Emitter::new(composer);
        emitter.stream(|e| {
            for value in values {
                e.document(|e| serialize(value, e))?;
            }
            Ok(())
        })?;
    }
    Ok(out)
}
