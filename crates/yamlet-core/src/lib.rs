//! # yamlet-core
//!
//! Event-driven codec for a YAML-subset document format: load structured
//! text into typed value trees, and serialize value trees back to text.
//!
//! The pipeline is symmetric around a small event protocol. Loading runs
//! the scanner's events through a push-down [`DocumentBuilder`]; dumping
//! walks the tree through a validating [`Emitter`] into the text
//! [`TextComposer`]. Plain scalars are typed by the [`resolve`] cascade
//! (null, booleans, integers, floats, timestamps, base-60 times).
//!
//! ## Quick start
//!
//! ```rust
//! use yamlet_core::{parse, stringify, Value};
//!
//! let docs = parse("name: Alice\nscores:\n  - 95\n  - 87").unwrap();
//! assert_eq!(docs[0].get("name"), Some(&Value::Str("Alice".to_string())));
//! assert_eq!(
//!     docs[0].get("scores"),
//!     Some(&Value::Seq(vec![Value::Int(95), Value::Int(87)]))
//! );
//!
//! let text = stringify(&docs).unwrap();
//! assert_eq!(parse(&text).unwrap(), docs);
//! ```
//!
//! ## Modules
//!
//! - [`scalar`] — implicit typing for plain scalar text
//! - [`event`] — the streaming event vocabulary
//! - [`builder`] — events → documents, with per-tag hooks
//! - [`serializer`] — value trees → events
//! - [`emitter`] — validated, scoped event emission
//! - [`scanner`] / [`composer`] — the bundled text engine
//! - [`value`] — the document value model
//! - [`error`] — error types
//! - [`fs`] — file read/write helpers

pub mod builder;
pub mod composer;
pub mod emitter;
pub mod error;
pub mod event;
pub mod fs;
pub mod scalar;
pub mod scanner;
pub mod serializer;
pub mod value;

pub use builder::{parse, parse_with, DocumentBuilder, TagHandlers};
pub use composer::TextComposer;
pub use emitter::Emitter;
pub use error::{Error, Result, StructuralError};
pub use event::{Event, EventSink, TAG_STR};
pub use fs::{read_file, read_file_with, write_file};
pub use scalar::resolve;
pub use scanner::stream_parse;
pub use serializer::{serialize, stringify};
pub use value::Value;
