//! Default engine, emit side: renders events as block-style text.
//!
//! The composer receives the raw event stream and pushes rendered chunks
//! through a caller-supplied callback, one line at a time. Container
//! headers are deferred until the first child arrives so that empty
//! containers can fall back to the inline `[]` / `{}` forms.

use crate::error::{Error, Result};
use crate::event::{Event, EventSink, TAG_STR};
use crate::scalar::resolve;
use crate::value::Value;

enum Header {
    /// Introduces a document root container: `---` alone, or `--- []` when
    /// the container turns out empty.
    Root,
    /// Introduces a container-valued mapping entry: `key:` or `key: []`.
    Key { indent: usize, key: String },
    /// Introduces a container sequence item: `-` or `- []`.
    Dash { indent: usize },
}

enum Ctx {
    Document {
        root_rendered: bool,
    },
    Sequence {
        indent: usize,
        header: Option<Header>,
    },
    Mapping {
        indent: usize,
        header: Option<Header>,
        pending_key: Option<String>,
    },
}

/// Renders events as text through a chunk callback.
///
/// ```
/// use yamlet_core::{Event, EventSink, TextComposer};
///
/// let mut out = String::new();
/// {
///     let mut composer = TextComposer::new(|chunk: &str| out.push_str(chunk));
///     for event in [
///         Event::StreamStart,
///         Event::DocumentStart,
///         Event::scalar("foo"),
///         Event::DocumentEnd,
///         Event::StreamEnd,
///     ] {
///         composer.event(&event).unwrap();
///     }
/// }
/// assert_eq!(out, "--- foo\n...\n");
/// ```
pub struct TextComposer<F> {
    out: F,
    stack: Vec<Ctx>,
}

impl<F: FnMut(&str)> TextComposer<F> {
    /// `on_data` receives each rendered chunk in order.
    pub fn new(on_data: F) -> Self {
        TextComposer {
            out: on_data,
            stack: Vec::new(),
        }
    }

    fn emit(&mut self, chunk: &str) {
        (self.out)(chunk);
    }

    fn handle(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::StreamStart | Event::StreamEnd => Ok(()),
            Event::DocumentStart => {
                self.stack.push(Ctx::Document {
                    root_rendered: false,
                });
                Ok(())
            }
            Event::DocumentEnd => match self.stack.pop() {
                Some(Ctx::Document { root_rendered }) => {
                    if !root_rendered {
                        self.emit("---\n");
                    }
                    self.emit("...\n");
                    Ok(())
                }
                _ => Err(Error::Emitter),
            },
            Event::Scalar { value, tag, .. } => {
                let text = render_scalar(value, tag.as_deref());
                self.leaf(&text)
            }
            Event::Alias { anchor } => {
                let text = format!("*{anchor}");
                self.leaf(&text)
            }
            Event::SequenceStart { .. } => self.container_start(false),
            Event::SequenceEnd => self.container_end(false),
            Event::MappingStart { .. } => self.container_start(true),
            Event::MappingEnd => self.container_end(true),
        }
    }

    /// Place one rendered leaf token in the current position.
    fn leaf(&mut self, text: &str) -> Result<()> {
        self.open_parent();
        match self.stack.last_mut() {
            Some(Ctx::Document { root_rendered }) => {
                if *root_rendered {
                    return Err(Error::Emitter);
                }
                *root_rendered = true;
                let line = format!("--- {text}\n");
                self.emit(&line);
                Ok(())
            }
            Some(Ctx::Sequence { indent, .. }) => {
                let line = format!("{}- {text}\n", pad(*indent));
                self.emit(&line);
                Ok(())
            }
            Some(Ctx::Mapping {
                indent,
                pending_key,
                ..
            }) => {
                match pending_key.take() {
                    None => {
                        *pending_key = Some(text.to_string());
                    }
                    Some(key) => {
                        let line = format!("{}{key}: {text}\n", pad(*indent));
                        self.emit(&line);
                    }
                }
                Ok(())
            }
            None => Err(Error::Emitter),
        }
    }

    /// Open a child container: the parent's header becomes definite, the
    /// child's own header stays deferred until its first child.
    fn container_start(&mut self, mapping: bool) -> Result<()> {
        self.open_parent();
        let (header, indent) = match self.stack.last_mut() {
            Some(Ctx::Document { root_rendered }) => {
                if *root_rendered {
                    return Err(Error::Emitter);
                }
                *root_rendered = true;
                (Header::Root, 0)
            }
            Some(Ctx::Sequence { indent, .. }) => (Header::Dash { indent: *indent }, *indent + 1),
            Some(Ctx::Mapping {
                indent,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => (
                    Header::Key {
                        indent: *indent,
                        key,
                    },
                    *indent + 1,
                ),
                None => {
                    return Err(Error::Serialization(
                        "container mapping keys are not representable in block style".to_string(),
                    ))
                }
            },
            None => return Err(Error::Emitter),
        };
        if mapping {
            self.stack.push(Ctx::Mapping {
                indent,
                header: Some(header),
                pending_key: None,
            });
        } else {
            self.stack.push(Ctx::Sequence {
                indent,
                header: Some(header),
            });
        }
        Ok(())
    }

    /// Close the top container. A never-opened header means the container
    /// was empty and renders in the inline flow form instead.
    fn container_end(&mut self, mapping: bool) -> Result<()> {
        let empty = if mapping { "{}" } else { "[]" };
        let header = match self.stack.pop() {
            Some(Ctx::Sequence { header, .. }) if !mapping => header,
            Some(Ctx::Mapping { header, .. }) if mapping => header,
            _ => return Err(Error::Emitter),
        };
        if let Some(header) = header {
            let line = match header {
                Header::Root => format!("--- {empty}\n"),
                Header::Key { indent, key } => format!("{}{key}: {empty}\n", pad(indent)),
                Header::Dash { indent } => format!("{}- {empty}\n", pad(indent)),
            };
            self.emit(&line);
        }
        Ok(())
    }

    /// Write the pending header of the top container, if any. Only the top
    /// of the stack can be unopened: starting a child always opens its
    /// parent first.
    fn open_parent(&mut self) {
        let line = match self.stack.last_mut() {
            Some(Ctx::Sequence { header, .. }) | Some(Ctx::Mapping { header, .. }) => {
                match header.take() {
                    Some(Header::Root) => Some("---\n".to_string()),
                    Some(Header::Key { indent, key }) => Some(format!("{}{key}:\n", pad(indent))),
                    Some(Header::Dash { indent }) => Some(format!("{}-\n", pad(indent))),
                    None => None,
                }
            }
            _ => None,
        };
        if let Some(line) = line {
            self.emit(&line);
        }
    }
}

impl<F: FnMut(&str)> EventSink for TextComposer<F> {
    fn event(&mut self, event: &Event) -> Result<()> {
        self.handle(event)
    }
}

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

/// Render a scalar token. Scalars tagged as literal text are quoted when a
/// plain rendering would read back as a different type or collide with the
/// block syntax; everything else is written verbatim.
fn render_scalar(value: &str, tag: Option<&str>) -> String {
    if tag == Some(TAG_STR) && needs_quoting(value) {
        quote(value)
    } else {
        value.to_string()
    }
}

fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s != s.trim() {
        return true;
    }
    if !matches!(resolve(s), Value::Str(_)) {
        return true;
    }
    if s.contains(": ") || s.ends_with(':') || s.contains(" #") {
        return true;
    }
    if s.chars().any(|c| c.is_control()) {
        return true;
    }
    let first = s.chars().next().unwrap_or(' ');
    "-?:,[]{}#&*!|>'\"%@`".contains(first)
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
