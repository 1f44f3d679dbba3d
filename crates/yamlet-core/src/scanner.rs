//! Default engine, parse side: block-style text to events.
//!
//! A line-oriented scanner over the indentation-based block syntax. Lines
//! are split and comment-stripped up front; the recursive descent then
//! walks them by indent, pushing events to the caller's handler as it goes.
//! Only the block forms the composer writes are accepted, plus quoted
//! scalars, anchors, tags, aliases, and the empty flow collections.

use crate::error::{Result, StructuralError};
use crate::event::{Event, TAG_STR};

/// Parse input text, pushing each event to `handler` in stream order.
///
/// ```
/// use yamlet_core::{stream_parse, Event};
///
/// let mut kinds = Vec::new();
/// stream_parse("foo", |event| {
///     kinds.push(format!("{event:?}"));
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(kinds.len(), 5); // stream, document, scalar, document, stream
/// ```
pub fn stream_parse<F>(input: &str, mut handler: F) -> Result<()>
where
    F: FnMut(Event) -> Result<()>,
{
    let lines = prepare(input)?;
    let mut scanner = Scanner { lines, pos: 0 };
    scanner.run(&mut handler)
}

#[derive(Clone, Copy)]
struct Line<'a> {
    number: usize,
    indent: usize,
    text: &'a str,
}

/// Anchor and tag prefixes collected in front of a node.
#[derive(Default)]
struct Props {
    anchor: Option<String>,
    tag: Option<String>,
}

struct Scanner<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn run<F>(&mut self, h: &mut F) -> Result<()>
    where
        F: FnMut(Event) -> Result<()>,
    {
        h(Event::StreamStart)?;
        while self.pos < self.lines.len() {
            self.document(h)?;
        }
        h(Event::StreamEnd)?;
        Ok(())
    }

    fn document<F>(&mut self, h: &mut F) -> Result<()>
    where
        F: FnMut(Event) -> Result<()>,
    {
        h(Event::DocumentStart)?;
        let line = self.lines[self.pos];
        if line.text == "---" {
            self.pos += 1;
            if self.content_ahead() {
                self.block_node(h, Props::default())?;
            } else {
                h(Event::scalar(""))?;
            }
        } else if let Some(inline) = line.text.strip_prefix("--- ") {
            self.pos += 1;
            self.root_inline(inline.trim(), line.number, h)?;
        } else if line.text == "..." {
            h(Event::scalar(""))?;
        } else {
            self.block_node(h, Props::default())?;
        }
        if self.content_ahead() {
            let stray = self.lines[self.pos];
            return Err(StructuralError::new(
                "did not find expected document start",
                "document",
                Some(stray.number),
            )
            .into());
        }
        if self.pos < self.lines.len() && self.lines[self.pos].text == "..." {
            self.pos += 1;
        }
        h(Event::DocumentEnd)?;
        Ok(())
    }

    /// The value on a `--- ` marker line: either a complete inline token or
    /// anchor/tag prefixes for the block that follows.
    fn root_inline<F>(&mut self, inline: &str, number: usize, h: &mut F) -> Result<()>
    where
        F: FnMut(Event) -> Result<()>,
    {
        let (props, rest) = parse_props(inline);
        if rest.is_empty() {
            if self.content_ahead() {
                return self.block_node(h, props);
            }
            return h(Event::Scalar {
                value: String::new(),
                anchor: props.anchor,
                tag: props.tag,
            });
        }
        if let Some((key, value_rest)) = split_entry(rest) {
            // mapping root opened on the marker line; siblings at column 0
            let value_rest = value_rest.to_string();
            return self.block_mapping(0, Some((key, value_rest, number)), props, h);
        }
        emit_flow_token(rest, number, props, h)
    }

    /// Dispatch on the current line: sequence, mapping, or a single scalar.
    fn block_node<F>(&mut self, h: &mut F, props: Props) -> Result<()>
    where
        F: FnMut(Event) -> Result<()>,
    {
        let line = self.lines[self.pos];
        if is_dash(line.text) {
            self.block_sequence(line.indent, props, h)
        } else if split_entry(line.text).is_some() {
            self.block_mapping(line.indent, None, props, h)
        } else {
            self.pos += 1;
            let (own, rest) = parse_props(line.text);
            let merged = Props {
                anchor: props.anchor.or(own.anchor),
                tag: props.tag.or(own.tag),
            };
            if rest.is_empty() {
                return h(Event::Scalar {
                    value: String::new(),
                    anchor: merged.anchor,
                    tag: merged.tag,
                });
            }
            emit_flow_token(rest, line.number, merged, h)
        }
    }

    fn block_sequence<F>(&mut self, indent: usize, props: Props, h: &mut F) -> Result<()>
    where
        F: FnMut(Event) -> Result<()>,
    {
        h(Event::SequenceStart {
            anchor: props.anchor,
            tag: props.tag,
        })?;
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            if is_marker(line.text) || line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(StructuralError::new(
                    "found unexpected indentation",
                    "block sequence",
                    Some(line.number),
                )
                .into());
            }
            if line.text == "-" {
                self.pos += 1;
                if self.deeper_than(indent) {
                    self.block_node(h, Props::default())?;
                } else {
                    h(Event::scalar(""))?;
                }
            } else if let Some(content) = line.text.strip_prefix("- ") {
                self.pos += 1;
                self.sequence_item(content.trim_start(), line, h)?;
            } else {
                break;
            }
        }
        h(Event::SequenceEnd)?;
        Ok(())
    }

    /// The content after a `- ` marker: an inline token, the head of a
    /// compact mapping, or prefixes for a nested block.
    fn sequence_item<F>(&mut self, content: &str, line: Line<'a>, h: &mut F) -> Result<()>
    where
        F: FnMut(Event) -> Result<()>,
    {
        let (props, rest) = parse_props(content);
        if rest.is_empty() {
            if self.deeper_than(line.indent) {
                return self.block_node(h, props);
            }
            return h(Event::Scalar {
                value: String::new(),
                anchor: props.anchor,
                tag: props.tag,
            });
        }
        if is_dash(rest) {
            return Err(StructuralError::new(
                "found a nested sequence entry on the same line",
                "block sequence",
                Some(line.number),
            )
            .into());
        }
        if let Some((key, value_rest)) = split_entry(rest) {
            // compact mapping item: the first entry shares the dash line and
            // siblings sit two columns past the dash
            let value_rest = value_rest.to_string();
            return self.block_mapping(
                line.indent + 2,
                Some((key, value_rest, line.number)),
                props,
                h,
            );
        }
        emit_flow_token(rest, line.number, props, h)
    }

    fn block_mapping<F>(
        &mut self,
        indent: usize,
        first: Option<(Event, String, usize)>,
        props: Props,
        h: &mut F,
    ) -> Result<()>
    where
        F: FnMut(Event) -> Result<()>,
    {
        h(Event::MappingStart {
            anchor: props.anchor,
            tag: props.tag,
        })?;
        if let Some((key, rest, number)) = first {
            h(key)?;
            self.entry_value(&rest, indent, number, h)?;
        }
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            if is_marker(line.text) || line.indent < indent {
                break;
            }
            if line.indent > indent {
                return Err(StructuralError::new(
                    "found unexpected indentation",
                    "block mapping",
                    Some(line.number),
                )
                .into());
            }
            if is_dash(line.text) {
                break;
            }
            self.pos += 1;
            match split_entry(line.text) {
                Some((key, rest)) => {
                    h(key)?;
                    self.entry_value(rest, indent, line.number, h)?;
                }
                None => {
                    return Err(StructuralError::new(
                        "did not find expected key",
                        "block mapping",
                        Some(line.number),
                    )
                    .into())
                }
            }
        }
        h(Event::MappingEnd)?;
        Ok(())
    }

    /// The text after an entry's colon: an inline token, or emptiness that
    /// defers to a nested block, a same-indent sequence, or null.
    fn entry_value<F>(&mut self, rest: &str, indent: usize, number: usize, h: &mut F) -> Result<()>
    where
        F: FnMut(Event) -> Result<()>,
    {
        let (props, rest) = parse_props(rest.trim());
        if rest.is_empty() {
            if self.deeper_than(indent) {
                return self.block_node(h, props);
            }
            if let Some(line) = self.peek() {
                if !is_marker(line.text) && line.indent == indent && is_dash(line.text) {
                    return self.block_sequence(indent, props, h);
                }
            }
            return h(Event::Scalar {
                value: String::new(),
                anchor: props.anchor,
                tag: props.tag,
            });
        }
        emit_flow_token(rest, number, props, h)
    }

    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn content_ahead(&self) -> bool {
        matches!(self.peek(), Some(line) if !is_marker(line.text))
    }

    fn deeper_than(&self, indent: usize) -> bool {
        matches!(self.peek(), Some(line) if !is_marker(line.text) && line.indent > indent)
    }
}

/// Split input into content lines: comments stripped, blank lines dropped,
/// indent measured in columns, 1-based numbering preserved.
fn prepare(input: &str) -> Result<Vec<Line<'_>>> {
    let mut lines = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let number = idx + 1;
        let stripped = strip_comment(raw).trim_end();
        let bytes = stripped.as_bytes();
        let mut indent = 0;
        while indent < bytes.len() && bytes[indent] == b' ' {
            indent += 1;
        }
        if indent < bytes.len() && bytes[indent] == b'\t' {
            return Err(StructuralError::new(
                "found a tab character used for indentation",
                "document",
                Some(number),
            )
            .into());
        }
        let text = &stripped[indent..];
        if text.is_empty() {
            continue;
        }
        lines.push(Line {
            number,
            indent,
            text,
        });
    }
    Ok(lines)
}

/// Drop a `#` comment, honoring double quotes. A `#` only starts a comment
/// at the start of the line or after whitespace.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut in_quote = false;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_quote = !in_quote,
            b'\\' if in_quote => i += 1,
            b'#' if !in_quote && (i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') => {
                return &line[..i];
            }
            _ => {}
        }
        i += 1;
    }
    line
}

fn is_marker(text: &str) -> bool {
    text == "---" || text == "..." || text.starts_with("--- ")
}

fn is_dash(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

/// Split a mapping entry into its key event and the text after the colon.
/// Returns `None` when the content is not an entry. Plain keys end at the
/// first `": "` or at a trailing colon; quoted keys end at their closing
/// quote.
fn split_entry(content: &str) -> Option<(Event, &str)> {
    if let Some(after) = content.strip_prefix('"') {
        let end = find_closing_quote(after)?;
        let tail = &after[end + 1..];
        let rest = tail.strip_prefix(':')?;
        if rest.is_empty() || rest.starts_with(' ') {
            let key = Event::Scalar {
                value: unescape(&after[..end]),
                anchor: None,
                tag: Some(TAG_STR.to_string()),
            };
            return Some((key, rest));
        }
        return None;
    }
    if let Some(idx) = content.find(": ") {
        let key = content[..idx].trim_end();
        return Some((Event::scalar(key), &content[idx + 1..]));
    }
    if let Some(stripped) = content.strip_suffix(':') {
        return Some((Event::scalar(stripped.trim_end()), ""));
    }
    None
}

/// Collect `&anchor` and `!tag` prefixes in front of a node.
fn parse_props(mut rest: &str) -> (Props, &str) {
    let mut props = Props::default();
    loop {
        if let Some(after) = rest.strip_prefix('&') {
            let (name, tail) = split_token(after);
            props.anchor = Some(name.to_string());
            rest = tail.trim_start();
        } else if rest.starts_with('!') {
            let (token, tail) = split_token(rest);
            props.tag = Some(expand_tag(token));
            rest = tail.trim_start();
        } else {
            break;
        }
    }
    (props, rest)
}

fn split_token(s: &str) -> (&str, &str) {
    match s.find([' ', '\t']) {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}

/// `!!name` expands to the canonical yaml.org form, `!<...>` is verbatim,
/// and a bare `!name` stays as written.
fn expand_tag(token: &str) -> String {
    if let Some(short) = token.strip_prefix("!!") {
        return format!("tag:yaml.org,2002:{short}");
    }
    if let Some(verbatim) = token.strip_prefix("!<") {
        if let Some(inner) = verbatim.strip_suffix('>') {
            return inner.to_string();
        }
    }
    token.to_string()
}

/// Emit a single inline token: an empty flow collection, an alias, a quoted
/// scalar, or a plain scalar.
fn emit_flow_token<F>(text: &str, number: usize, props: Props, h: &mut F) -> Result<()>
where
    F: FnMut(Event) -> Result<()>,
{
    if text == "[]" {
        h(Event::SequenceStart {
            anchor: props.anchor,
            tag: props.tag,
        })?;
        return h(Event::SequenceEnd);
    }
    if text == "{}" {
        h(Event::MappingStart {
            anchor: props.anchor,
            tag: props.tag,
        })?;
        return h(Event::MappingEnd);
    }
    if text.starts_with('[') || text.starts_with('{') {
        return Err(StructuralError::new(
            "found an unsupported flow collection",
            "block node",
            Some(number),
        )
        .into());
    }
    if let Some(anchor) = text.strip_prefix('*') {
        if anchor.is_empty() || anchor.contains(' ') {
            return Err(StructuralError::new(
                "found an invalid alias name",
                "block node",
                Some(number),
            )
            .into());
        }
        return h(Event::Alias {
            anchor: anchor.to_string(),
        });
    }
    if let Some(after) = text.strip_prefix('"') {
        return match find_closing_quote(after) {
            Some(end) if after[end + 1..].trim().is_empty() => h(Event::Scalar {
                value: unescape(&after[..end]),
                anchor: props.anchor,
                tag: props.tag.or_else(|| Some(TAG_STR.to_string())),
            }),
            Some(_) => Err(StructuralError::new(
                "found unexpected trailing content",
                "quoted scalar",
                Some(number),
            )
            .into()),
            None => Err(StructuralError::new(
                "did not find expected closing quote",
                "quoted scalar",
                Some(number),
            )
            .into()),
        };
    }
    h(Event::Scalar {
        value: text.to_string(),
        anchor: props.anchor,
        tag: props.tag,
    })
}

fn find_closing_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Undo the composer's escapes. Total: malformed escapes pass through
/// literally rather than failing the scan.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
