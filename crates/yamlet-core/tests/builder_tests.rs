//! Builder tests drive synthetic event streams directly, independent of the
//! text scanner, to pin down the frame machine's behavior.

use yamlet_core::{DocumentBuilder, Error, Event, TagHandlers, Value, TAG_STR};

fn build(events: Vec<Event>) -> Vec<Value> {
    let mut builder = DocumentBuilder::new();
    for event in events {
        builder.on_event(event).expect("event stream is well formed");
    }
    builder.finish().expect("stream is complete")
}

fn build_err(events: Vec<Event>) -> Error {
    let mut builder = DocumentBuilder::new();
    for event in events {
        if let Err(err) = builder.on_event(event) {
            return err;
        }
    }
    match builder.finish() {
        Ok(docs) => panic!("expected an error, built {docs:?}"),
        Err(err) => err,
    }
}

fn str_tagged(value: &str) -> Event {
    Event::Scalar {
        value: value.to_string(),
        anchor: None,
        tag: Some(TAG_STR.to_string()),
    }
}

// ============================================================================
// Document assembly
// ============================================================================

#[test]
fn scalar_document() {
    let docs = build(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::scalar("foo"),
        Event::DocumentEnd,
        Event::StreamEnd,
    ]);
    assert_eq!(docs, vec![Value::Str("foo".to_string())]);
}

#[test]
fn empty_document_is_null() {
    let docs = build(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::DocumentEnd,
        Event::StreamEnd,
    ]);
    assert_eq!(docs, vec![Value::Null]);
}

#[test]
fn multiple_documents_in_stream_order() {
    let docs = build(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::scalar("1"),
        Event::DocumentEnd,
        Event::DocumentStart,
        Event::scalar("2"),
        Event::DocumentEnd,
        Event::StreamEnd,
    ]);
    assert_eq!(docs, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn nested_containers() {
    let docs = build(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::mapping_start(),
        Event::scalar("items"),
        Event::sequence_start(),
        Event::scalar("1"),
        Event::mapping_start(),
        Event::scalar("inner"),
        Event::scalar("yes"),
        Event::MappingEnd,
        Event::SequenceEnd,
        Event::MappingEnd,
        Event::DocumentEnd,
        Event::StreamEnd,
    ]);
    let expected = Value::Map(vec![(
        "items".to_string(),
        Value::Seq(vec![
            Value::Int(1),
            Value::Map(vec![("inner".to_string(), Value::Bool(true))]),
        ]),
    )]);
    assert_eq!(docs, vec![expected]);
}

#[test]
fn scalars_resolve_unless_tagged_as_text() {
    let docs = build(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::sequence_start(),
        Event::scalar("05"),
        str_tagged("05"),
        Event::SequenceEnd,
        Event::DocumentEnd,
        Event::StreamEnd,
    ]);
    assert_eq!(
        docs,
        vec![Value::Seq(vec![
            Value::Int(5),
            Value::Str("05".to_string())
        ])]
    );
}

// ============================================================================
// Mapping keys
// ============================================================================

#[test]
fn non_text_keys_coerce_to_canonical_text() {
    let docs = build(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::mapping_start(),
        Event::scalar("5"),
        Event::scalar("five"),
        Event::scalar("yes"),
        Event::scalar("affirmative"),
        Event::scalar("~"),
        Event::scalar("nothing"),
        Event::MappingEnd,
        Event::DocumentEnd,
        Event::StreamEnd,
    ]);
    let expected = Value::Map(vec![
        ("5".to_string(), Value::Str("five".to_string())),
        ("true".to_string(), Value::Str("affirmative".to_string())),
        ("~".to_string(), Value::Str("nothing".to_string())),
    ]);
    assert_eq!(docs, vec![expected]);
}

#[test]
fn duplicate_key_replaces_value_in_place() {
    let docs = build(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::mapping_start(),
        Event::scalar("a"),
        Event::scalar("1"),
        Event::scalar("b"),
        Event::scalar("2"),
        Event::scalar("a"),
        Event::scalar("3"),
        Event::MappingEnd,
        Event::DocumentEnd,
        Event::StreamEnd,
    ]);
    let expected = Value::Map(vec![
        ("a".to_string(), Value::Int(3)),
        ("b".to_string(), Value::Int(2)),
    ]);
    assert_eq!(docs, vec![expected]);
}

// ============================================================================
// Tag handlers
// ============================================================================

#[test]
fn tag_handler_rewrites_scalars() {
    let mut handlers: TagHandlers = TagHandlers::new();
    handlers.insert(
        "!upper".to_string(),
        Box::new(|v| match v {
            Value::Str(s) => Value::Str(s.to_uppercase()),
            other => other,
        }),
    );
    let mut builder = DocumentBuilder::with_handlers(&handlers);
    for event in [
        Event::StreamStart,
        Event::DocumentStart,
        Event::Scalar {
            value: "shout".to_string(),
            anchor: None,
            tag: Some("!upper".to_string()),
        },
        Event::DocumentEnd,
        Event::StreamEnd,
    ] {
        builder.on_event(event).unwrap();
    }
    assert_eq!(
        builder.finish().unwrap(),
        vec![Value::Str("SHOUT".to_string())]
    );
}

#[test]
fn tag_handler_rewrites_closed_containers() {
    let mut handlers: TagHandlers = TagHandlers::new();
    handlers.insert(
        "!sum".to_string(),
        Box::new(|v| match v {
            Value::Seq(items) => Value::Int(items.iter().filter_map(Value::as_i64).sum()),
            other => other,
        }),
    );
    let mut builder = DocumentBuilder::with_handlers(&handlers);
    for event in [
        Event::StreamStart,
        Event::DocumentStart,
        Event::SequenceStart {
            anchor: None,
            tag: Some("!sum".to_string()),
        },
        Event::scalar("1"),
        Event::scalar("2"),
        Event::scalar("3"),
        Event::SequenceEnd,
        Event::DocumentEnd,
        Event::StreamEnd,
    ] {
        builder.on_event(event).unwrap();
    }
    assert_eq!(builder.finish().unwrap(), vec![Value::Int(6)]);
}

#[test]
fn unknown_tags_pass_through() {
    let docs = build(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::Scalar {
            value: "42".to_string(),
            anchor: None,
            tag: Some("!mystery".to_string()),
        },
        Event::DocumentEnd,
        Event::StreamEnd,
    ]);
    assert_eq!(docs, vec![Value::Int(42)]);
}

// ============================================================================
// Aliases
// ============================================================================

#[test]
fn alias_collapses_to_null() {
    let docs = build(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::mapping_start(),
        Event::scalar("copy"),
        Event::Alias {
            anchor: "base".to_string(),
        },
        Event::MappingEnd,
        Event::DocumentEnd,
        Event::StreamEnd,
    ]);
    assert_eq!(
        docs,
        vec![Value::Map(vec![("copy".to_string(), Value::Null)])]
    );
}

// ============================================================================
// Structural violations
// ============================================================================

fn assert_structural(err: Error, fragment: &str) {
    match err {
        Error::Structural(inner) => {
            let message = inner.to_string();
            assert!(
                message.contains(fragment),
                "message {message:?} should contain {fragment:?}"
            );
        }
        other => panic!("expected a structural error, got {other:?}"),
    }
}

#[test]
fn odd_mapping_arity_is_an_error() {
    let err = build_err(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::mapping_start(),
        Event::scalar("orphan key"),
        Event::MappingEnd,
    ]);
    assert_structural(err, "did not find expected value");
}

#[test]
fn unmatched_sequence_end_is_an_error() {
    let err = build_err(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::SequenceEnd,
    ]);
    assert_structural(err, "unexpected end of sequence");
}

#[test]
fn mismatched_end_kind_is_an_error() {
    let err = build_err(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::sequence_start(),
        Event::MappingEnd,
    ]);
    assert_structural(err, "unexpected end of mapping");
}

#[test]
fn value_outside_document_is_an_error() {
    let err = build_err(vec![Event::StreamStart, Event::scalar("stray")]);
    assert_structural(err, "found a value outside any document");
}

#[test]
fn second_document_root_is_an_error() {
    let err = build_err(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::scalar("first"),
        Event::scalar("second"),
    ]);
    assert_structural(err, "found a second document root");
}

#[test]
fn truncated_stream_is_an_error() {
    let err = build_err(vec![
        Event::StreamStart,
        Event::DocumentStart,
        Event::mapping_start(),
        Event::scalar("key"),
        Event::scalar("value"),
    ]);
    assert_structural(err, "unexpected end of stream");
}
