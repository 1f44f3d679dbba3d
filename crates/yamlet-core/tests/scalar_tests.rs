use chrono::{TimeZone, Utc};
use yamlet_core::{resolve, Value};

fn assert_resolves(raw: &str, expected: Value) {
    assert_eq!(resolve(raw), expected, "resolving {raw:?}");
}

fn assert_text(raw: &str) {
    assert_eq!(
        resolve(raw),
        Value::Str(raw.to_string()),
        "{raw:?} should stay text"
    );
}

// ============================================================================
// Null and Booleans
// ============================================================================

#[test]
fn resolve_null_words() {
    assert_resolves("~", Value::Null);
    assert_resolves("null", Value::Null);
    assert_resolves("Null", Value::Null);
    assert_resolves("NULL", Value::Null);
    assert_resolves("", Value::Null);
}

#[test]
fn resolve_true_words() {
    for raw in ["y", "Y", "yes", "Yes", "YES", "true", "True", "on", "ON"] {
        assert_resolves(raw, Value::Bool(true));
    }
}

#[test]
fn resolve_false_words() {
    for raw in ["n", "N", "no", "No", "false", "False", "off", "Off"] {
        assert_resolves(raw, Value::Bool(false));
    }
}

#[test]
fn keyword_lookalikes_stay_text() {
    // longer than five characters short-circuits before any word matching
    assert_text("falsey");
    assert_text("yessir");
    // wrong initial letter short-circuits too
    assert_text("maybe");
    assert_text("x");
    // right initial, but not a keyword
    assert_text("t");
    assert_text("o");
    assert_text("nope");
}

// ============================================================================
// Float specials
// ============================================================================

#[test]
fn resolve_infinities() {
    assert_resolves(".inf", Value::Float(f64::INFINITY));
    assert_resolves("+.inf", Value::Float(f64::INFINITY));
    assert_resolves("-.inf", Value::Float(f64::NEG_INFINITY));
    assert_resolves(".Inf", Value::Float(f64::INFINITY));
}

#[test]
fn resolve_nan_is_float_and_unequal_to_itself() {
    for raw in [".nan", ".NaN", ".NAN"] {
        let value = resolve(raw);
        match value {
            Value::Float(f) => {
                assert!(f.is_nan(), "{raw:?} should be NaN");
                assert_ne!(f, f, "NaN must not equal itself");
            }
            other => panic!("{raw:?} resolved to {other:?}, expected a float"),
        }
    }
}

// ============================================================================
// Integers
// ============================================================================

#[test]
fn resolve_decimal_integers() {
    assert_resolves("0", Value::Int(0));
    assert_resolves("42", Value::Int(42));
    assert_resolves("-17", Value::Int(-17));
    assert_resolves("+8", Value::Int(8));
    assert_resolves("1_000_000", Value::Int(1_000_000));
}

#[test]
fn resolve_hex_integers() {
    assert_resolves("0xFF", Value::Int(255));
    assert_resolves("0x1F", Value::Int(31));
    assert_resolves("-0x10", Value::Int(-16));
    assert_resolves("0xDEAD_BEEF", Value::Int(0xDEAD_BEEF));
}

#[test]
fn resolve_binary_integers() {
    assert_resolves("0b1010", Value::Int(10));
    assert_resolves("-0b11", Value::Int(-3));
    assert_resolves("+0b1", Value::Int(1));
    assert_resolves("0b1111_0000", Value::Int(240));
}

#[test]
fn resolve_integer_extremes() {
    assert_resolves("9223372036854775807", Value::Int(i64::MAX));
    assert_resolves("-9223372036854775808", Value::Int(i64::MIN));
    // one past the top falls back to text rather than failing
    assert_text("9223372036854775808");
}

#[test]
fn malformed_numeric_prefixes_stay_text() {
    assert_text("0x");
    assert_text("0b");
    assert_text("0b___");
    assert_text("-");
    assert_text("+");
    assert_text(".");
    assert_text("1.2.3");
    assert_text("1e3");
}

// ============================================================================
// Floats
// ============================================================================

#[test]
fn resolve_simple_floats() {
    assert_resolves("3.14", Value::Float(3.14));
    assert_resolves("-2.5", Value::Float(-2.5));
    assert_resolves("0.504", Value::Float(0.504));
    assert_resolves("10.", Value::Float(10.0));
}

#[test]
fn float_spellings_agree() {
    // canonical, exponential, fixed, and separator-laden spellings of the
    // same number all resolve identically
    let expected = Value::Float(685_230.15);
    assert_resolves("685230.15", expected.clone());
    assert_resolves("6.85230150e+05", expected.clone());
    assert_resolves("685.230_15e+03", expected.clone());
    assert_resolves("685_230.15", expected);
}

#[test]
fn resolve_exponent_forms() {
    assert_resolves("1.5e-3", Value::Float(0.0015));
    assert_resolves("2.0E2", Value::Float(200.0));
    assert_resolves("-1.0e1", Value::Float(-10.0));
}

// ============================================================================
// Base-60
// ============================================================================

#[test]
fn resolve_sexagesimal_floats() {
    assert_resolves("190:20:30.15", Value::Float(685_230.15));
}

#[test]
fn resolve_sexagesimal_integers() {
    assert_resolves("190:20:30", Value::Int(685_230));
    assert_resolves("1:00:00", Value::Int(3600));
    assert_resolves("12:00", Value::Int(720));
    assert_resolves("-5:30", Value::Int(-330));
}

#[test]
fn sexagesimal_rejects_out_of_range_segments() {
    // 60 is not a valid base-60 digit pair
    assert_text("1:60");
    assert_text("1:234");
}

// ============================================================================
// Timestamps
// ============================================================================

#[test]
fn resolve_canonical_timestamp() {
    let expected = Utc.with_ymd_and_hms(2001, 12, 15, 2, 59, 43).unwrap()
        + chrono::Duration::milliseconds(100);
    assert_resolves("2001-12-15T02:59:43.10Z", Value::Timestamp(expected));
}

#[test]
fn timestamp_offsets_agree_on_the_instant() {
    let canonical = resolve("2001-12-15T02:59:43.10Z");
    assert_eq!(resolve("2001-12-14T21:59:43.10-05:00"), canonical);
    assert_eq!(resolve("2001-12-14t21:59:43.10-05:00"), canonical);
    assert_eq!(resolve("2001-12-14 21:59:43.10 -5"), canonical);
}

#[test]
fn bare_date_is_midnight_utc() {
    let expected = Utc.with_ymd_and_hms(2002, 12, 14, 0, 0, 0).unwrap();
    assert_resolves("2002-12-14", Value::Timestamp(expected));
}

#[test]
fn missing_zone_means_utc() {
    let expected = Utc.with_ymd_and_hms(2001, 12, 15, 2, 59, 43).unwrap();
    assert_resolves("2001-12-15 2:59:43", Value::Timestamp(expected));
}

#[test]
fn timestamp_lookalikes_stay_untyped() {
    // no seconds, bad month, stray suffix
    assert_text("2001-12-14 21:59");
    assert_text("2001-13-14");
    assert_text("2001-12-14T00:00:00Zx");
}

// ============================================================================
// Text fallback
// ============================================================================

#[test]
fn plain_words_stay_text() {
    assert_text("foo");
    assert_text("hello world");
    assert_text("1abc");
    assert_text("...");
    assert_text("a:b");
}
