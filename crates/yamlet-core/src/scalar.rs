//! Implicit typing for plain scalars.
//!
//! Untagged scalar text is classified by an ordered rule cascade: keyword
//! words, float specials, binary literals, timestamps, integers, floats,
//! base-60 times, and finally plain text. The first matching rule wins, so
//! the order is load-bearing: `0b11` must be read as binary before the
//! integer rule can claim the leading `0`, and `190:20:30` must survive the
//! integer and float rules to reach the base-60 rule.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::value::Value;

/// Resolve raw scalar text to a typed value.
///
/// Total: text matching none of the rules comes back as [`Value::Str`]
/// unchanged, and empty text resolves to [`Value::Null`].
///
/// ```
/// use yamlet_core::{resolve, Value};
///
/// assert_eq!(resolve("yes"), Value::Bool(true));
/// assert_eq!(resolve("0x1F"), Value::Int(31));
/// assert_eq!(resolve("hello"), Value::Str("hello".to_string()));
/// ```
pub fn resolve(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    let first = raw.as_bytes()[0];
    if first.is_ascii_alphabetic() || first == b'~' {
        return resolve_word(raw);
    }
    if !first.is_ascii_digit() && first != b'-' && first != b'+' && first != b'.' {
        return Value::Str(raw.to_string());
    }
    if let Some(v) = resolve_special_float(raw) {
        return v;
    }
    if let Some(v) = resolve_binary(raw) {
        return v;
    }
    if let Some(v) = resolve_timestamp(raw) {
        return v;
    }
    if let Some(v) = resolve_int(raw) {
        return v;
    }
    if let Some(v) = resolve_float(raw) {
        return v;
    }
    if let Some(v) = resolve_sexagesimal(raw) {
        return v;
    }
    Value::Str(raw.to_string())
}

/// Keyword words: null, the booleans, and their single-letter forms.
/// Anything longer than five characters, or not starting with one of the
/// keyword initials, is text without further inspection.
fn resolve_word(raw: &str) -> Value {
    if raw.len() > 5 {
        return Value::Str(raw.to_string());
    }
    let initial = raw.as_bytes()[0].to_ascii_lowercase();
    if !matches!(initial, b'y' | b't' | b'o' | b'n' | b'f' | b'~') {
        return Value::Str(raw.to_string());
    }
    if raw == "~" || raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    for word in ["y", "yes", "true", "on"] {
        if raw.eq_ignore_ascii_case(word) {
            return Value::Bool(true);
        }
    }
    for word in ["n", "no", "false", "off"] {
        if raw.eq_ignore_ascii_case(word) {
            return Value::Bool(false);
        }
    }
    Value::Str(raw.to_string())
}

fn resolve_special_float(raw: &str) -> Option<Value> {
    if raw.eq_ignore_ascii_case(".inf") || raw.eq_ignore_ascii_case("+.inf") {
        return Some(Value::Float(f64::INFINITY));
    }
    if raw.eq_ignore_ascii_case("-.inf") {
        return Some(Value::Float(f64::NEG_INFINITY));
    }
    if raw.eq_ignore_ascii_case(".nan") {
        return Some(Value::Float(f64::NAN));
    }
    None
}

fn split_sign(raw: &str) -> (bool, &str) {
    match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    }
}

/// Accumulate digits into a non-positive value so `i64::MIN` parses, then
/// negate for positive inputs. Overflow makes the rule fail and the text
/// falls through the rest of the cascade.
fn accumulate(digits: &str, base: i64, digit_value: impl Fn(u8) -> Option<i64>) -> Option<i64> {
    let mut result: i64 = 0;
    let mut seen = false;
    for &b in digits.as_bytes() {
        if b == b'_' {
            continue;
        }
        let d = digit_value(b)?;
        seen = true;
        result = result.checked_mul(base)?.checked_sub(d)?;
    }
    seen.then_some(result)
}

fn finish_signed(negated: i64, negative: bool) -> Option<i64> {
    if negative {
        Some(negated)
    } else {
        negated.checked_neg()
    }
}

/// Binary literals: `[-+]?0b[01_]+`, accumulated digit by digit.
fn resolve_binary(raw: &str) -> Option<Value> {
    let (negative, rest) = split_sign(raw);
    let digits = rest.strip_prefix("0b")?;
    let negated = accumulate(digits, 2, |b| match b {
        b'0' | b'1' => Some((b - b'0') as i64),
        _ => None,
    })?;
    Some(Value::Int(finish_signed(negated, negative)?))
}

/// Integers: optional sign, hex (`0x`) or decimal digits, `_` separators.
fn resolve_int(raw: &str) -> Option<Value> {
    let (negative, rest) = split_sign(raw);
    let (base, digits) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, rest),
    };
    let negated = accumulate(digits, base, |b| match b {
        b'0'..=b'9' => Some((b - b'0') as i64),
        b'a'..=b'f' if base == 16 => Some((b - b'a' + 10) as i64),
        b'A'..=b'F' if base == 16 => Some((b - b'A' + 10) as i64),
        _ => None,
    })?;
    Some(Value::Int(finish_signed(negated, negative)?))
}

/// Floats: optional sign, digits, a mandatory dot, optional fraction and
/// exponent, `_` separators throughout.
fn resolve_float(raw: &str) -> Option<Value> {
    let (negative, rest) = split_sign(raw);
    let bytes = rest.as_bytes();
    let mut i = 0;
    let mut lead_digits = false;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
        if bytes[i] != b'_' {
            lead_digits = true;
        }
        i += 1;
    }
    if !lead_digits || i >= bytes.len() || bytes[i] != b'.' {
        return None;
    }
    i += 1;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
        i += 1;
    }
    if i < bytes.len() {
        if bytes[i] != b'e' && bytes[i] != b'E' {
            return None;
        }
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let mut exp_digits = false;
        while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
            if bytes[i] != b'_' {
                exp_digits = true;
            }
            i += 1;
        }
        if !exp_digits || i < bytes.len() {
            return None;
        }
    }
    let cleaned: String = rest.chars().filter(|&c| c != '_').collect();
    let value: f64 = cleaned.parse().ok()?;
    Some(Value::Float(if negative { -value } else { value }))
}

/// Base-60 times: `[-+]?digits(:[0-5]?digit)+(.frac)?`. Segments accumulate
/// left to right as `total * 60 + segment`; a fractional tail makes the
/// result a float, otherwise it stays an integer.
fn resolve_sexagesimal(raw: &str) -> Option<Value> {
    let (negative, rest) = split_sign(raw);
    let segments: Vec<&str> = rest.split(':').collect();
    if segments.len() < 2 {
        return None;
    }
    let head = segments[0];
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut total: i64 = head.parse().ok()?;
    let last = segments[segments.len() - 1];
    for segment in &segments[1..segments.len() - 1] {
        let part = sexagesimal_part(segment)?;
        total = total.checked_mul(60)?.checked_add(part)?;
    }
    let (last_whole, fraction) = match last.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (last, None),
    };
    let part = sexagesimal_part(last_whole)?;
    total = total.checked_mul(60)?.checked_add(part)?;
    match fraction {
        None => Some(Value::Int(if negative { -total } else { total })),
        Some(frac) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let tail: f64 = format!("0.{frac}").parse().ok()?;
            let value = total as f64 + tail;
            Some(Value::Float(if negative { -value } else { value }))
        }
    }
}

fn sexagesimal_part(segment: &str) -> Option<i64> {
    if segment.is_empty() || segment.len() > 2 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let v: i64 = segment.parse().ok()?;
    (v < 60).then_some(v)
}

/// Timestamps: `YYYY-M-D`, optionally followed by a `T`/`t`/space separator,
/// `H:M:S`, a fractional part, and a zone (`Z` or a numeric offset). A bare
/// date is midnight UTC; a missing zone means UTC.
fn resolve_timestamp(raw: &str) -> Option<Value> {
    let mut c = Cursor::new(raw.as_bytes());
    let year = c.digits(4, 4)?;
    c.expect(b'-')?;
    let month = c.digits(1, 2)?;
    c.expect(b'-')?;
    let day = c.digits(1, 2)?;
    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    if c.done() {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Value::Timestamp(Utc.from_utc_datetime(&midnight)));
    }
    if !c.eat(b'T') && !c.eat(b't') {
        if !c.eat(b' ') {
            return None;
        }
        while c.eat(b' ') {}
    }
    let hour = c.digits(1, 2)?;
    c.expect(b':')?;
    let minute = c.digits(1, 2)?;
    c.expect(b':')?;
    let second = c.digits(1, 2)?;
    let mut nanos: u32 = 0;
    if c.eat(b'.') {
        nanos = c.fraction_nanos()?;
    }
    while c.eat(b' ') {}
    let offset_minutes: i64 = if c.done() {
        0
    } else if c.eat(b'Z') {
        if !c.done() {
            return None;
        }
        0
    } else {
        let sign: i64 = if c.eat(b'+') {
            1
        } else if c.eat(b'-') {
            -1
        } else {
            return None;
        };
        let oh = c.digits(1, 2)? as i64;
        let om = if c.eat(b':') { c.digits(1, 2)? as i64 } else { 0 };
        if !c.done() {
            return None;
        }
        sign * (oh * 60 + om)
    };
    let local = date.and_hms_nano_opt(hour, minute, second, nanos)?;
    let utc = local - Duration::minutes(offset_minutes);
    Some(Value::Timestamp(DateTime::<Utc>::from_naive_utc_and_offset(
        utc,
        Utc,
    )))
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    fn done(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Option<()> {
        self.eat(b).then_some(())
    }

    /// Consume between `min` and `max` ASCII digits.
    fn digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let mut count = 0;
        let mut value: u32 = 0;
        while count < max {
            match self.bytes.get(self.pos) {
                Some(b) if b.is_ascii_digit() => {
                    value = value * 10 + (b - b'0') as u32;
                    self.pos += 1;
                    count += 1;
                }
                _ => break,
            }
        }
        (count >= min).then_some(value)
    }

    /// Consume one or more fraction digits, scaled to nanoseconds. Digits
    /// past the ninth are read but discarded.
    fn fraction_nanos(&mut self) -> Option<u32> {
        let mut count = 0;
        let mut value: u32 = 0;
        while let Some(b) = self.bytes.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            if count < 9 {
                value = value * 10 + (b - b'0') as u32;
            }
            count += 1;
            self.pos += 1;
        }
        if count == 0 {
            return None;
        }
        while count < 9 {
            value *= 10;
            count += 1;
        }
        Some(value)
    }
}
