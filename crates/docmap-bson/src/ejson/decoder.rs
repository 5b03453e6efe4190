//! Extended JSON decoder.
//!
//! Parses JSON text and returns a [`Value`], recognising the `$`-prefixed
//! type wrapper objects written by the encoder in either mode, plus the
//! `$uuid` alias and ISO-8601 `$date` strings written by other tools.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::DateTime;
use uuid::Uuid;

use crate::decimal128::Decimal128;
use crate::document::Document;
use crate::object_id::ObjectId;
use crate::value::{Binary, JavaScriptCodeWithScope, Regex, Timestamp, Value};

use super::error::TextDecodeError;

// ----------------------------------------------------------------
// Decoder state

/// Extended JSON decoder, a byte cursor over borrowed input.
pub struct TextDecoder<'a> {
    data: &'a [u8],
    x: usize,
}

impl<'a> TextDecoder<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            data: input.as_bytes(),
            x: 0,
        }
    }

    /// Decodes exactly one value; only whitespace may follow it.
    pub fn decode(&mut self) -> Result<Value, TextDecodeError> {
        let value = self.read_any()?;
        self.skip_ws();
        if self.x < self.data.len() {
            return Err(TextDecodeError::TrailingCharacters(self.x));
        }
        Ok(value)
    }

    // ----------------------------------------------------------------
    // Core read dispatch

    fn read_any(&mut self) -> Result<Value, TextDecodeError> {
        self.skip_ws();
        let x = self.x;
        match self.data.get(x) {
            Some(b'"') => Ok(Value::String(self.read_string()?)),
            Some(b'[') => self.read_array(),
            Some(b'{') => self.read_obj(),
            Some(b'f') => self.read_literal(b"false", Value::Boolean(false)),
            Some(b'n') => self.read_literal(b"null", Value::Null),
            Some(b't') => self.read_literal(b"true", Value::Boolean(true)),
            Some(c) if c.is_ascii_digit() || *c == b'-' => self.read_num(),
            _ => Err(TextDecodeError::InvalidJson(x)),
        }
    }

    // ----------------------------------------------------------------
    // Primitives

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.data.get(self.x) {
            self.x += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), TextDecodeError> {
        if self.data.get(self.x) != Some(&byte) {
            return Err(TextDecodeError::InvalidJson(self.x));
        }
        self.x += 1;
        Ok(())
    }

    fn read_literal(&mut self, text: &[u8], value: Value) -> Result<Value, TextDecodeError> {
        if !self.data[self.x..].starts_with(text) {
            return Err(TextDecodeError::InvalidJson(self.x));
        }
        self.x += text.len();
        Ok(value)
    }

    /// Bare numbers: integers fitting 32 bits become Int32, other integers
    /// Int64, anything with a fraction or exponent Double.
    fn read_num(&mut self) -> Result<Value, TextDecodeError> {
        let start = self.x;
        let mut x = self.x;
        let digits = |data: &[u8], mut x: usize| {
            let from = x;
            while data.get(x).is_some_and(u8::is_ascii_digit) {
                x += 1;
            }
            (x, x > from)
        };

        if self.data.get(x) == Some(&b'-') {
            x += 1;
        }
        let (next, any) = digits(self.data, x);
        if !any {
            return Err(TextDecodeError::InvalidJson(start));
        }
        x = next;
        let mut is_float = false;
        if self.data.get(x) == Some(&b'.') {
            is_float = true;
            let (next, any) = digits(self.data, x + 1);
            if !any {
                return Err(TextDecodeError::InvalidJson(start));
            }
            x = next;
        }
        if let Some(b'e' | b'E') = self.data.get(x) {
            is_float = true;
            x += 1;
            if let Some(b'+' | b'-') = self.data.get(x) {
                x += 1;
            }
            let (next, any) = digits(self.data, x);
            if !any {
                return Err(TextDecodeError::InvalidJson(start));
            }
            x = next;
        }
        self.x = x;

        let s = std::str::from_utf8(&self.data[start..x]).map_err(|_| TextDecodeError::InvalidJson(start))?;
        if !is_float {
            if let Ok(v) = s.parse::<i32>() {
                return Ok(Value::Int32(v));
            }
            if let Ok(v) = s.parse::<i64>() {
                return Ok(Value::Int64(v));
            }
        }
        // Integers beyond 64 bits fall back to Double.
        s.parse::<f64>()
            .map(Value::Double)
            .map_err(|_| TextDecodeError::InvalidJson(start))
    }

    fn read_string(&mut self) -> Result<String, TextDecodeError> {
        self.expect(b'"')?;
        let start = self.x;
        let end = self.find_end_quote(start)?;
        let s = decode_json_string(&self.data[start..end]).ok_or(TextDecodeError::InvalidJson(start))?;
        self.x = end + 1;
        Ok(s)
    }

    fn find_end_quote(&self, start: usize) -> Result<usize, TextDecodeError> {
        let mut i = start;
        while i < self.data.len() {
            match self.data[i] {
                b'\\' => i += 2,
                b'"' => return Ok(i),
                _ => i += 1,
            }
        }
        Err(TextDecodeError::InvalidJson(start))
    }

    fn read_array(&mut self) -> Result<Value, TextDecodeError> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.data.get(self.x) == Some(&b']') {
            self.x += 1;
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.read_any()?);
            self.skip_ws();
            match self.data.get(self.x) {
                Some(b',') => self.x += 1,
                Some(b']') => {
                    self.x += 1;
                    return Ok(Value::Array(items));
                }
                _ => return Err(TextDecodeError::InvalidJson(self.x)),
            }
        }
    }

    // ----------------------------------------------------------------
    // Object / wrapper dispatch

    /// Reads a JSON object, then turns it into a typed value when it is a
    /// `$`-wrapper. Nested objects are already transformed by the time the
    /// outer wrapper is inspected.
    fn read_obj(&mut self) -> Result<Value, TextDecodeError> {
        self.expect(b'{')?;
        let mut doc = Document::new();
        self.skip_ws();
        if self.data.get(self.x) == Some(&b'}') {
            self.x += 1;
            return Ok(Value::Document(doc));
        }
        loop {
            self.skip_ws();
            let key = self.read_string()?;
            self.skip_ws();
            self.expect(b':')?;
            let value = self.read_any()?;
            doc.insert(key, value);
            self.skip_ws();
            match self.data.get(self.x) {
                Some(b',') => self.x += 1,
                Some(b'}') => {
                    self.x += 1;
                    break;
                }
                _ => return Err(TextDecodeError::InvalidJson(self.x)),
            }
        }
        transform_wrapper(doc)
    }
}

// ----------------------------------------------------------------
// Wrapper transformation

fn transform_wrapper(doc: Document) -> Result<Value, TextDecodeError> {
    let Some(first) = doc.keys().next() else {
        return Ok(Value::Document(doc));
    };
    if !first.starts_with('$') {
        return Ok(Value::Document(doc));
    }

    if let Some(v) = single(&doc, "$oid", "ObjectId")? {
        let id = v
            .as_str()
            .and_then(|s| ObjectId::parse_str(s).ok())
            .ok_or(TextDecodeError::InvalidWrapper("ObjectId"))?;
        return Ok(Value::ObjectId(id));
    }

    if let Some(v) = single(&doc, "$numberInt", "Int32")? {
        let n = v
            .as_str()
            .and_then(|s| s.parse::<i32>().ok())
            .ok_or(TextDecodeError::InvalidWrapper("Int32"))?;
        return Ok(Value::Int32(n));
    }

    if let Some(v) = single(&doc, "$numberLong", "Int64")? {
        let n = v
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or(TextDecodeError::InvalidWrapper("Int64"))?;
        return Ok(Value::Int64(n));
    }

    if let Some(v) = single(&doc, "$numberDouble", "Double")? {
        let n = v
            .as_str()
            .and_then(parse_double)
            .ok_or(TextDecodeError::InvalidWrapper("Double"))?;
        return Ok(Value::Double(n));
    }

    if let Some(v) = single(&doc, "$numberDecimal", "Decimal128")? {
        let d = v
            .as_str()
            .and_then(|s| s.parse::<Decimal128>().ok())
            .ok_or(TextDecodeError::InvalidWrapper("Decimal128"))?;
        return Ok(Value::Decimal128(d));
    }

    if let Some(v) = single(&doc, "$binary", "Binary")? {
        return parse_binary(v).ok_or(TextDecodeError::InvalidWrapper("Binary"));
    }

    for key in ["$guid", "$uuid"] {
        if let Some(v) = single(&doc, key, "UUID")? {
            let uuid = v
                .as_str()
                .and_then(|s| Uuid::try_parse(s).ok())
                .ok_or(TextDecodeError::InvalidWrapper("UUID"))?;
            return Ok(Value::Binary(Binary::uuid(*uuid.as_bytes())));
        }
    }

    if doc.contains_key("$code") {
        let code = doc
            .get("$code")
            .and_then(Value::as_str)
            .map(str::to_owned);
        if doc.contains_key("$scope") {
            if !has_exact(&doc, &["$code", "$scope"]) {
                return Err(TextDecodeError::ExtraKeys("CodeWithScope"));
            }
            return match (code, doc.get_document("$scope")) {
                (Some(code), Some(scope)) => Ok(Value::JavaScriptCodeWithScope(JavaScriptCodeWithScope {
                    code,
                    scope: scope.clone(),
                })),
                _ => Err(TextDecodeError::InvalidWrapper("CodeWithScope")),
            };
        }
        if !has_exact(&doc, &["$code"]) {
            return Err(TextDecodeError::ExtraKeys("Code"));
        }
        return code
            .map(Value::JavaScriptCode)
            .ok_or(TextDecodeError::InvalidWrapper("Code"));
    }

    if let Some(v) = single(&doc, "$symbol", "Symbol")? {
        let s = v.as_str().ok_or(TextDecodeError::InvalidWrapper("Symbol"))?;
        return Ok(Value::Symbol(s.to_owned()));
    }

    if let Some(v) = single(&doc, "$timestamp", "Timestamp")? {
        return parse_timestamp(v).ok_or(TextDecodeError::InvalidWrapper("Timestamp"));
    }

    if let Some(v) = single(&doc, "$regularExpression", "RegularExpression")? {
        return parse_regex(v).ok_or(TextDecodeError::InvalidWrapper("RegularExpression"));
    }

    if let Some(v) = single(&doc, "$date", "Date")? {
        return parse_date(v).ok_or(TextDecodeError::InvalidWrapper("Date"));
    }

    if let Some(v) = single(&doc, "$minKey", "MinKey")? {
        return match v.as_i64() {
            Some(1) => Ok(Value::MinKey),
            _ => Err(TextDecodeError::InvalidWrapper("MinKey")),
        };
    }

    if let Some(v) = single(&doc, "$maxKey", "MaxKey")? {
        return match v.as_i64() {
            Some(1) => Ok(Value::MaxKey),
            _ => Err(TextDecodeError::InvalidWrapper("MaxKey")),
        };
    }

    if let Some(v) = single(&doc, "$undefined", "Undefined")? {
        return match v {
            Value::Boolean(true) => Ok(Value::Undefined),
            _ => Err(TextDecodeError::InvalidWrapper("Undefined")),
        };
    }

    // Operator documents such as {"$set": {...}} stay plain documents.
    Ok(Value::Document(doc))
}

fn has_exact(doc: &Document, expected: &[&str]) -> bool {
    doc.len() == expected.len() && expected.iter().all(|k| doc.contains_key(k))
}

/// The payload under `key` when it is present and alone in `doc`.
fn single<'d>(doc: &'d Document, key: &str, kind: &'static str) -> Result<Option<&'d Value>, TextDecodeError> {
    match doc.get(key) {
        None => Ok(None),
        Some(_) if !has_exact(doc, &[key]) => Err(TextDecodeError::ExtraKeys(kind)),
        Some(v) => Ok(Some(v)),
    }
}

// ----------------------------------------------------------------
// Utility functions

fn parse_double(s: &str) -> Option<f64> {
    match s {
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other => other.parse::<f64>().ok().filter(|v| !v.is_nan()),
    }
}

fn parse_binary(v: &Value) -> Option<Value> {
    let inner = v.as_document()?;
    if inner.len() != 2 {
        return None;
    }
    let bytes = STANDARD.decode(inner.get("base64")?.as_str()?).ok()?;
    let subtype = u8::from_str_radix(inner.get("subType")?.as_str()?, 16).ok()?;
    Some(Value::Binary(Binary::new(subtype, bytes)))
}

fn parse_timestamp(v: &Value) -> Option<Value> {
    let inner = v.as_document()?;
    if inner.len() != 2 {
        return None;
    }
    let time = u32::try_from(inner.get("t")?.as_i64()?).ok()?;
    let increment = u32::try_from(inner.get("i")?.as_i64()?).ok()?;
    Some(Value::Timestamp(Timestamp { time, increment }))
}

fn parse_regex(v: &Value) -> Option<Value> {
    let inner = v.as_document()?;
    if inner.len() != 2 {
        return None;
    }
    let pattern = inner.get("pattern")?.as_str()?;
    let options = inner.get("options")?.as_str()?;
    Some(Value::RegularExpression(Regex::new(pattern, options)))
}

/// `$date` payloads: `{"$numberLong":"ms"}` (already decoded to Int64), a
/// bare integer, or an RFC 3339 string.
fn parse_date(v: &Value) -> Option<Value> {
    let ms = match v {
        Value::Int32(_) | Value::Int64(_) => v.as_i64()?,
        Value::String(s) => DateTime::parse_from_rfc3339(s).ok()?.timestamp_millis(),
        _ => return None,
    };
    Some(Value::DateTime(ms))
}

/// Decodes a JSON string body (content between quotes), handling escape
/// sequences.
fn decode_json_string(bytes: &[u8]) -> Option<String> {
    if !bytes.contains(&b'\\') {
        return std::str::from_utf8(bytes).ok().map(str::to_owned);
    }
    // Wrap in quotes and use serde_json for proper unescaping
    let mut quoted = Vec::with_capacity(bytes.len() + 2);
    quoted.push(b'"');
    quoted.extend_from_slice(bytes);
    quoted.push(b'"');
    serde_json::from_slice(&quoted).ok()
}
