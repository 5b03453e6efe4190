//! Extended JSON encoder.
//!
//! Produces compact text where typed values are encoded as `$`-prefixed
//! wrapper objects (e.g. `{"$oid":"..."}`). [`TextMode::Native`] writes
//! 32- and 64-bit integers as bare numbers; [`TextMode::Strict`] wraps them.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use uuid::Uuid;

use crate::decimal128::Decimal128;
use crate::document::Document;
use crate::object_id::ObjectId;
use crate::value::{Binary, JavaScriptCodeWithScope, Regex, Timestamp, Value};

use super::escape::escape_into;
use super::TextMode;

/// Extended JSON encoder, writing into an owned `String` buffer.
#[derive(Debug, Default)]
pub struct TextEncoder {
    out: String,
    mode: TextMode,
}

impl TextEncoder {
    pub fn new(mode: TextMode) -> Self {
        Self {
            out: String::new(),
            mode,
        }
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    /// Encodes a document, returning the text and clearing the buffer.
    pub fn encode_document(&mut self, doc: &Document) -> String {
        self.out.clear();
        self.write_document(doc);
        std::mem::take(&mut self.out)
    }

    /// Encodes a single value, returning the text and clearing the buffer.
    pub fn encode_value(&mut self, value: &Value) -> String {
        self.out.clear();
        self.write_any(value);
        std::mem::take(&mut self.out)
    }

    // ----------------------------------------------------------------
    // Core write dispatch

    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Boolean(b) => self.write_boolean(*b),
            Value::Int32(v) => self.write_int32(*v),
            Value::Int64(v) => self.write_int64(*v),
            Value::Double(v) => self.write_double(*v),
            Value::Decimal128(v) => self.write_decimal128(v),
            Value::String(s) => self.write_str(s),
            Value::ObjectId(id) => self.write_object_id(id),
            Value::DateTime(ms) => self.write_date_time(*ms),
            Value::Binary(b) => self.write_binary(b),
            Value::Document(doc) => self.write_document(doc),
            Value::Array(items) => self.write_array(items),
            Value::JavaScriptCode(code) => self.write_code(code),
            Value::JavaScriptCodeWithScope(v) => self.write_code_with_scope(v),
            Value::RegularExpression(re) => self.write_regex(re),
            Value::Symbol(s) => self.write_symbol(s),
            Value::Timestamp(ts) => self.write_timestamp(ts),
            Value::MaxKey => self.out.push_str("{\"$maxKey\":1}"),
            Value::MinKey => self.out.push_str("{\"$minKey\":1}"),
            Value::Undefined => self.out.push_str("{\"$undefined\":true}"),
        }
    }

    // ----------------------------------------------------------------
    // Primitives

    pub fn write_boolean(&mut self, b: bool) {
        self.out.push_str(if b { "true" } else { "false" });
    }

    /// Writes a quoted, escaped JSON string.
    pub fn write_str(&mut self, s: &str) {
        self.out.push('"');
        escape_into(&mut self.out, s);
        self.out.push('"');
    }

    pub fn write_array(&mut self, items: &[Value]) {
        self.out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.write_any(item);
        }
        self.out.push(']');
    }

    pub fn write_document(&mut self, doc: &Document) {
        self.out.push('{');
        for (i, (name, value)) in doc.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.write_str(name);
            self.out.push(':');
            self.write_any(value);
        }
        self.out.push('}');
    }

    // ----------------------------------------------------------------
    // Numbers

    fn write_int32(&mut self, v: i32) {
        match self.mode {
            TextMode::Native => self.out.push_str(&v.to_string()),
            TextMode::Strict => self.write_wrapped_string("$numberInt", &v.to_string()),
        }
    }

    fn write_int64(&mut self, v: i64) {
        match self.mode {
            TextMode::Native => self.out.push_str(&v.to_string()),
            TextMode::Strict => self.write_wrapped_string("$numberLong", &v.to_string()),
        }
    }

    fn write_double(&mut self, v: f64) {
        self.write_wrapped_string("$numberDouble", &format_double(v));
    }

    fn write_decimal128(&mut self, v: &Decimal128) {
        self.write_wrapped_string("$numberDecimal", &v.to_string());
    }

    // ----------------------------------------------------------------
    // Typed wrappers

    fn write_object_id(&mut self, id: &ObjectId) {
        self.write_wrapped_string("$oid", &id.to_hex());
    }

    fn write_date_time(&mut self, ms: i64) {
        // {"$date":{"$numberLong":"ms"}}
        self.out.push_str("{\"$date\":");
        self.write_wrapped_string("$numberLong", &ms.to_string());
        self.out.push('}');
    }

    fn write_binary(&mut self, b: &Binary) {
        if let Some(bytes) = b.as_uuid_bytes() {
            self.write_wrapped_string("$guid", &Uuid::from_bytes(bytes).to_string());
            return;
        }
        // {"$binary":{"base64":"...","subType":"XX"}}
        self.out.push_str("{\"$binary\":{\"base64\":\"");
        self.out.push_str(&STANDARD.encode(&b.bytes));
        self.out.push_str("\",\"subType\":\"");
        self.out.push_str(&format!("{:02X}", b.subtype));
        self.out.push_str("\"}}");
    }

    fn write_regex(&mut self, re: &Regex) {
        // {"$regularExpression":{"options":"...","pattern":"..."}}
        self.out.push_str("{\"$regularExpression\":{\"options\":");
        self.write_str(&re.options);
        self.out.push_str(",\"pattern\":");
        self.write_str(&re.pattern);
        self.out.push_str("}}");
    }

    fn write_code(&mut self, code: &str) {
        self.out.push_str("{\"$code\":");
        self.write_str(code);
        self.out.push('}');
    }

    fn write_code_with_scope(&mut self, v: &JavaScriptCodeWithScope) {
        self.out.push_str("{\"$code\":");
        self.write_str(&v.code);
        self.out.push_str(",\"$scope\":");
        self.write_document(&v.scope);
        self.out.push('}');
    }

    fn write_symbol(&mut self, s: &str) {
        self.out.push_str("{\"$symbol\":");
        self.write_str(s);
        self.out.push('}');
    }

    fn write_timestamp(&mut self, ts: &Timestamp) {
        // {"$timestamp":{"t":N,"i":N}}
        self.out.push_str("{\"$timestamp\":{\"t\":");
        self.out.push_str(&ts.time.to_string());
        self.out.push_str(",\"i\":");
        self.out.push_str(&ts.increment.to_string());
        self.out.push_str("}}");
    }

    /// `{"<key>":"<text>"}` where `text` needs no escaping.
    fn write_wrapped_string(&mut self, key: &str, text: &str) {
        self.out.push_str("{\"");
        self.out.push_str(key);
        self.out.push_str("\":\"");
        self.out.push_str(text);
        self.out.push_str("\"}");
    }
}

// ----------------------------------------------------------------
// Utility functions

/// Shortest decimal text that parses back to the same `f64`.
fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "Infinity".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{v:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_text_is_shortest_round_trip() {
        for v in [0.0, -0.0, 1.0, 0.1, -2.5, 1e300, 5e-324, f64::MAX] {
            let text = format_double(v);
            assert_eq!(text.parse::<f64>().unwrap().to_bits(), v.to_bits(), "{text}");
        }
        assert_eq!(format_double(1.0), "1.0");
        assert_eq!(format_double(0.1), "0.1");
    }

    #[test]
    fn encoder_buffer_is_reusable() {
        let mut enc = TextEncoder::new(TextMode::Strict);
        assert_eq!(enc.encode_value(&Value::Int32(1)), r#"{"$numberInt":"1"}"#);
        assert_eq!(enc.encode_value(&Value::Null), "null");
    }
}
