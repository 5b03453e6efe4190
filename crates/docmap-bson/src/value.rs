//! Document value types.
//!
//! [`Value`] is the closed set of element kinds a stored document may hold.
//! Structured payloads (binary, regular expressions, timestamps, scoped code)
//! get their own small structs so that callers can construct them by name.

use std::fmt;

use crate::decimal128::Decimal128;
use crate::document::Document;
use crate::object_id::ObjectId;

/// Binary data (subtype + raw bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binary {
    pub subtype: u8,
    pub bytes: Vec<u8>,
}

impl Binary {
    /// Generic binary data.
    pub const GENERIC_SUBTYPE: u8 = 0x00;
    /// UUID stored in the legacy, driver-specific byte order.
    pub const UUID_LEGACY_SUBTYPE: u8 = 0x03;
    /// UUID stored in RFC 4122 byte order.
    pub const UUID_SUBTYPE: u8 = 0x04;
    pub const MD5_SUBTYPE: u8 = 0x05;
    pub const USER_DEFINED_SUBTYPE: u8 = 0x80;

    pub fn new(subtype: u8, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            subtype,
            bytes: bytes.into(),
        }
    }

    pub fn generic(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Self::GENERIC_SUBTYPE, bytes)
    }

    /// A standard-subtype UUID.
    pub fn uuid(bytes: [u8; 16]) -> Self {
        Self::new(Self::UUID_SUBTYPE, bytes.to_vec())
    }

    /// Returns the 16 UUID bytes when this is a well-formed standard UUID.
    pub fn as_uuid_bytes(&self) -> Option<[u8; 16]> {
        if self.subtype != Self::UUID_SUBTYPE {
            return None;
        }
        self.bytes.as_slice().try_into().ok()
    }
}

/// Regular expression (pattern + option letters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Regex {
    pub pattern: String,
    pub options: String,
}

impl Regex {
    pub fn new(pattern: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            options: options.into(),
        }
    }
}

/// Replication timestamp: seconds since the epoch plus an ordinal within
/// that second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub time: u32,
    pub increment: u32,
}

/// JavaScript code carrying its own variable scope.
#[derive(Debug, Clone, PartialEq)]
pub struct JavaScriptCodeWithScope {
    pub code: String,
    pub scope: Document,
}

/// Discriminant of a [`Value`], used for representation targets and
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ValueKind {
    Null,
    Boolean,
    Int32,
    Int64,
    Double,
    Decimal128,
    String,
    ObjectId,
    DateTime,
    Binary,
    Document,
    Array,
    JavaScriptCode,
    JavaScriptCodeWithScope,
    RegularExpression,
    Symbol,
    Timestamp,
    MaxKey,
    MinKey,
    Undefined,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A value that can appear as a document field value or array element.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Decimal128(Decimal128),
    String(String),
    ObjectId(ObjectId),
    /// UTC instant in milliseconds since the Unix epoch.
    DateTime(i64),
    Binary(Binary),
    Document(Document),
    Array(Vec<Value>),
    JavaScriptCode(String),
    JavaScriptCodeWithScope(JavaScriptCodeWithScope),
    RegularExpression(Regex),
    Symbol(String),
    Timestamp(Timestamp),
    MaxKey,
    MinKey,
    Undefined,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Int32(_) => ValueKind::Int32,
            Value::Int64(_) => ValueKind::Int64,
            Value::Double(_) => ValueKind::Double,
            Value::Decimal128(_) => ValueKind::Decimal128,
            Value::String(_) => ValueKind::String,
            Value::ObjectId(_) => ValueKind::ObjectId,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Binary(_) => ValueKind::Binary,
            Value::Document(_) => ValueKind::Document,
            Value::Array(_) => ValueKind::Array,
            Value::JavaScriptCode(_) => ValueKind::JavaScriptCode,
            Value::JavaScriptCodeWithScope(_) => ValueKind::JavaScriptCodeWithScope,
            Value::RegularExpression(_) => ValueKind::RegularExpression,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::MaxKey => ValueKind::MaxKey,
            Value::MinKey => ValueKind::MinKey,
            Value::Undefined => ValueKind::Undefined,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Integer payload of an Int32 or Int64 value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Decimal128> for Value {
    fn from(v: Decimal128) -> Self {
        Value::Decimal128(v)
    }
}

impl From<ObjectId> for Value {
    fn from(v: ObjectId) -> Self {
        Value::ObjectId(v)
    }
}

impl From<Binary> for Value {
    fn from(v: Binary) -> Self {
        Value::Binary(v)
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Value::Document(v)
    }
}

impl From<Regex> for Value {
    fn from(v: Regex) -> Self {
        Value::RegularExpression(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
