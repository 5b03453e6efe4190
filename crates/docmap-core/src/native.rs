//! In-memory property values and their static types.
//!
//! [`NativeValue`] is what a change tracker hands the translator and what
//! the read-back helpers return. [`StaticType`] is the declared type of a
//! property; serializers are resolved from it.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use docmap_bson::{Decimal128, ObjectId};
use uuid::Uuid;

/// A member of a declared enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
}

/// A declared enumeration: its name and ordered `(member, value)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<(String, i64)>,
}

impl EnumType {
    pub fn new<S: Into<String>>(name: impl Into<String>, members: impl IntoIterator<Item = (S, i64)>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }

    pub fn value_of(&self, member: &str) -> Option<EnumValue> {
        self.members
            .iter()
            .find(|(n, _)| n == member)
            .map(|(n, v)| EnumValue { name: n.clone(), value: *v })
    }

    /// The member with `value`. Values without a named member keep their
    /// number as the name.
    pub fn member_for(&self, value: i64) -> EnumValue {
        let name = self
            .members
            .iter()
            .find(|(_, v)| *v == value)
            .map_or_else(|| value.to_string(), |(n, _)| n.clone());
        EnumValue { name, value }
    }
}

/// Declared type of a property or of a serializer's native side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StaticType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Fixed-point decimal with 28 significant digits of range.
    Decimal,
    Decimal128,
    String,
    Char,
    DateTime,
    DateTimeOffset,
    Guid,
    ObjectId,
    TimeSpan,
    Enum(EnumType),
    Nullable(Box<StaticType>),
    Array(Box<StaticType>),
    List(Box<StaticType>),
    Dictionary(Box<StaticType>, Box<StaticType>),
    /// A type the mapper knows only by name, such as an unmapped class.
    Named(String),
}

impl StaticType {
    pub fn nullable(inner: StaticType) -> Self {
        StaticType::Nullable(Box::new(inner))
    }

    pub fn list(element: StaticType) -> Self {
        StaticType::List(Box::new(element))
    }

    pub fn array(element: StaticType) -> Self {
        StaticType::Array(Box::new(element))
    }

    pub fn dictionary(key: StaticType, value: StaticType) -> Self {
        StaticType::Dictionary(Box::new(key), Box::new(value))
    }

    /// Whether `null` is a legal value of this type.
    pub fn accepts_null(&self) -> bool {
        matches!(
            self,
            StaticType::Nullable(_)
                | StaticType::String
                | StaticType::Array(_)
                | StaticType::List(_)
                | StaticType::Dictionary(..)
                | StaticType::Named(_)
        )
    }

    /// The type with any `Nullable` wrapper removed.
    pub fn underlying(&self) -> &StaticType {
        match self {
            StaticType::Nullable(inner) => inner.underlying(),
            other => other,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            StaticType::I8
                | StaticType::I16
                | StaticType::I32
                | StaticType::I64
                | StaticType::U8
                | StaticType::U16
                | StaticType::U32
                | StaticType::U64
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                StaticType::F32 | StaticType::F64 | StaticType::Decimal | StaticType::Decimal128
            )
    }
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaticType::Bool => f.write_str("bool"),
            StaticType::I8 => f.write_str("i8"),
            StaticType::I16 => f.write_str("i16"),
            StaticType::I32 => f.write_str("i32"),
            StaticType::I64 => f.write_str("i64"),
            StaticType::U8 => f.write_str("u8"),
            StaticType::U16 => f.write_str("u16"),
            StaticType::U32 => f.write_str("u32"),
            StaticType::U64 => f.write_str("u64"),
            StaticType::F32 => f.write_str("f32"),
            StaticType::F64 => f.write_str("f64"),
            StaticType::Decimal => f.write_str("decimal"),
            StaticType::Decimal128 => f.write_str("Decimal128"),
            StaticType::String => f.write_str("String"),
            StaticType::Char => f.write_str("char"),
            StaticType::DateTime => f.write_str("DateTime"),
            StaticType::DateTimeOffset => f.write_str("DateTimeOffset"),
            StaticType::Guid => f.write_str("Guid"),
            StaticType::ObjectId => f.write_str("ObjectId"),
            StaticType::TimeSpan => f.write_str("TimeSpan"),
            StaticType::Enum(e) => f.write_str(&e.name),
            StaticType::Nullable(inner) => write!(f, "Option<{inner}>"),
            StaticType::Array(inner) => write!(f, "[{inner}]"),
            StaticType::List(inner) => write!(f, "List<{inner}>"),
            StaticType::Dictionary(k, v) => write!(f, "Dictionary<{k}, {v}>"),
            StaticType::Named(name) => f.write_str(name),
        }
    }
}

/// A property value as held by the in-memory entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NativeValue {
    #[default]
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal128),
    String(String),
    Char(char),
    DateTime(DateTime<Utc>),
    DateTimeOffset(DateTime<FixedOffset>),
    Guid(Uuid),
    ObjectId(ObjectId),
    TimeSpan(TimeDelta),
    Enum(EnumValue),
    List(Vec<NativeValue>),
    /// Ordered key/value pairs.
    Dictionary(Vec<(NativeValue, NativeValue)>),
}

impl NativeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload of any integer-typed value that fits `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            NativeValue::I8(v) => Some(i64::from(v)),
            NativeValue::I16(v) => Some(i64::from(v)),
            NativeValue::I32(v) => Some(i64::from(v)),
            NativeValue::I64(v) => Some(v),
            NativeValue::U8(v) => Some(i64::from(v)),
            NativeValue::U16(v) => Some(i64::from(v)),
            NativeValue::U32(v) => Some(i64::from(v)),
            NativeValue::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            NativeValue::String(s) => format!("{s:?}"),
            NativeValue::Enum(e) => e.name.clone(),
            other => format!("{other:?}"),
        }
    }
}

impl From<bool> for NativeValue {
    fn from(v: bool) -> Self {
        NativeValue::Bool(v)
    }
}

impl From<i32> for NativeValue {
    fn from(v: i32) -> Self {
        NativeValue::I32(v)
    }
}

impl From<i64> for NativeValue {
    fn from(v: i64) -> Self {
        NativeValue::I64(v)
    }
}

impl From<f64> for NativeValue {
    fn from(v: f64) -> Self {
        NativeValue::F64(v)
    }
}

impl From<&str> for NativeValue {
    fn from(v: &str) -> Self {
        NativeValue::String(v.to_owned())
    }
}

impl From<String> for NativeValue {
    fn from(v: String) -> Self {
        NativeValue::String(v)
    }
}

impl From<Uuid> for NativeValue {
    fn from(v: Uuid) -> Self {
        NativeValue::Guid(v)
    }
}

impl From<ObjectId> for NativeValue {
    fn from(v: ObjectId) -> Self {
        NativeValue::ObjectId(v)
    }
}

impl From<Decimal128> for NativeValue {
    fn from(v: Decimal128) -> Self {
        NativeValue::Decimal(v)
    }
}

impl From<DateTime<Utc>> for NativeValue {
    fn from(v: DateTime<Utc>) -> Self {
        NativeValue::DateTime(v)
    }
}

impl From<TimeDelta> for NativeValue {
    fn from(v: TimeDelta) -> Self {
        NativeValue::TimeSpan(v)
    }
}

impl<T: Into<NativeValue>> From<Option<T>> for NativeValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(NativeValue::Null, Into::into)
    }
}
