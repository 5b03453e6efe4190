//! Serializers for single-valued types.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeDelta, TimeZone, Utc};
use docmap_bson::{doc, Binary, ObjectId, Value, ValueKind};
use uuid::Uuid;

use super::numeric::{Numeric, RepresentationConverter};
use super::{
    invalid_value, unexpected_value, ConverterConfigurable, RepresentationConfigurable, Serializer, ValueSerializer,
};
use crate::error::MappingError;
use crate::native::{EnumType, NativeValue, StaticType};

/// 100-nanosecond ticks between 0001-01-01 and the Unix epoch.
pub(crate) const UNIX_EPOCH_TICKS: i128 = 621_355_968_000_000_000;
const TICKS_PER_SECOND: i128 = 10_000_000;
const TICKS_PER_DAY: i128 = TICKS_PER_SECOND * 86_400;

/// The value kind a scalar type is stored as when no representation is
/// requested. `None` for types without a scalar serializer.
pub fn default_representation(ty: &StaticType) -> Option<ValueKind> {
    Some(match ty {
        StaticType::Bool => ValueKind::Boolean,
        StaticType::I8 | StaticType::I16 | StaticType::I32 | StaticType::U8 | StaticType::U16 | StaticType::Char => {
            ValueKind::Int32
        }
        StaticType::I64 | StaticType::U32 | StaticType::U64 => ValueKind::Int64,
        StaticType::F32 | StaticType::F64 => ValueKind::Double,
        StaticType::Decimal | StaticType::Decimal128 => ValueKind::Decimal128,
        StaticType::String => ValueKind::String,
        StaticType::DateTime => ValueKind::DateTime,
        StaticType::DateTimeOffset => ValueKind::Array,
        StaticType::Guid => ValueKind::Binary,
        StaticType::ObjectId => ValueKind::ObjectId,
        StaticType::TimeSpan => ValueKind::String,
        StaticType::Enum(_) => ValueKind::Int32,
        _ => return None,
    })
}

/// Whether a scalar type may be stored as `kind`.
pub fn is_representation_allowed(ty: &StaticType, kind: ValueKind) -> bool {
    use ValueKind as K;
    match ty {
        t if t.is_numeric() => matches!(kind, K::Int32 | K::Int64 | K::Double | K::Decimal128 | K::String),
        StaticType::Bool => matches!(
            kind,
            K::Boolean | K::Int32 | K::Int64 | K::Double | K::Decimal128 | K::String
        ),
        StaticType::String => matches!(kind, K::String | K::ObjectId | K::Symbol),
        StaticType::Char => matches!(kind, K::Int32 | K::String),
        StaticType::ObjectId => matches!(kind, K::ObjectId | K::String),
        StaticType::Guid => matches!(kind, K::Binary | K::String),
        StaticType::DateTime => matches!(kind, K::DateTime | K::Int64 | K::String),
        StaticType::DateTimeOffset => matches!(kind, K::Array | K::Document | K::String | K::DateTime),
        StaticType::TimeSpan => matches!(kind, K::String | K::Int32 | K::Int64 | K::Double),
        StaticType::Enum(_) => matches!(kind, K::Int32 | K::Int64 | K::String),
        _ => false,
    }
}

/// Serializer for one scalar type and one stored representation.
#[derive(Debug, Clone)]
pub struct ScalarSerializer {
    ty: StaticType,
    representation: ValueKind,
    converter: RepresentationConverter,
}

impl ScalarSerializer {
    /// The default serializer for `ty`, or `None` when `ty` is not scalar.
    pub fn new(ty: StaticType) -> Option<Self> {
        let representation = default_representation(&ty)?;
        Some(Self {
            ty,
            representation,
            converter: RepresentationConverter::default(),
        })
    }

    pub fn converter(&self) -> RepresentationConverter {
        self.converter
    }

    fn serialize_numeric(&self, value: &NativeValue) -> Result<Value, MappingError> {
        let n = Numeric::from_native(value).ok_or_else(|| invalid_value(&self.ty, value))?;
        let c = &self.converter;
        Ok(match self.representation {
            ValueKind::Int32 => Value::Int32(c.to_integer(&n, i32::MIN.into(), i32::MAX.into(), "Int32")? as i32),
            ValueKind::Int64 => Value::Int64(c.to_integer(&n, i64::MIN.into(), i64::MAX.into(), "Int64")? as i64),
            ValueKind::Double => Value::Double(c.to_f64(&n)?),
            ValueKind::Decimal128 => Value::Decimal128(c.to_decimal128(&n)?),
            _ => Value::String(numeric_text(&c.to_native(&n, &self.ty)?)),
        })
    }

    fn deserialize_numeric(&self, value: &Value) -> Result<NativeValue, MappingError> {
        let n = match value {
            Value::String(s) => Numeric::parse(s, &self.ty).ok_or_else(|| MappingError::InvalidValue {
                ty: self.ty.to_string(),
                value: s.clone(),
            })?,
            other => Numeric::from_value(other).ok_or_else(|| unexpected_value(&self.ty, other))?,
        };
        self.converter.to_native(&n, &self.ty)
    }

    fn serialize_bool(&self, b: bool) -> Value {
        match self.representation {
            ValueKind::Int32 => Value::Int32(i32::from(b)),
            ValueKind::Int64 => Value::Int64(i64::from(b)),
            ValueKind::Double => Value::Double(if b { 1.0 } else { 0.0 }),
            ValueKind::Decimal128 => Value::Decimal128(docmap_bson::Decimal128::from_i64(i64::from(b))),
            ValueKind::String => Value::String(b.to_string()),
            _ => Value::Boolean(b),
        }
    }

    fn deserialize_bool(&self, value: &Value) -> Result<NativeValue, MappingError> {
        let b = match value {
            Value::Boolean(b) => *b,
            Value::Int32(v) => *v != 0,
            Value::Int64(v) => *v != 0,
            Value::Double(v) => *v != 0.0 && !v.is_nan(),
            Value::Decimal128(d) => d.normalize() != docmap_bson::Decimal128::ZERO && !d.is_nan(),
            Value::String(s) if s.eq_ignore_ascii_case("true") => true,
            Value::String(s) if s.eq_ignore_ascii_case("false") => false,
            Value::String(s) => {
                return Err(MappingError::InvalidValue {
                    ty: self.ty.to_string(),
                    value: s.clone(),
                })
            }
            other => return Err(unexpected_value(&self.ty, other)),
        };
        Ok(NativeValue::Bool(b))
    }

    fn serialize_string(&self, s: &str) -> Result<Value, MappingError> {
        Ok(match self.representation {
            ValueKind::ObjectId => Value::ObjectId(ObjectId::parse_str(s).map_err(|_| MappingError::InvalidValue {
                ty: "ObjectId".to_owned(),
                value: s.to_owned(),
            })?),
            ValueKind::Symbol => Value::Symbol(s.to_owned()),
            _ => Value::String(s.to_owned()),
        })
    }

    fn serialize_char(&self, c: char) -> Value {
        match self.representation {
            ValueKind::String => Value::String(c.to_string()),
            _ => Value::Int32(c as i32),
        }
    }

    fn deserialize_char(&self, value: &Value) -> Result<NativeValue, MappingError> {
        let invalid = |text: String| MappingError::InvalidValue {
            ty: self.ty.to_string(),
            value: text,
        };
        match value {
            Value::Int32(v) => u32::try_from(*v)
                .ok()
                .and_then(char::from_u32)
                .map(NativeValue::Char)
                .ok_or_else(|| invalid(v.to_string())),
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(NativeValue::Char(c)),
                    _ => Err(invalid(s.clone())),
                }
            }
            other => Err(unexpected_value(&self.ty, other)),
        }
    }

    fn serialize_guid(&self, g: &Uuid) -> Value {
        match self.representation {
            ValueKind::String => Value::String(g.hyphenated().to_string()),
            _ => Value::Binary(Binary::uuid(*g.as_bytes())),
        }
    }

    fn deserialize_guid(&self, value: &Value) -> Result<NativeValue, MappingError> {
        match value {
            Value::Binary(b) if b.bytes.len() == 16 && b.subtype == Binary::UUID_SUBTYPE => {
                let bytes: [u8; 16] = b.bytes.as_slice().try_into().map_err(|_| unexpected_value(&self.ty, value))?;
                Ok(NativeValue::Guid(Uuid::from_bytes(bytes)))
            }
            Value::Binary(b) if b.bytes.len() == 16 && b.subtype == Binary::UUID_LEGACY_SUBTYPE => {
                let bytes: [u8; 16] = b.bytes.as_slice().try_into().map_err(|_| unexpected_value(&self.ty, value))?;
                Ok(NativeValue::Guid(Uuid::from_bytes_le(bytes)))
            }
            Value::String(s) => Uuid::parse_str(s)
                .map(NativeValue::Guid)
                .map_err(|_| MappingError::InvalidValue {
                    ty: self.ty.to_string(),
                    value: s.clone(),
                }),
            other => Err(unexpected_value(&self.ty, other)),
        }
    }

    fn serialize_date_time(&self, dt: &DateTime<Utc>) -> Result<Value, MappingError> {
        Ok(match self.representation {
            ValueKind::Int64 => Value::Int64(i64_ticks(ticks_from_utc(dt), &self.ty)?),
            ValueKind::String => Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            _ => Value::DateTime(dt.timestamp_millis()),
        })
    }

    fn deserialize_date_time(&self, value: &Value) -> Result<NativeValue, MappingError> {
        let dt = match value {
            Value::DateTime(ms) => DateTime::from_timestamp_millis(*ms),
            Value::Int64(ticks) => utc_from_ticks(i128::from(*ticks)),
            Value::String(s) => DateTime::parse_from_rfc3339(s).ok().map(|d| d.with_timezone(&Utc)),
            other => return Err(unexpected_value(&self.ty, other)),
        };
        dt.map(NativeValue::DateTime).ok_or_else(|| MappingError::InvalidValue {
            ty: self.ty.to_string(),
            value: format!("{value:?}"),
        })
    }

    fn serialize_date_time_offset(&self, dt: &DateTime<FixedOffset>) -> Result<Value, MappingError> {
        let local_ticks = || i64_ticks(ticks_from_utc(&dt.naive_local().and_utc()), &self.ty);
        let offset_minutes = dt.offset().local_minus_utc() / 60;
        Ok(match self.representation {
            ValueKind::Document => Value::Document(doc! {
                "DateTime" => Value::DateTime(dt.timestamp_millis()),
                "Ticks" => Value::Int64(local_ticks()?),
                "Offset" => Value::Int32(offset_minutes),
            }),
            ValueKind::String => Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
            ValueKind::DateTime => Value::DateTime(dt.timestamp_millis()),
            _ => Value::Array(vec![Value::Int64(local_ticks()?), Value::Int32(offset_minutes)]),
        })
    }

    fn deserialize_date_time_offset(&self, value: &Value) -> Result<NativeValue, MappingError> {
        let from_parts = |ticks: Option<i64>, minutes: Option<i64>| -> Option<DateTime<FixedOffset>> {
            let local: NaiveDateTime = utc_from_ticks(i128::from(ticks?))?.naive_utc();
            let offset = FixedOffset::east_opt(i32::try_from(minutes?).ok()?.checked_mul(60)?)?;
            offset.from_local_datetime(&local).single()
        };
        let dt = match value {
            Value::Array(items) if items.len() == 2 => from_parts(items[0].as_i64(), items[1].as_i64()),
            Value::Document(d) => from_parts(
                d.get("Ticks").and_then(Value::as_i64),
                d.get("Offset").and_then(Value::as_i64),
            ),
            Value::String(s) => DateTime::parse_from_rfc3339(s).ok(),
            Value::DateTime(ms) => DateTime::from_timestamp_millis(*ms).map(|d| d.fixed_offset()),
            other => return Err(unexpected_value(&self.ty, other)),
        };
        dt.map(NativeValue::DateTimeOffset).ok_or_else(|| MappingError::InvalidValue {
            ty: self.ty.to_string(),
            value: format!("{value:?}"),
        })
    }

    fn serialize_time_span(&self, td: &TimeDelta) -> Result<Value, MappingError> {
        let ticks = Numeric::Int(ticks_from_delta(td));
        let c = &self.converter;
        Ok(match self.representation {
            ValueKind::Int32 => Value::Int32(c.to_integer(&ticks, i32::MIN.into(), i32::MAX.into(), "Int32")? as i32),
            ValueKind::Int64 => Value::Int64(c.to_integer(&ticks, i64::MIN.into(), i64::MAX.into(), "Int64")? as i64),
            ValueKind::Double => Value::Double(c.to_f64(&ticks)?),
            _ => Value::String(format_time_span(td)),
        })
    }

    fn deserialize_time_span(&self, value: &Value) -> Result<NativeValue, MappingError> {
        let invalid = || MappingError::InvalidValue {
            ty: self.ty.to_string(),
            value: format!("{value:?}"),
        };
        let ticks = match value {
            Value::String(s) => return parse_time_span(s).map(NativeValue::TimeSpan).ok_or_else(invalid),
            other => Numeric::from_value(other).ok_or_else(|| unexpected_value(&self.ty, other))?,
        };
        let ticks = self.converter.to_integer(&ticks, i64::MIN.into(), i64::MAX.into(), "TimeSpan")?;
        delta_from_ticks(ticks).map(NativeValue::TimeSpan).ok_or_else(invalid)
    }

    fn serialize_enum(&self, e: &EnumType, value: &NativeValue) -> Result<Value, MappingError> {
        let member = match value {
            NativeValue::Enum(m) => m.clone(),
            other => match other.as_i64() {
                Some(v) => e.member_for(v),
                None => return Err(invalid_value(&self.ty, value)),
            },
        };
        let n = Numeric::Int(member.value.into());
        Ok(match self.representation {
            ValueKind::String => Value::String(member.name),
            ValueKind::Int64 => Value::Int64(member.value),
            _ => Value::Int32(
                self.converter
                    .to_integer(&n, i32::MIN.into(), i32::MAX.into(), &e.name)? as i32,
            ),
        })
    }

    fn deserialize_enum(&self, e: &EnumType, value: &Value) -> Result<NativeValue, MappingError> {
        if let Some(v) = value.as_i64() {
            return Ok(NativeValue::Enum(e.member_for(v)));
        }
        match value {
            Value::String(s) => e
                .value_of(s)
                .map(NativeValue::Enum)
                .ok_or_else(|| MappingError::InvalidValue {
                    ty: e.name.clone(),
                    value: s.clone(),
                }),
            other => Err(unexpected_value(&self.ty, other)),
        }
    }
}

impl ValueSerializer for ScalarSerializer {
    fn value_type(&self) -> &StaticType {
        &self.ty
    }

    fn serialize(&self, value: &NativeValue) -> Result<Value, MappingError> {
        match (&self.ty, value) {
            (StaticType::String, NativeValue::Null) => Ok(Value::Null),
            (_, NativeValue::Null) => Err(invalid_value(&self.ty, value)),
            (t, _) if t.is_numeric() => self.serialize_numeric(value),
            (StaticType::Bool, NativeValue::Bool(b)) => Ok(self.serialize_bool(*b)),
            (StaticType::String, NativeValue::String(s)) => self.serialize_string(s),
            (StaticType::Char, NativeValue::Char(c)) => Ok(self.serialize_char(*c)),
            (StaticType::ObjectId, NativeValue::ObjectId(id)) => Ok(match self.representation {
                ValueKind::String => Value::String(id.to_hex()),
                _ => Value::ObjectId(*id),
            }),
            (StaticType::Guid, NativeValue::Guid(g)) => Ok(self.serialize_guid(g)),
            (StaticType::DateTime, NativeValue::DateTime(dt)) => self.serialize_date_time(dt),
            (StaticType::DateTimeOffset, NativeValue::DateTimeOffset(dt)) => self.serialize_date_time_offset(dt),
            (StaticType::TimeSpan, NativeValue::TimeSpan(td)) => self.serialize_time_span(td),
            (StaticType::Enum(e), v) => self.serialize_enum(e, v),
            _ => Err(invalid_value(&self.ty, value)),
        }
    }

    fn deserialize(&self, value: &Value) -> Result<NativeValue, MappingError> {
        match (&self.ty, value) {
            (StaticType::String, Value::Null) => Ok(NativeValue::Null),
            (t, _) if t.is_numeric() => self.deserialize_numeric(value),
            (StaticType::Bool, v) => self.deserialize_bool(v),
            (StaticType::String, Value::String(s) | Value::Symbol(s)) => Ok(NativeValue::String(s.clone())),
            (StaticType::String, Value::ObjectId(id)) => Ok(NativeValue::String(id.to_hex())),
            (StaticType::Char, v) => self.deserialize_char(v),
            (StaticType::ObjectId, Value::ObjectId(id)) => Ok(NativeValue::ObjectId(*id)),
            (StaticType::ObjectId, Value::String(s)) => ObjectId::parse_str(s)
                .map(NativeValue::ObjectId)
                .map_err(|_| MappingError::InvalidValue {
                    ty: self.ty.to_string(),
                    value: s.clone(),
                }),
            (StaticType::Guid, v) => self.deserialize_guid(v),
            (StaticType::DateTime, v) => self.deserialize_date_time(v),
            (StaticType::DateTimeOffset, v) => self.deserialize_date_time_offset(v),
            (StaticType::TimeSpan, v) => self.deserialize_time_span(v),
            (StaticType::Enum(e), v) => self.deserialize_enum(e, v),
            _ => Err(unexpected_value(&self.ty, value)),
        }
    }

    fn as_representation_configurable(&self) -> Option<&dyn RepresentationConfigurable> {
        Some(self)
    }

    fn as_converter_configurable(&self) -> Option<&dyn ConverterConfigurable> {
        if self.ty.is_numeric() {
            Some(self)
        } else {
            None
        }
    }
}

impl RepresentationConfigurable for ScalarSerializer {
    fn representation(&self) -> ValueKind {
        self.representation
    }

    fn with_representation(&self, kind: ValueKind) -> Result<Serializer, MappingError> {
        if !is_representation_allowed(&self.ty, kind) {
            return Err(MappingError::InvalidRepresentation {
                ty: self.ty.to_string(),
                kind,
            });
        }
        Ok(Arc::new(Self {
            representation: kind,
            ..self.clone()
        }))
    }
}

impl ConverterConfigurable for ScalarSerializer {
    fn converter(&self) -> RepresentationConverter {
        self.converter
    }

    fn with_converter(&self, converter: RepresentationConverter) -> Serializer {
        Arc::new(Self {
            converter,
            ..self.clone()
        })
    }
}

// ----------------------------------------------------------------
// Utility functions

fn numeric_text(value: &NativeValue) -> String {
    match value {
        NativeValue::I8(v) => v.to_string(),
        NativeValue::I16(v) => v.to_string(),
        NativeValue::I32(v) => v.to_string(),
        NativeValue::I64(v) => v.to_string(),
        NativeValue::U8(v) => v.to_string(),
        NativeValue::U16(v) => v.to_string(),
        NativeValue::U32(v) => v.to_string(),
        NativeValue::U64(v) => v.to_string(),
        NativeValue::F32(v) => v.to_string(),
        NativeValue::F64(v) => v.to_string(),
        NativeValue::Decimal(d) => d.to_string(),
        other => other.describe(),
    }
}

fn i64_ticks(ticks: i128, ty: &StaticType) -> Result<i64, MappingError> {
    i64::try_from(ticks).map_err(|_| MappingError::NumericOverflow {
        value: ticks.to_string(),
        target: format!("{ty} ticks"),
    })
}

pub(crate) fn ticks_from_utc(dt: &DateTime<Utc>) -> i128 {
    UNIX_EPOCH_TICKS + i128::from(dt.timestamp()) * TICKS_PER_SECOND + i128::from(dt.timestamp_subsec_nanos() / 100)
}

pub(crate) fn utc_from_ticks(ticks: i128) -> Option<DateTime<Utc>> {
    let since_epoch = ticks - UNIX_EPOCH_TICKS;
    let secs = i64::try_from(since_epoch.div_euclid(TICKS_PER_SECOND)).ok()?;
    let nanos = (since_epoch.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

fn ticks_from_delta(td: &TimeDelta) -> i128 {
    i128::from(td.num_seconds()) * TICKS_PER_SECOND + i128::from(td.subsec_nanos() / 100)
}

fn delta_from_ticks(ticks: i128) -> Option<TimeDelta> {
    let secs = i64::try_from(ticks / TICKS_PER_SECOND).ok()?;
    let rest = (ticks % TICKS_PER_SECOND) as i64;
    TimeDelta::try_seconds(secs)?.checked_add(&TimeDelta::nanoseconds(rest * 100))
}

/// `[-][d.]hh:mm:ss[.fffffff]`
pub(crate) fn format_time_span(td: &TimeDelta) -> String {
    let ticks = ticks_from_delta(td);
    let sign = if ticks < 0 { "-" } else { "" };
    let abs = ticks.unsigned_abs();
    let days = abs / TICKS_PER_DAY as u128;
    let rem = abs % TICKS_PER_DAY as u128;
    let secs_total = rem / TICKS_PER_SECOND as u128;
    let fraction = rem % TICKS_PER_SECOND as u128;
    let (hours, minutes, seconds) = (secs_total / 3600, (secs_total / 60) % 60, secs_total % 60);

    let mut out = String::from(sign);
    if days > 0 {
        out.push_str(&format!("{days}."));
    }
    out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if fraction > 0 {
        out.push_str(&format!(".{fraction:07}"));
    }
    out
}

pub(crate) fn parse_time_span(text: &str) -> Option<TimeDelta> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut parts = body.splitn(3, ':');
    let head = parts.next()?;
    let minutes_text = parts.next()?;
    let seconds_text = parts.next()?;

    let (days, hours) = match head.split_once('.') {
        Some((d, h)) => (parse_digits(d)?, parse_digits(h)?),
        None => (0, parse_digits(head)?),
    };
    let minutes = parse_digits(minutes_text)?;
    let (seconds, fraction) = match seconds_text.split_once('.') {
        Some((s, f)) if !f.is_empty() && f.len() <= 7 => {
            let scaled = format!("{f:0<7}");
            (parse_digits(s)?, parse_digits(&scaled)?)
        }
        Some(_) => return None,
        None => (parse_digits(seconds_text)?, 0),
    };
    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return None;
    }

    let ticks = ((days * 24 + hours) * 3600 + minutes * 60 + seconds) * TICKS_PER_SECOND + fraction;
    delta_from_ticks(if negative { -ticks } else { ticks })
}

fn parse_digits(s: &str) -> Option<i128> {
    if s.is_empty() || s.len() > 20 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(ty: StaticType) -> ScalarSerializer {
        ScalarSerializer::new(ty).unwrap()
    }

    #[test]
    fn time_span_text_form() {
        let td = TimeDelta::days(1) + TimeDelta::hours(2) + TimeDelta::minutes(3) + TimeDelta::seconds(4);
        assert_eq!(format_time_span(&td), "1.02:03:04");
        assert_eq!(format_time_span(&TimeDelta::milliseconds(-1500)), "-00:00:01.5000000");
        assert_eq!(format_time_span(&TimeDelta::zero()), "00:00:00");
        assert_eq!(parse_time_span("1.02:03:04"), Some(td));
        assert_eq!(parse_time_span("-00:00:01.5"), Some(TimeDelta::milliseconds(-1500)));
        assert_eq!(parse_time_span("24:00:00"), None);
        assert_eq!(parse_time_span("1:2"), None);
    }

    #[test]
    fn ticks_match_the_dotnet_epoch() {
        let epoch = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(ticks_from_utc(&epoch), UNIX_EPOCH_TICKS);
        assert_eq!(utc_from_ticks(UNIX_EPOCH_TICKS + 10), DateTime::from_timestamp(0, 1_000));
    }

    #[test]
    fn date_time_offset_array_form() {
        let dt = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(1970, 1, 1, 2, 0, 0)
            .unwrap();
        let s = scalar(StaticType::DateTimeOffset);
        let stored = s.serialize(&NativeValue::DateTimeOffset(dt)).unwrap();
        let two_hours = 2 * 3600 * TICKS_PER_SECOND;
        assert_eq!(
            stored,
            Value::Array(vec![
                Value::Int64((UNIX_EPOCH_TICKS + two_hours) as i64),
                Value::Int32(120)
            ])
        );
        assert_eq!(s.deserialize(&stored).unwrap(), NativeValue::DateTimeOffset(dt));
    }

    #[test]
    fn guid_reads_legacy_byte_order() {
        let g = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
        let legacy = Value::Binary(Binary::new(Binary::UUID_LEGACY_SUBTYPE, g.to_bytes_le().to_vec()));
        assert_eq!(scalar(StaticType::Guid).deserialize(&legacy).unwrap(), NativeValue::Guid(g));
    }

    #[test]
    fn char_is_stored_as_code_point() {
        let s = scalar(StaticType::Char);
        assert_eq!(s.serialize(&NativeValue::Char('A')).unwrap(), Value::Int32(65));
        assert_eq!(s.deserialize(&Value::Int32(0x3bb)).unwrap(), NativeValue::Char('λ'));
        assert!(s.deserialize(&Value::Int32(-1)).is_err());
    }

    #[test]
    fn null_is_only_valid_for_reference_types() {
        assert_eq!(scalar(StaticType::String).serialize(&NativeValue::Null).unwrap(), Value::Null);
        assert!(matches!(
            scalar(StaticType::I32).serialize(&NativeValue::Null),
            Err(MappingError::InvalidValue { .. })
        ));
    }
}
