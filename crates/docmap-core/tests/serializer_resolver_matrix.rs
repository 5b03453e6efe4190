use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use docmap_bson::{doc, Binary, Decimal128, ObjectId, Value, ValueKind};
use docmap_core::native::EnumType;
use docmap_core::serializer::{FnConverter, RepresentationConfig, SerializerResolver, ValueConverter};
use docmap_core::{MappingError, NativeValue, StaticType};
use uuid::Uuid;

fn color() -> StaticType {
    StaticType::Enum(EnumType::new("Color", [("Red", 1), ("Green", 2)]))
}

fn store(ty: &StaticType, value: NativeValue) -> Value {
    SerializerResolver::new()
        .resolve(ty, None, None)
        .unwrap()
        .serialize(&value)
        .unwrap()
}

fn store_as(ty: &StaticType, config: RepresentationConfig, value: NativeValue) -> Result<Value, MappingError> {
    SerializerResolver::new().resolve(ty, None, Some(&config))?.serialize(&value)
}

#[test]
fn default_representations_matrix() {
    let when = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let guid = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
    let oid = ObjectId::from_bytes([1; 12]);
    let cases: Vec<(StaticType, NativeValue, Value)> = vec![
        (StaticType::Bool, NativeValue::Bool(true), Value::Boolean(true)),
        (StaticType::I8, NativeValue::I8(-5), Value::Int32(-5)),
        (StaticType::I16, NativeValue::I16(300), Value::Int32(300)),
        (StaticType::I32, NativeValue::I32(7), Value::Int32(7)),
        (StaticType::U8, NativeValue::U8(255), Value::Int32(255)),
        (StaticType::U16, NativeValue::U16(65535), Value::Int32(65535)),
        (StaticType::Char, NativeValue::Char('A'), Value::Int32(65)),
        (StaticType::I64, NativeValue::I64(1 << 40), Value::Int64(1 << 40)),
        (StaticType::U32, NativeValue::U32(u32::MAX), Value::Int64(i64::from(u32::MAX))),
        (StaticType::U64, NativeValue::U64(9), Value::Int64(9)),
        (StaticType::F32, NativeValue::F32(1.5), Value::Double(1.5)),
        (StaticType::F64, NativeValue::F64(-0.25), Value::Double(-0.25)),
        (
            StaticType::Decimal128,
            NativeValue::Decimal("12.50".parse().unwrap()),
            Value::Decimal128("12.50".parse().unwrap()),
        ),
        (StaticType::String, NativeValue::from("x"), Value::from("x")),
        (StaticType::DateTime, NativeValue::DateTime(when), Value::DateTime(1_577_836_800_000)),
        (StaticType::Guid, NativeValue::Guid(guid), Value::Binary(Binary::uuid(*guid.as_bytes()))),
        (StaticType::ObjectId, NativeValue::ObjectId(oid), Value::ObjectId(oid)),
        (StaticType::TimeSpan, NativeValue::TimeSpan(TimeDelta::minutes(90)), Value::from("01:30:00")),
        (color(), NativeValue::I64(2), Value::Int32(2)),
    ];
    for (ty, native, expected) in cases {
        assert_eq!(store(&ty, native.clone()), expected, "{ty}");
        let back = SerializerResolver::new().resolve_type(&ty).unwrap().deserialize(&expected).unwrap();
        match (&ty, &back) {
            (StaticType::Enum(_), NativeValue::Enum(member)) => assert_eq!(member.name, "Green"),
            _ => assert_eq!(back, native, "{ty}"),
        }
    }
}

#[test]
fn allowed_retargets() {
    let cases: Vec<(StaticType, ValueKind, NativeValue, Value)> = vec![
        (StaticType::I32, ValueKind::String, NativeValue::I32(5), Value::from("5")),
        (StaticType::I32, ValueKind::Int64, NativeValue::I32(5), Value::Int64(5)),
        (StaticType::I64, ValueKind::Double, NativeValue::I64(3), Value::Double(3.0)),
        (
            StaticType::I32,
            ValueKind::Decimal128,
            NativeValue::I32(42),
            Value::Decimal128(Decimal128::from_i64(42)),
        ),
        (StaticType::Bool, ValueKind::Int32, NativeValue::Bool(true), Value::Int32(1)),
        (StaticType::Bool, ValueKind::String, NativeValue::Bool(false), Value::from("false")),
        (StaticType::Char, ValueKind::String, NativeValue::Char('z'), Value::from("z")),
        (
            StaticType::String,
            ValueKind::ObjectId,
            NativeValue::from("0101010101010101010101ff"),
            Value::ObjectId("0101010101010101010101ff".parse().unwrap()),
        ),
        (StaticType::String, ValueKind::Symbol, NativeValue::from("s"), Value::Symbol("s".into())),
        (
            StaticType::ObjectId,
            ValueKind::String,
            NativeValue::ObjectId(ObjectId::from_bytes([0xab; 12])),
            Value::from("abababababababababababab"),
        ),
        (
            StaticType::Guid,
            ValueKind::String,
            NativeValue::Guid(Uuid::nil()),
            Value::from("00000000-0000-0000-0000-000000000000"),
        ),
        (
            StaticType::TimeSpan,
            ValueKind::Int64,
            NativeValue::TimeSpan(TimeDelta::seconds(1)),
            Value::Int64(10_000_000),
        ),
        (color(), ValueKind::String, NativeValue::I32(1), Value::from("Red")),
        (color(), ValueKind::Int64, NativeValue::I32(2), Value::Int64(2)),
    ];
    let resolver = SerializerResolver::new();
    for (ty, kind, native, expected) in cases {
        let s = resolver.resolve(&ty, None, Some(&RepresentationConfig::new(kind))).unwrap();
        let stored = s.serialize(&native).unwrap();
        assert_eq!(stored, expected, "{ty} as {kind}");
        assert!(s.deserialize(&stored).is_ok(), "{ty} as {kind}");
    }
}

#[test]
fn disallowed_retargets_fail() {
    let cases = [
        (StaticType::String, ValueKind::Int32),
        (StaticType::I32, ValueKind::Boolean),
        (StaticType::Guid, ValueKind::Int64),
        (StaticType::DateTime, ValueKind::Double),
        (StaticType::dictionary(StaticType::String, StaticType::I32), ValueKind::String),
    ];
    let resolver = SerializerResolver::new();
    for (ty, kind) in cases {
        let err = resolver
            .resolve(&ty, None, Some(&RepresentationConfig::new(kind)))
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::InvalidRepresentation {
                ty: ty.to_string(),
                kind
            }
        );
    }
}

#[test]
fn overflow_and_truncation_flags_are_independent() {
    let big = NativeValue::I64(i64::from(i32::MAX) + 1);
    assert!(matches!(
        store_as(&StaticType::I64, RepresentationConfig::new(ValueKind::Int32), big.clone()),
        Err(MappingError::NumericOverflow { .. })
    ));
    assert_eq!(
        store_as(
            &StaticType::I64,
            RepresentationConfig::new(ValueKind::Int32).allow_overflow(true),
            big
        )
        .unwrap(),
        Value::Int32(i32::MIN)
    );

    let fractional = NativeValue::F64(2.5);
    assert!(matches!(
        store_as(
            &StaticType::F64,
            RepresentationConfig::new(ValueKind::Int32).allow_overflow(true),
            fractional.clone()
        ),
        Err(MappingError::NumericTruncation { .. })
    ));
    assert_eq!(
        store_as(
            &StaticType::F64,
            RepresentationConfig::new(ValueKind::Int32).allow_truncation(true),
            fractional
        )
        .unwrap(),
        Value::Int32(2)
    );
}

#[test]
fn flags_apply_when_reading_into_a_narrower_type() {
    let resolver = SerializerResolver::new();
    let strict = resolver.resolve_type(&StaticType::I32).unwrap();
    assert!(matches!(
        strict.deserialize(&Value::Int64(1 << 40)),
        Err(MappingError::NumericOverflow { .. })
    ));
    assert!(matches!(
        strict.deserialize(&Value::Double(1.5)),
        Err(MappingError::NumericTruncation { .. })
    ));
    let lenient = resolver
        .resolve(
            &StaticType::I32,
            None,
            Some(&RepresentationConfig::new(ValueKind::Int32).allow_truncation(true)),
        )
        .unwrap();
    assert_eq!(lenient.deserialize(&Value::Double(1.5)).unwrap(), NativeValue::I32(1));
}

#[test]
fn nullable_wrapper_passes_null_and_delegates_representation() {
    let ty = StaticType::nullable(StaticType::I32);
    let s = SerializerResolver::new()
        .resolve(&ty, None, Some(&RepresentationConfig::new(ValueKind::Int64)))
        .unwrap();
    assert_eq!(s.serialize(&NativeValue::I32(5)).unwrap(), Value::Int64(5));
    assert_eq!(s.serialize(&NativeValue::Null).unwrap(), Value::Null);
    assert_eq!(s.deserialize(&Value::Null).unwrap(), NativeValue::Null);
    assert_eq!(s.value_type(), &ty);
}

#[test]
fn collections_and_dictionaries() {
    assert_eq!(
        store(
            &StaticType::list(StaticType::I32),
            NativeValue::List(vec![NativeValue::I32(1), NativeValue::I32(2)])
        ),
        Value::Array(vec![Value::Int32(1), Value::Int32(2)])
    );
    assert_eq!(
        store(
            &StaticType::dictionary(StaticType::String, StaticType::I64),
            NativeValue::Dictionary(vec![(NativeValue::from("b"), NativeValue::I64(1)), (NativeValue::from("a"), NativeValue::I64(2))])
        ),
        Value::Document(doc! { "b" => 1i64, "a" => 2i64 })
    );
}

#[test]
fn converter_applies_representation_to_the_provider_type() {
    let cents = |v: &NativeValue| match v {
        NativeValue::F64(amount) => Ok(NativeValue::I64((amount * 100.0).round() as i64)),
        other => Err(MappingError::Converter(format!("not an amount: {}", other.describe()))),
    };
    let amount = |v: &NativeValue| match v.as_i64() {
        Some(c) => Ok(NativeValue::F64(c as f64 / 100.0)),
        None => Err(MappingError::Converter("not cents".into())),
    };
    let converter: Arc<dyn ValueConverter> =
        Arc::new(FnConverter::new(StaticType::Named("Money".into()), StaticType::I64, cents, amount));
    let s = SerializerResolver::new()
        .resolve(
            &StaticType::Named("Money".into()),
            Some(&converter),
            Some(&RepresentationConfig::new(ValueKind::String)),
        )
        .unwrap();

    assert_eq!(s.serialize(&NativeValue::F64(12.5)).unwrap(), Value::from("1250"));
    assert_eq!(s.deserialize(&Value::from("1250")).unwrap(), NativeValue::F64(12.5));
    assert_eq!(s.serialize(&NativeValue::Null).unwrap(), Value::Null);
    assert!(matches!(
        s.serialize(&NativeValue::from("nope")),
        Err(MappingError::Converter(_))
    ));
}

#[test]
fn unmapped_types_are_named() {
    let resolver = SerializerResolver::new();
    for ty in [
        StaticType::Named("Widget".into()),
        StaticType::nullable(StaticType::Named("Widget".into())),
        StaticType::dictionary(StaticType::String, StaticType::Named("Widget".into())),
    ] {
        assert_eq!(
            resolver.resolve(&ty, None, None).unwrap_err(),
            MappingError::UnsupportedType("Widget".into())
        );
    }
}
