use docmap_bson::{
    value_from_text, value_to_text, Binary, Decimal128, Document, JavaScriptCodeWithScope, ObjectId, Regex, TextMode,
    Timestamp, Value,
};
use proptest::prelude::*;

fn field_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_ .-]{0,8}"
}

fn decimal() -> impl Strategy<Value = Decimal128> {
    (any::<bool>(), -6176i32..=6111, 0u128..=9_999_999_999_999_999_999_999_999_999_999_999)
        .prop_filter_map("in range", |(neg, exp, coeff)| Decimal128::from_parts(neg, exp, coeff).ok())
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::MaxKey),
        Just(Value::MinKey),
        Just(Value::Undefined),
        any::<bool>().prop_map(Value::Boolean),
        any::<i32>().prop_map(Value::Int32),
        any::<i64>().prop_map(Value::Int64),
        any::<f64>().prop_filter("NaN never equals itself", |v| !v.is_nan()).prop_map(Value::Double),
        decimal().prop_map(Value::Decimal128),
        any::<String>().prop_map(Value::String),
        any::<[u8; 12]>().prop_map(|b| Value::ObjectId(ObjectId::from_bytes(b))),
        any::<i64>().prop_map(Value::DateTime),
        (any::<u8>(), prop::collection::vec(any::<u8>(), 0..20))
            .prop_map(|(subtype, bytes)| Value::Binary(Binary::new(subtype, bytes))),
        any::<[u8; 16]>().prop_map(|b| Value::Binary(Binary::uuid(b))),
        any::<String>().prop_map(Value::JavaScriptCode),
        (any::<String>(), "[imsx]{0,4}").prop_map(|(p, o)| Value::RegularExpression(Regex::new(p, o))),
        any::<String>().prop_map(Value::Symbol),
        (any::<u32>(), any::<u32>()).prop_map(|(time, increment)| Value::Timestamp(Timestamp { time, increment })),
    ]
}

fn document_of(inner: impl Strategy<Value = Value>) -> impl Strategy<Value = Document> {
    prop::collection::vec((field_name(), inner), 0..5).prop_map(|fields| fields.into_iter().collect())
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            document_of(inner.clone()).prop_map(Value::Document),
            (any::<String>(), document_of(inner))
                .prop_map(|(code, scope)| Value::JavaScriptCodeWithScope(JavaScriptCodeWithScope { code, scope })),
        ]
    })
}

proptest! {
    #[test]
    fn strict_text_decodes_to_the_encoded_value(v in value()) {
        let text = value_to_text(&v, TextMode::Strict);
        prop_assert_eq!(value_from_text(&text).unwrap(), v);
    }

    #[test]
    fn encoding_is_deterministic(v in value()) {
        prop_assert_eq!(value_to_text(&v, TextMode::Strict), value_to_text(&v, TextMode::Strict));
        prop_assert_eq!(value_to_text(&v, TextMode::Native), value_to_text(&v, TextMode::Native));
    }

    #[test]
    fn native_text_is_a_fixed_point(v in value()) {
        let text = value_to_text(&v, TextMode::Native);
        let reparsed = value_from_text(&text).unwrap();
        prop_assert_eq!(value_to_text(&reparsed, TextMode::Native), text);
    }

    #[test]
    fn decimal_render_then_parse_is_identity(d in decimal()) {
        prop_assert_eq!(d.to_string().parse::<Decimal128>().unwrap(), d);
    }
}
