use docmap_bson::{doc, Value, ValueKind};
use docmap_core::read::{element_value, property_value, read_entity};
use docmap_core::{
    EntityTypeBuilder, MappingError, MissingReason, ModelOptions, NativeValue, PropertyBuilder, RepresentationConfig,
    SerializerResolver, StaticType,
};

fn customer() -> docmap_core::EntityType {
    EntityTypeBuilder::new("Customer")
        .property(PropertyBuilder::new("Id", StaticType::I32))
        .property(PropertyBuilder::new("Name", StaticType::String))
        .property(PropertyBuilder::new("Age", StaticType::I32))
        .property(PropertyBuilder::new("Score", StaticType::nullable(StaticType::I64)))
        .property(PropertyBuilder::new("Tier", StaticType::I32).default_when_missing(1))
        .property(
            PropertyBuilder::new("Visits", StaticType::I64).representation(RepresentationConfig::new(ValueKind::String)),
        )
        .build(&ModelOptions::default())
        .unwrap()
}

#[test]
fn reads_every_stored_property_in_order() {
    let entity = customer();
    let stored = doc! {
        "_id" => 3,
        "Name" => "Ada",
        "Age" => 36,
        "Score" => 10i64,
        "Tier" => 2,
        "Visits" => "12",
    };
    let values = read_entity(&SerializerResolver::new(), &entity, &stored).unwrap();
    let names: Vec<&str> = values.keys().map(String::as_str).collect();
    assert_eq!(names, ["Id", "Name", "Age", "Score", "Tier", "Visits"]);
    assert_eq!(values["Id"], NativeValue::I32(3));
    assert_eq!(values["Score"], NativeValue::I64(10));
    assert_eq!(values["Visits"], NativeValue::I64(12));
}

#[test]
fn missing_elements_fall_back_to_defaults_or_null() {
    let entity = customer();
    let resolver = SerializerResolver::new();
    let stored = doc! { "_id" => 3, "Age" => 1, "Visits" => "0" };
    let values = read_entity(&resolver, &entity, &stored).unwrap();
    assert_eq!(values["Name"], NativeValue::Null);
    assert_eq!(values["Score"], NativeValue::Null);
    assert_eq!(values["Tier"], NativeValue::I32(1));
}

#[test]
fn required_elements_must_be_present_and_non_null() {
    let entity = customer();
    let resolver = SerializerResolver::new();
    let age = entity.property("Age").unwrap();

    let err = property_value(&resolver, age, &doc! { "_id" => 3 }).unwrap_err();
    assert_eq!(
        err,
        MappingError::MissingRequiredValue {
            property: "Age".into(),
            reason: MissingReason::Missing,
        }
    );
    assert_eq!(
        err.to_string(),
        "document element is missing for required non-nullable property 'Age'"
    );

    let err = property_value(&resolver, age, &doc! { "Age" => Value::Null }).unwrap_err();
    assert_eq!(
        err,
        MappingError::MissingRequiredValue {
            property: "Age".into(),
            reason: MissingReason::Null,
        }
    );
}

#[test]
fn composite_key_members_are_read_from_the_id_document() {
    let entity = EntityTypeBuilder::new("Line")
        .property(PropertyBuilder::new("OrderId", StaticType::I32))
        .property(PropertyBuilder::new("LineNo", StaticType::I32))
        .key(["OrderId", "LineNo"])
        .build(&ModelOptions::default())
        .unwrap();
    let stored = doc! { "_id" => doc! { "OrderId" => 4, "LineNo" => 2 } };
    let values = read_entity(&SerializerResolver::new(), &entity, &stored).unwrap();
    assert_eq!(values["OrderId"], NativeValue::I32(4));
    assert_eq!(values["LineNo"], NativeValue::I32(2));
}

#[test]
fn owned_keys_are_not_read() {
    let entity = EntityTypeBuilder::owned("Item")
        .property(PropertyBuilder::new("OwnerId", StaticType::I32).owner_key())
        .property(PropertyBuilder::new("Ordinal", StaticType::I32).ordinal_key())
        .property(PropertyBuilder::new("Sku", StaticType::String))
        .build(&ModelOptions::default())
        .unwrap();
    let values = read_entity(&SerializerResolver::new(), &entity, &doc! { "Sku" => "a" }).unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values["Sku"], NativeValue::from("a"));
}

#[test]
fn element_value_follows_the_requested_type() {
    let resolver = SerializerResolver::new();
    let stored = doc! { "n" => 5, "s" => Value::Null };
    assert_eq!(
        element_value(&resolver, &stored, "n", &StaticType::I64).unwrap(),
        NativeValue::I64(5)
    );
    assert_eq!(
        element_value(&resolver, &stored, "s", &StaticType::String).unwrap(),
        NativeValue::Null
    );
    assert_eq!(
        element_value(&resolver, &stored, "missing", &StaticType::nullable(StaticType::I32)).unwrap(),
        NativeValue::Null
    );
    assert!(matches!(
        element_value(&resolver, &stored, "missing", &StaticType::I32),
        Err(MappingError::MissingRequiredValue {
            reason: MissingReason::Missing,
            ..
        })
    ));
}
