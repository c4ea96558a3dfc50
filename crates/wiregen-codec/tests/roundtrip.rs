//! Integration tests for encoding and decoding a realistic schema.
//!
//! These tests exercise the full pipeline: a struct with scalar, temporal,
//! optional, list, enum, and union fields, wired through name mappings and
//! a registry with a self-referential forward reference.

use serde_json::json;
use wiregen_codec::{CodecError, CodecOptions, decode, decode_with, encode, encode_with};
use wiregen_model::{
    AltDesc, ClassRegistry, Date, Datetime, EnumDesc, EnumValue, FieldDesc, ModelError,
    NameMapping, NameMappings, StructDesc, StructValue, TypeDesc, UnionDesc, UnionValue, Value,
    Zone, parse_temporal,
};

use std::sync::Arc;

// ============================================================================
// Fixture schema
// ============================================================================

struct Fixture {
    event: Arc<StructDesc>,
    payload: Arc<UnionDesc>,
    severity: Arc<EnumDesc>,
    mappings: NameMappings,
    registry: ClassRegistry,
}

fn fixture() -> Fixture {
    let severity = EnumDesc::new("Severity", ["low", "high"]).unwrap();
    let payload = UnionDesc::new(
        "Payload",
        vec![
            AltDesc::new("text", TypeDesc::Str),
            AltDesc::new("count", TypeDesc::Int),
        ],
    )
    .unwrap();
    let event = StructDesc::new(
        "Event",
        vec![
            FieldDesc::required("id", TypeDesc::Int),
            FieldDesc::required("label", TypeDesc::Str),
            FieldDesc::required("when", TypeDesc::Date),
            FieldDesc::optional("at", TypeDesc::Datetime),
            FieldDesc::required("severity", TypeDesc::Enum(severity.clone())),
            FieldDesc::required("tags", TypeDesc::list(TypeDesc::Str)),
            // Both references resolve through the registry at decode time.
            FieldDesc::required("payload", TypeDesc::name("Payload")),
            FieldDesc::optional("parent", TypeDesc::name("Event")),
        ],
    )
    .unwrap();

    let mut mappings = NameMappings::new();
    mappings.insert(
        "Event",
        NameMapping::new([
            ("id", "eventId"),
            ("label", "label"),
            ("when", "occurredOn"),
            ("at", "recordedAt"),
            ("severity", "severity"),
            ("tags", "tags"),
            ("payload", "payload"),
            ("parent", "parent"),
        ])
        .unwrap(),
    );
    mappings.insert(
        "Payload",
        NameMapping::new([("text", "textPayload"), ("count", "countPayload")]).unwrap(),
    );
    mappings.insert(
        "Severity",
        NameMapping::new([("low", "LOW"), ("high", "HIGH")]).unwrap(),
    );

    let mut registry = ClassRegistry::new();
    registry.register_struct(event.clone());
    registry.register_union(payload.clone());
    registry.register_enum(severity.clone());

    Fixture {
        event,
        payload,
        severity,
        mappings,
        registry,
    }
}

/// A fully populated event, including the optional fields.
fn full_event(fx: &Fixture) -> Value {
    let at = Datetime::new(Date::new(2018, 6, 25).unwrap(), 4, 0, 0)
        .unwrap()
        .with_zone(Zone::Utc);
    let parent = StructValue::new(
        fx.event.clone(),
        [
            ("id", Value::Int(1)),
            ("label", Value::from("root")),
            ("when", Value::Date(Date::new(2018, 6, 24).unwrap())),
            (
                "severity",
                Value::Enum(EnumValue::new(fx.severity.clone(), "low").unwrap()),
            ),
            ("tags", Value::List(vec![])),
            (
                "payload",
                Value::Union(
                    UnionValue::select(fx.payload.clone(), "count", Value::Int(7)).unwrap(),
                ),
            ),
        ],
    )
    .unwrap();

    Value::Struct(
        StructValue::new(
            fx.event.clone(),
            [
                ("id", Value::Int(2)),
                ("label", Value::from("deploy")),
                ("when", Value::Date(Date::new(2018, 6, 25).unwrap())),
                ("at", Value::Datetime(at)),
                (
                    "severity",
                    Value::Enum(EnumValue::new(fx.severity.clone(), "high").unwrap()),
                ),
                (
                    "tags",
                    Value::List(vec![Value::from("prod"), Value::from("eu")]),
                ),
                (
                    "payload",
                    Value::Union(
                        UnionValue::select(fx.payload.clone(), "text", Value::from("ok")).unwrap(),
                    ),
                ),
                ("parent", Value::Struct(parent)),
            ],
        )
        .unwrap(),
    )
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_encode_emits_wire_names_in_declared_order() {
    let fx = fixture();
    let tree = encode(&full_event(&fx), &fx.mappings).unwrap();
    insta::assert_snapshot!(
        tree.to_string(),
        @r#"{"eventId":2,"label":"deploy","occurredOn":"2018-06-25","recordedAt":"2018-06-25T04:00:00Z","severity":"HIGH","tags":["prod","eu"],"payload":{"textPayload":"ok"},"parent":{"eventId":1,"label":"root","occurredOn":"2018-06-24","severity":"LOW","tags":[],"payload":{"countPayload":7}}}"#
    );
}

#[test]
fn test_encode_omits_absent_optional_fields() {
    let fx = fixture();
    let Value::Struct(outer) = full_event(&fx) else {
        unreachable!()
    };
    let Some(Value::Struct(sparse)) = outer.get("parent").unwrap().cloned() else {
        panic!("parent field missing");
    };
    let tree = encode(&Value::Struct(sparse), &fx.mappings).unwrap();
    let object = tree.as_object().unwrap();
    assert!(!object.contains_key("recordedAt"));
    assert!(!object.contains_key("parent"));
    assert_eq!(object.len(), 6);
}

#[test]
fn test_encode_union_is_single_entry_map() {
    let fx = fixture();
    let value = Value::Union(
        UnionValue::select(fx.payload.clone(), "count", Value::Int(12)).unwrap(),
    );
    let tree = encode(&value, &fx.mappings).unwrap();
    assert_eq!(tree, json!({ "countPayload": 12 }));
}

#[test]
fn test_encode_fails_without_mapping() {
    let fx = fixture();
    let value = Value::Enum(EnumValue::new(fx.severity.clone(), "low").unwrap());
    let err = encode(&value, &NameMappings::new()).unwrap_err();
    assert_eq!(err, CodecError::missing_mapping("Severity"));
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_full_event_roundtrip() {
    let fx = fixture();
    let value = full_event(&fx);
    let tree = encode(&value, &fx.mappings).unwrap();
    let back = decode(
        &TypeDesc::Struct(fx.event.clone()),
        &tree,
        &fx.mappings,
        &fx.registry,
    )
    .unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_sparse_event_roundtrip_preserves_absence() {
    let fx = fixture();
    let Value::Struct(outer) = full_event(&fx) else {
        unreachable!()
    };
    let Some(sparse) = outer.get("parent").unwrap().cloned() else {
        panic!("parent field missing");
    };
    let tree = encode(&sparse, &fx.mappings).unwrap();
    let back = decode(
        &TypeDesc::Struct(fx.event.clone()),
        &tree,
        &fx.mappings,
        &fx.registry,
    )
    .unwrap();
    let Value::Struct(back) = back else {
        panic!("expected a struct back");
    };
    assert_eq!(back.get("at").unwrap(), None);
    assert_eq!(back.get("parent").unwrap(), None);
    assert_eq!(back.get("id").unwrap(), Some(&Value::Int(1)));
}

#[test]
fn test_fractional_timestamp_survives_byte_for_byte() {
    let fx = fixture();
    let parsed = parse_temporal("2016-01-01T08:54:33.000001+04:02").unwrap();
    let wiregen_model::Temporal::Datetime(dt) = parsed else {
        panic!("expected a timestamp");
    };
    let value = Value::Datetime(dt);
    let tree = encode(&value, &fx.mappings).unwrap();
    assert_eq!(tree, json!("2016-01-01T08:54:33.000001+04:02"));
    let back = decode(&TypeDesc::Datetime, &tree, &fx.mappings, &fx.registry).unwrap();
    assert_eq!(back, value);
}

// ============================================================================
// Decoding failures
// ============================================================================

#[test]
fn test_decode_unknown_wire_name() {
    let fx = fixture();
    let tree = json!({ "eventId": 1, "bogus": true });
    let err = decode(
        &TypeDesc::Struct(fx.event.clone()),
        &tree,
        &fx.mappings,
        &fx.registry,
    )
    .unwrap_err();
    assert_eq!(err, CodecError::unknown_wire_name("Event", "bogus"));
}

#[test]
fn test_decode_unknown_enum_wire_name() {
    let fx = fixture();
    let err = decode(
        &TypeDesc::Enum(fx.severity.clone()),
        &json!("MEDIUM"),
        &fx.mappings,
        &fx.registry,
    )
    .unwrap_err();
    assert_eq!(err, CodecError::unknown_wire_name("Severity", "MEDIUM"));
}

#[test]
fn test_decode_union_arity_is_revalidated() {
    let fx = fixture();
    let target = TypeDesc::Union(fx.payload.clone());

    let err = decode(&target, &json!({}), &fx.mappings, &fx.registry).unwrap_err();
    assert_eq!(
        err,
        CodecError::Model(ModelError::Arity {
            type_name: "Payload".to_owned(),
            given: 0,
        })
    );

    let both = json!({ "textPayload": "a", "countPayload": 1 });
    let err = decode(&target, &both, &fx.mappings, &fx.registry).unwrap_err();
    assert_eq!(
        err,
        CodecError::Model(ModelError::Arity {
            type_name: "Payload".to_owned(),
            given: 2,
        })
    );
}

#[test]
fn test_decode_missing_required_field_is_revalidated() {
    let fx = fixture();
    let tree = json!({ "eventId": 1 });
    let err = decode(
        &TypeDesc::Struct(fx.event.clone()),
        &tree,
        &fx.mappings,
        &fx.registry,
    )
    .unwrap_err();
    assert_eq!(
        err,
        CodecError::Model(ModelError::missing_field("Event", "label"))
    );
}

#[test]
fn test_decode_unresolved_forward_reference() {
    let fx = fixture();
    // A registry without "Payload" cannot decode the payload field.
    let mut registry = ClassRegistry::new();
    registry.register_struct(fx.event.clone());
    registry.register_enum(fx.severity.clone());

    let tree = encode(&full_event(&fx), &fx.mappings).unwrap();
    let err = decode(
        &TypeDesc::Struct(fx.event.clone()),
        &tree,
        &fx.mappings,
        &registry,
    )
    .unwrap_err();
    assert_eq!(err, CodecError::unknown_type("Payload"));
}

#[test]
fn test_decode_depth_guard() {
    let fx = fixture();
    let mut target = TypeDesc::Int;
    let mut tree = json!(1);
    for _ in 0..40 {
        target = TypeDesc::list(target);
        tree = json!([tree]);
    }
    let err = decode(&target, &tree, &fx.mappings, &fx.registry).unwrap_err();
    assert_eq!(err, CodecError::DepthExceeded { limit: 32 });

    // A raised limit admits the same tree.
    let options = CodecOptions::new().with_max_depth(64);
    let back = decode_with(&target, &tree, &fx.mappings, &fx.registry, &options).unwrap();
    let mut inner = &back;
    while let Value::List(items) = inner {
        inner = &items[0];
    }
    assert_eq!(inner, &Value::Int(1));
}

#[test]
fn test_encode_depth_guard_matches_decode() {
    let fx = fixture();
    let mut value = Value::Int(1);
    for _ in 0..40 {
        value = Value::List(vec![value]);
    }
    let err = encode(&value, &fx.mappings).unwrap_err();
    assert_eq!(err, CodecError::DepthExceeded { limit: 32 });

    let options = CodecOptions::new().with_max_depth(64);
    encode_with(&value, &fx.mappings, &options).unwrap();
}

proptest::proptest! {
    #[test]
    fn prop_int_list_roundtrip(items in proptest::collection::vec(proptest::num::i64::ANY, 0..20)) {
        let fx = fixture();
        let value = Value::List(items.into_iter().map(Value::Int).collect());
        let tree = encode(&value, &fx.mappings).unwrap();
        let back = decode(
            &TypeDesc::list(TypeDesc::Int),
            &tree,
            &fx.mappings,
            &fx.registry,
        )
        .unwrap();
        proptest::prop_assert_eq!(back, value);
    }
}

#[test]
fn test_decode_struct_from_non_object() {
    let fx = fixture();
    let err = decode(
        &TypeDesc::Struct(fx.event.clone()),
        &json!("not an object"),
        &fx.mappings,
        &fx.registry,
    )
    .unwrap_err();
    assert_eq!(err, CodecError::type_mismatch("an object", "a string"));
}
