//! Conversion from JSON trees back to schema values.

use serde_json::Value as JsonValue;
use wiregen_model::temporal::parse_temporal;
use wiregen_model::{
    ClassRegistry, EnumValue, ModelError, NameMappings, StructValue, Temporal, TypeDesc,
    UnionValue, Value,
};

use crate::error::{CodecError, Result};
use crate::options::CodecOptions;

/// Decode a JSON-compatible tree into a value of the target type using
/// default options.
///
/// The walk is guided by the target descriptor: the JSON tree supplies the
/// data, the descriptor supplies the expected shape, name mappings
/// translate wire names back to internal names, and the registry resolves
/// forward-referenced type names. Struct and union values are rebuilt
/// through their validated constructors, so construction invariants re-run
/// on every decode.
pub fn decode(
    target: &TypeDesc,
    tree: &JsonValue,
    name_mappings: &NameMappings,
    registry: &ClassRegistry,
) -> Result<Value> {
    decode_with(target, tree, name_mappings, registry, &CodecOptions::default())
}

/// Decode a JSON-compatible tree into a value of the target type.
pub fn decode_with(
    target: &TypeDesc,
    tree: &JsonValue,
    name_mappings: &NameMappings,
    registry: &ClassRegistry,
    options: &CodecOptions,
) -> Result<Value> {
    let context = Context {
        name_mappings,
        registry,
        options,
    };
    decode_value(target, tree, &context, 0)
}

struct Context<'a> {
    name_mappings: &'a NameMappings,
    registry: &'a ClassRegistry,
    options: &'a CodecOptions,
}

fn decode_value(
    target: &TypeDesc,
    tree: &JsonValue,
    context: &Context<'_>,
    depth: usize,
) -> Result<Value> {
    if depth > context.options.max_depth {
        return Err(CodecError::DepthExceeded {
            limit: context.options.max_depth,
        });
    }

    match target {
        // Unwrap optionals before dispatching on the payload type.
        TypeDesc::Optional(inner) => decode_value(inner, tree, context, depth),
        TypeDesc::AnyOf(arms) => {
            let non_null: Vec<&TypeDesc> = arms
                .iter()
                .filter(|arm| !matches!(arm, TypeDesc::Null))
                .collect();
            match non_null.as_slice() {
                [inner] => decode_value(inner, tree, context, depth + 1),
                _ => Err(CodecError::AmbiguousOptional {
                    arms: non_null.len(),
                }),
            }
        }
        TypeDesc::Null => Err(CodecError::unsupported("a bare null target")),

        TypeDesc::Name(name) => {
            let resolved = context
                .registry
                .resolve(name)
                .ok_or_else(|| CodecError::unknown_type(name.clone()))?;
            // Resolution consumes depth: a cyclic registry entry must hit
            // the depth guard, not the call stack.
            decode_value(resolved, tree, context, depth + 1)
        }

        TypeDesc::Str => match tree.as_str() {
            Some(text) => Ok(Value::Str(text.to_owned())),
            None => Err(mismatch("a string", tree)),
        },
        TypeDesc::Int => match tree.as_i64() {
            Some(number) => Ok(Value::Int(number)),
            None => Err(mismatch("an integer", tree)),
        },
        TypeDesc::Float => match tree.as_f64() {
            Some(number) => Ok(Value::Float(number)),
            None => Err(mismatch("a number", tree)),
        },
        TypeDesc::Bool => match tree.as_bool() {
            Some(flag) => Ok(Value::Bool(flag)),
            None => Err(mismatch("a boolean", tree)),
        },

        TypeDesc::Date | TypeDesc::Time | TypeDesc::Datetime => decode_temporal(target, tree),

        TypeDesc::Duration => Err(CodecError::unsupported(
            "time intervals are not supported",
        )),

        TypeDesc::Enum(desc) => {
            let Some(wire) = tree.as_str() else {
                return Err(mismatch("an enum wire name", tree));
            };
            let mapping = context
                .name_mappings
                .get(desc.name())
                .ok_or_else(|| CodecError::missing_mapping(desc.name()))?;
            let internal = mapping
                .internal_name(wire)
                .ok_or_else(|| CodecError::unknown_wire_name(desc.name(), wire))?;
            Ok(Value::Enum(EnumValue::new(desc.clone(), internal)?))
        }

        TypeDesc::List(element) => {
            let Some(items) = tree.as_array() else {
                return Err(mismatch("an array", tree));
            };
            let mut decoded = Vec::with_capacity(items.len());
            for item in items {
                decoded.push(decode_value(element, item, context, depth + 1)?);
            }
            Ok(Value::List(decoded))
        }

        TypeDesc::Struct(desc) => {
            let Some(entries) = tree.as_object() else {
                return Err(mismatch("an object", tree));
            };
            tracing::trace!(type_name = desc.name(), "decoding struct");
            let mapping = context
                .name_mappings
                .get(desc.name())
                .ok_or_else(|| CodecError::missing_mapping(desc.name()))?;

            let mut fields = Vec::with_capacity(entries.len());
            for (wire, subtree) in entries {
                let internal = mapping
                    .internal_name(wire)
                    .ok_or_else(|| CodecError::unknown_wire_name(desc.name(), wire))?;
                let Some(index) = desc.field_index(internal) else {
                    return Err(ModelError::unknown_field(
                        desc.name(),
                        internal,
                        desc.field_names(),
                    )
                    .into());
                };
                let declared = &desc.fields()[index].ty;
                let value = decode_value(declared, subtree, context, depth + 1)?;
                fields.push((internal.to_owned(), value));
            }
            Ok(Value::Struct(StructValue::new(desc.clone(), fields)?))
        }

        TypeDesc::Union(desc) => {
            let Some(entries) = tree.as_object() else {
                return Err(mismatch("an object", tree));
            };
            tracing::trace!(type_name = desc.name(), "decoding union");
            let mapping = context
                .name_mappings
                .get(desc.name())
                .ok_or_else(|| CodecError::missing_mapping(desc.name()))?;

            let mut fields = Vec::with_capacity(entries.len());
            for (wire, subtree) in entries {
                let internal = mapping
                    .internal_name(wire)
                    .ok_or_else(|| CodecError::unknown_wire_name(desc.name(), wire))?;
                let Some(index) = desc.alternative_index(internal) else {
                    return Err(ModelError::unknown_field(
                        desc.name(),
                        internal,
                        desc.alternative_names(),
                    )
                    .into());
                };
                let declared = &desc.alternatives()[index].ty;
                let value = decode_value(declared, subtree, context, depth + 1)?;
                fields.push((internal.to_owned(), value));
            }
            // The exactly-one-alternative invariant re-runs here.
            Ok(Value::Union(UnionValue::new(desc.clone(), fields)?))
        }
    }
}

/// Parse a temporal string and check that its shape matches the target.
fn decode_temporal(target: &TypeDesc, tree: &JsonValue) -> Result<Value> {
    let expected = match target {
        TypeDesc::Date => "a date",
        TypeDesc::Time => "a time",
        _ => "a timestamp",
    };
    let Some(text) = tree.as_str() else {
        return Err(mismatch(expected, tree));
    };
    let parsed = parse_temporal(text)?;
    match (target, parsed) {
        (TypeDesc::Date, Temporal::Date(date)) => Ok(Value::Date(date)),
        (TypeDesc::Time, Temporal::Time(time)) => Ok(Value::Time(time)),
        (TypeDesc::Datetime, Temporal::Datetime(datetime)) => Ok(Value::Datetime(datetime)),
        (_, parsed) => Err(CodecError::type_mismatch(
            expected,
            format!("{} in {text:?}", parsed.kind()),
        )),
    }
}

/// Short noun describing a JSON tree's shape, for diagnostics.
fn json_kind(tree: &JsonValue) -> &'static str {
    match tree {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

fn mismatch(expected: &str, tree: &JsonValue) -> CodecError {
    CodecError::type_mismatch(expected, json_kind(tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty() -> (NameMappings, ClassRegistry) {
        (NameMappings::new(), ClassRegistry::new())
    }

    #[test]
    fn test_scalar_targets_check_shape() {
        let (mappings, registry) = empty();
        assert_eq!(
            decode(&TypeDesc::Int, &json!(42), &mappings, &registry).unwrap(),
            Value::Int(42)
        );
        // An integral tree satisfies a float target, 3 == 3.0.
        assert_eq!(
            decode(&TypeDesc::Float, &json!(3), &mappings, &registry).unwrap(),
            Value::Float(3.0)
        );
        // But a fractional tree does not satisfy an integer target.
        let err = decode(&TypeDesc::Int, &json!(3.7), &mappings, &registry).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));

        let err = decode(&TypeDesc::Str, &json!(42), &mappings, &registry).unwrap_err();
        assert_eq!(
            format!("{err}"),
            "expected a string but found a number"
        );
    }

    #[test]
    fn test_temporal_shape_must_match_target() {
        let (mappings, registry) = empty();
        let decoded =
            decode(&TypeDesc::Date, &json!("2018-06-25"), &mappings, &registry).unwrap();
        assert!(matches!(decoded, Value::Date(_)));

        // A full timestamp does not satisfy a time target.
        let err = decode(
            &TypeDesc::Time,
            &json!("2016-01-01T08:54:33Z"),
            &mappings,
            &registry,
        )
        .unwrap_err();
        assert_eq!(
            format!("{err}"),
            "expected a time but found a timestamp in \"2016-01-01T08:54:33Z\""
        );
    }

    #[test]
    fn test_malformed_temporal_reports_input() {
        let (mappings, registry) = empty();
        let err = decode(&TypeDesc::Date, &json!("junk"), &mappings, &registry).unwrap_err();
        let CodecError::Model(ModelError::InvalidTemporal { input }) = err else {
            panic!("expected InvalidTemporal, got {err:?}");
        };
        assert_eq!(input, "junk");
    }

    #[test]
    fn test_optional_unwraps_before_dispatch() {
        let (mappings, registry) = empty();
        let target = TypeDesc::optional(TypeDesc::Int);
        assert_eq!(
            decode(&target, &json!(5), &mappings, &registry).unwrap(),
            Value::Int(5)
        );
    }

    #[test]
    fn test_ambiguous_union_of_types_is_rejected() {
        let (mappings, registry) = empty();
        let target = TypeDesc::AnyOf(vec![TypeDesc::Int, TypeDesc::Str, TypeDesc::Null]);
        let err = decode(&target, &json!(5), &mappings, &registry).unwrap_err();
        assert_eq!(err, CodecError::AmbiguousOptional { arms: 2 });

        // A union of one type plus null is just an optional.
        let target = TypeDesc::AnyOf(vec![TypeDesc::Int, TypeDesc::Null]);
        assert_eq!(
            decode(&target, &json!(5), &mappings, &registry).unwrap(),
            Value::Int(5)
        );
    }

    #[test]
    fn test_duration_target_is_refused() {
        let (mappings, registry) = empty();
        let err = decode(&TypeDesc::Duration, &json!("PT5M"), &mappings, &registry).unwrap_err();
        assert!(matches!(err, CodecError::Unsupported { .. }));
    }

    #[test]
    fn test_cyclic_registry_entry_hits_depth_guard() {
        let mappings = NameMappings::new();
        let mut registry = ClassRegistry::new();
        registry.insert("Loop", TypeDesc::name("Loop"));
        let err = decode(&TypeDesc::name("Loop"), &json!(1), &mappings, &registry).unwrap_err();
        assert_eq!(err, CodecError::DepthExceeded { limit: 32 });
    }

    #[test]
    fn test_unresolvable_forward_reference() {
        let (mappings, registry) = empty();
        let err = decode(
            &TypeDesc::name("Lost"),
            &json!({}),
            &mappings,
            &registry,
        )
        .unwrap_err();
        assert_eq!(err, CodecError::unknown_type("Lost"));
    }
}
