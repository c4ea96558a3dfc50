//! Conversion from schema values to JSON trees.

use serde_json::{Map, Number, Value as JsonValue};
use wiregen_model::{NameMappings, Value};

use crate::error::{CodecError, Result};
use crate::options::CodecOptions;

/// Encode a schema value to a JSON-compatible tree using default options.
///
/// Scalars pass through, temporal values become ISO 8601 strings, enum
/// variants become their wire names, unions become a single-entry map keyed
/// by the selection's wire name, and structs become a map holding only the
/// present fields, keyed by wire name in declared field order.
pub fn encode(value: &Value, name_mappings: &NameMappings) -> Result<JsonValue> {
    encode_with(value, name_mappings, &CodecOptions::default())
}

/// Encode a schema value to a JSON-compatible tree.
pub fn encode_with(
    value: &Value,
    name_mappings: &NameMappings,
    options: &CodecOptions,
) -> Result<JsonValue> {
    encode_value(value, name_mappings, options, 0)
}

fn encode_value(
    value: &Value,
    name_mappings: &NameMappings,
    options: &CodecOptions,
    depth: usize,
) -> Result<JsonValue> {
    if depth > options.max_depth {
        return Err(CodecError::DepthExceeded {
            limit: options.max_depth,
        });
    }

    match value {
        Value::Str(text) => Ok(JsonValue::String(text.clone())),
        Value::Int(number) => Ok(JsonValue::Number((*number).into())),
        Value::Float(number) => Number::from_f64(*number)
            .map(JsonValue::Number)
            .ok_or_else(|| CodecError::unsupported("non-finite float")),
        Value::Bool(flag) => Ok(JsonValue::Bool(*flag)),

        Value::Date(date) => Ok(JsonValue::String(date.to_string())),
        Value::Time(time) => Ok(JsonValue::String(time.to_string())),
        Value::Datetime(datetime) => Ok(JsonValue::String(datetime.to_string())),
        Value::Duration(_) => Err(CodecError::unsupported(
            "time intervals are not supported",
        )),

        Value::Enum(variant) => {
            let type_name = variant.desc().name();
            let mapping = name_mappings
                .get(type_name)
                .ok_or_else(|| CodecError::missing_mapping(type_name))?;
            let wire = mapping.wire_name(variant.variant_name()).ok_or_else(|| {
                CodecError::UnmappedField {
                    type_name: type_name.to_owned(),
                    field: variant.variant_name().to_owned(),
                }
            })?;
            Ok(JsonValue::String(wire.to_owned()))
        }

        Value::List(items) => {
            let mut encoded = Vec::with_capacity(items.len());
            for item in items {
                encoded.push(encode_value(item, name_mappings, options, depth + 1)?);
            }
            Ok(JsonValue::Array(encoded))
        }

        Value::Union(union) => {
            let type_name = union.desc().name();
            tracing::trace!(type_name, selection = union.selection(), "encoding union");
            let mapping = name_mappings
                .get(type_name)
                .ok_or_else(|| CodecError::missing_mapping(type_name))?;
            let wire = mapping.wire_name(union.selection()).ok_or_else(|| {
                CodecError::UnmappedField {
                    type_name: type_name.to_owned(),
                    field: union.selection().to_owned(),
                }
            })?;
            let mut map = Map::with_capacity(1);
            map.insert(
                wire.to_owned(),
                encode_value(union.value(), name_mappings, options, depth + 1)?,
            );
            Ok(JsonValue::Object(map))
        }

        Value::Struct(object) => {
            let desc = object.desc();
            tracing::trace!(type_name = desc.name(), "encoding struct");
            let mapping = name_mappings
                .get(desc.name())
                .ok_or_else(|| CodecError::missing_mapping(desc.name()))?;
            let mut map = Map::new();
            // Declared order, present fields only: absent optionals are
            // omitted entirely rather than written as null.
            for (field, slot) in desc.fields().iter().zip(object.iter()) {
                let Some(field_value) = slot else {
                    continue;
                };
                let wire = mapping.wire_name(&field.name).ok_or_else(|| {
                    CodecError::UnmappedField {
                        type_name: desc.name().to_owned(),
                        field: field.name.clone(),
                    }
                })?;
                map.insert(
                    wire.to_owned(),
                    encode_value(field_value, name_mappings, options, depth + 1)?,
                );
            }
            Ok(JsonValue::Object(map))
        }
    }
}
