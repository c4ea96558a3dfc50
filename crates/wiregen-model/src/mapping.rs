//! Internal-to-wire name translation tables.
//!
//! A generator emits one [`NameMapping`] per schema type, translating the
//! internal field, alternative, or variant names (e.g. `trace_level`) to
//! the names used on the wire (e.g. `TraceLevel`). Tables are built once
//! when the schema loads and are read-only afterwards, so shared use needs
//! no synchronization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A bijective table between internal names and wire names, scoped to one
/// schema type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct NameMapping {
    forward: BTreeMap<String, String>,
    reverse: BTreeMap<String, String>,
}

impl NameMapping {
    /// Build a mapping from (internal name, wire name) pairs.
    ///
    /// The reverse table is computed here; a name colliding in either
    /// direction fails now, not at first use, so the two tables always
    /// have equal cardinality.
    pub fn new(
        pairs: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Result<Self> {
        let mut forward = BTreeMap::new();
        let mut reverse = BTreeMap::new();
        for (internal, wire) in pairs {
            let internal = internal.into();
            let wire = wire.into();
            if let Some(first) = reverse.insert(wire.clone(), internal.clone()) {
                return Err(ModelError::DuplicateWireName {
                    wire,
                    first,
                    second: internal,
                });
            }
            if let Some(first) = forward.insert(internal.clone(), wire.clone()) {
                return Err(ModelError::DuplicateInternalName {
                    internal,
                    first,
                    second: wire,
                });
            }
        }
        Ok(Self { forward, reverse })
    }

    /// The wire name for an internal name.
    #[must_use]
    pub fn wire_name(&self, internal: &str) -> Option<&str> {
        self.forward.get(internal).map(String::as_str)
    }

    /// The internal name for a wire name.
    #[must_use]
    pub fn internal_name(&self, wire: &str) -> Option<&str> {
        self.reverse.get(wire).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterate over (internal name, wire name) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward
            .iter()
            .map(|(internal, wire)| (internal.as_str(), wire.as_str()))
    }
}

impl TryFrom<BTreeMap<String, String>> for NameMapping {
    type Error = ModelError;

    fn try_from(table: BTreeMap<String, String>) -> Result<Self> {
        Self::new(table)
    }
}

impl From<NameMapping> for BTreeMap<String, String> {
    fn from(mapping: NameMapping) -> Self {
        mapping.forward
    }
}

/// All of a schema's name mappings, keyed by type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMappings {
    by_type: BTreeMap<String, NameMapping>,
}

impl NameMappings {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type's mapping, replacing any previous entry.
    pub fn insert(&mut self, type_name: impl Into<String>, mapping: NameMapping) {
        self.by_type.insert(type_name.into(), mapping);
    }

    /// The mapping for a type, if registered.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&NameMapping> {
        self.by_type.get(type_name)
    }
}

impl FromIterator<(String, NameMapping)> for NameMappings {
    fn from_iter<I: IntoIterator<Item = (String, NameMapping)>>(iter: I) -> Self {
        Self {
            by_type: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_table_is_computed() {
        let mapping = NameMapping::new([
            ("max_depth", "MaxDepth"),
            ("trace_level", "TraceLevel"),
        ])
        .unwrap();
        assert_eq!(mapping.wire_name("max_depth"), Some("MaxDepth"));
        assert_eq!(mapping.internal_name("TraceLevel"), Some("trace_level"));
        assert_eq!(mapping.wire_name("nope"), None);
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn test_duplicate_wire_name_fails_at_construction() {
        let err = NameMapping::new([("foo", "Name"), ("bar", "Name")]).unwrap_err();
        let ModelError::DuplicateWireName { wire, .. } = err else {
            panic!("expected DuplicateWireName");
        };
        assert_eq!(wire, "Name");
    }

    #[test]
    fn test_duplicate_internal_name_fails_at_construction() {
        let err = NameMapping::new([("a", "X"), ("a", "Y")]).unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateInternalName {
                internal: "a".to_owned(),
                first: "X".to_owned(),
                second: "Y".to_owned(),
            }
        );
    }

    #[test]
    fn test_double_inversion_reproduces_table() {
        let mapping = NameMapping::new([("a", "A"), ("b", "B"), ("c", "c")]).unwrap();
        let inverted = NameMapping::new(
            mapping
                .iter()
                .map(|(internal, wire)| (wire.to_owned(), internal.to_owned())),
        )
        .unwrap();
        let double = NameMapping::new(
            inverted
                .iter()
                .map(|(internal, wire)| (wire.to_owned(), internal.to_owned())),
        )
        .unwrap();
        assert_eq!(double, mapping);
    }

    #[test]
    fn test_serde_round_trip_revalidates() {
        let mapping = NameMapping::new([("foo_bar", "fooBar")]).unwrap();
        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"foo_bar":"fooBar"}"#);
        let back: NameMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mapping);
    }
}
