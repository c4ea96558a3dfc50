//! Type-name resolution for forward and self references.
//!
//! A schema may declare a field whose type is spelled as a name rather than
//! a resolved descriptor (forward declarations, self-referential types).
//! The registry is built once at schema-load time and maps those names back
//! to descriptors during decode.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::descriptor::{EnumDesc, StructDesc, TypeDesc, UnionDesc};

/// A table from type name to type descriptor.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    by_name: BTreeMap<String, TypeDesc>,
}

impl ClassRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under an explicit name.
    pub fn insert(&mut self, name: impl Into<String>, desc: TypeDesc) {
        self.by_name.insert(name.into(), desc);
    }

    /// Register a struct descriptor under its own type name.
    pub fn register_struct(&mut self, desc: Arc<StructDesc>) {
        self.by_name
            .insert(desc.name().to_owned(), TypeDesc::Struct(desc));
    }

    /// Register a union descriptor under its own type name.
    pub fn register_union(&mut self, desc: Arc<UnionDesc>) {
        self.by_name
            .insert(desc.name().to_owned(), TypeDesc::Union(desc));
    }

    /// Register an enum descriptor under its own type name.
    pub fn register_enum(&mut self, desc: Arc<EnumDesc>) {
        self.by_name
            .insert(desc.name().to_owned(), TypeDesc::Enum(desc));
    }

    /// Resolve a type name to its descriptor.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&TypeDesc> {
        self.by_name.get(name)
    }
}
