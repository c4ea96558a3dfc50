//! Schema type descriptors.
//!
//! A generator emits one descriptor per schema type when the schema loads;
//! descriptors are immutable from then on. A descriptor is the statically
//! built equivalent of runtime field enumeration: an ordered list of
//! declared fields with their types and optionality.

use std::sync::Arc;

use crate::error::{ModelError, Result};

/// The declared type of a field, alternative, or list element.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    /// UTF-8 text.
    Str,
    /// Signed integer.
    Int,
    /// Floating-point number.
    Float,
    /// Boolean.
    Bool,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Full timestamp.
    Datetime,
    /// Time interval. Declarable, but the codec refuses it.
    Duration,
    /// Closed set of named variants.
    Enum(Arc<EnumDesc>),
    /// Ordered sequence of one element type.
    List(Box<TypeDesc>),
    /// A value that may be absent.
    Optional(Box<TypeDesc>),
    /// A raw generator-emitted union of types. The only decodable form is
    /// exactly one non-null member, i.e. an optional spelled as a union.
    AnyOf(Vec<TypeDesc>),
    /// The null member of an [`TypeDesc::AnyOf`] union.
    Null,
    /// Fixed-field aggregate.
    Struct(Arc<StructDesc>),
    /// Exactly-one-of-N tagged selection.
    Union(Arc<UnionDesc>),
    /// Forward or self reference, resolved through the class registry
    /// during decode.
    Name(String),
}

impl TypeDesc {
    /// An optional of `inner`.
    #[must_use]
    pub fn optional(inner: TypeDesc) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// A list of `element`.
    #[must_use]
    pub fn list(element: TypeDesc) -> Self {
        Self::List(Box::new(element))
    }

    /// A reference to the type registered under `name`.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

/// One declared field of a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDesc {
    pub name: String,
    pub ty: TypeDesc,
    /// Whether the field may be absent. Absent optional fields are omitted
    /// from the wire entirely.
    pub optional: bool,
}

impl FieldDesc {
    /// A required field.
    #[must_use]
    pub fn required(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    /// An optional field.
    #[must_use]
    pub fn optional(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: true,
        }
    }
}

/// Descriptor of a fixed-field aggregate type.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDesc {
    name: String,
    fields: Vec<FieldDesc>,
}

impl StructDesc {
    /// Create a struct descriptor, rejecting duplicate field names.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDesc>) -> Result<Arc<Self>> {
        let name = name.into();
        for (index, field) in fields.iter().enumerate() {
            if fields[..index].iter().any(|prior| prior.name == field.name) {
                return Err(ModelError::duplicate_field(name, field.name.clone()));
            }
        }
        Ok(Arc::new(Self { name, fields }))
    }

    /// Type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDesc] {
        &self.fields
    }

    /// Position of a declared field, if any.
    #[must_use]
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == field)
    }

    /// The declared field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// One declared alternative of a tagged union.
#[derive(Debug, Clone, PartialEq)]
pub struct AltDesc {
    pub name: String,
    pub ty: TypeDesc,
}

impl AltDesc {
    /// Create an alternative.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Descriptor of an exactly-one-of-N tagged selection type.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDesc {
    name: String,
    alternatives: Vec<AltDesc>,
}

impl UnionDesc {
    /// Create a union descriptor, rejecting duplicate alternative names.
    pub fn new(name: impl Into<String>, alternatives: Vec<AltDesc>) -> Result<Arc<Self>> {
        let name = name.into();
        for (index, alt) in alternatives.iter().enumerate() {
            if alternatives[..index].iter().any(|prior| prior.name == alt.name) {
                return Err(ModelError::duplicate_field(name, alt.name.clone()));
            }
        }
        Ok(Arc::new(Self { name, alternatives }))
    }

    /// Type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared alternatives, in declaration order.
    #[must_use]
    pub fn alternatives(&self) -> &[AltDesc] {
        &self.alternatives
    }

    /// Position of a declared alternative, if any.
    #[must_use]
    pub fn alternative_index(&self, alternative: &str) -> Option<usize> {
        self.alternatives.iter().position(|a| a.name == alternative)
    }

    /// The declared alternative names.
    pub fn alternative_names(&self) -> impl Iterator<Item = &str> {
        self.alternatives.iter().map(|a| a.name.as_str())
    }
}

/// Descriptor of a closed enumeration type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDesc {
    name: String,
    variants: Vec<String>,
}

impl EnumDesc {
    /// Create an enum descriptor, rejecting duplicate variant names.
    pub fn new(
        name: impl Into<String>,
        variants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Arc<Self>> {
        let name = name.into();
        let variants: Vec<String> = variants.into_iter().map(Into::into).collect();
        for (index, variant) in variants.iter().enumerate() {
            if variants[..index].contains(variant) {
                return Err(ModelError::duplicate_field(name, variant.clone()));
            }
        }
        Ok(Arc::new(Self { name, variants }))
    }

    /// Type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared variants, in declaration order.
    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Position of a declared variant, if any.
    #[must_use]
    pub fn variant_index(&self, variant: &str) -> Option<usize> {
        self.variants.iter().position(|v| v == variant)
    }
}
