//! Runtime schema values.
//!
//! Generated schema classes build on two structural shapes: a fixed-field
//! aggregate ([`StructValue`]) and an exactly-one-of-N tagged selection
//! ([`UnionValue`]). Both validate at construction, which is the only way
//! to create them, so a decoded value is re-validated every time it is
//! rebuilt from the wire.

use std::sync::Arc;

use crate::descriptor::{EnumDesc, StructDesc, UnionDesc};
use crate::error::{ModelError, Result};
use crate::temporal::{Date, Datetime, Duration, Time};

/// A schema-shaped runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(Date),
    Time(Time),
    Datetime(Datetime),
    /// Present so a schema can carry one; the codec refuses to encode it.
    Duration(Duration),
    Enum(EnumValue),
    List(Vec<Value>),
    Struct(StructValue),
    Union(UnionValue),
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Str(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Str(text)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Int(number)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Float(number)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

/// A variant of a closed enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    desc: Arc<EnumDesc>,
    variant: usize,
}

impl EnumValue {
    /// Select a variant by internal name.
    pub fn new(desc: Arc<EnumDesc>, variant: &str) -> Result<Self> {
        let Some(index) = desc.variant_index(variant) else {
            return Err(ModelError::UnknownVariant {
                type_name: desc.name().to_owned(),
                variant: variant.to_owned(),
                valid: desc.variants().to_vec(),
            });
        };
        Ok(Self {
            desc,
            variant: index,
        })
    }

    /// The enumeration's descriptor.
    #[must_use]
    pub fn desc(&self) -> &Arc<EnumDesc> {
        &self.desc
    }

    /// The selected variant's internal name.
    #[must_use]
    pub fn variant_name(&self) -> &str {
        &self.desc.variants()[self.variant]
    }
}

/// A fixed-field aggregate instance.
///
/// Field storage parallels the descriptor's declaration order; an absent
/// optional field is `None`, which is distinct from a present field holding
/// a default-like value.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    desc: Arc<StructDesc>,
    values: Vec<Option<Value>>,
}

impl StructValue {
    /// Build an instance from (field name, value) pairs.
    ///
    /// Names outside the declared set, duplicated names, and missing
    /// required fields all fail; only declared fields may ever be set.
    pub fn new(
        desc: Arc<StructDesc>,
        fields: impl IntoIterator<Item = (impl Into<String>, Value)>,
    ) -> Result<Self> {
        let mut values: Vec<Option<Value>> = vec![None; desc.fields().len()];
        for (name, value) in fields {
            let name = name.into();
            let Some(index) = desc.field_index(&name) else {
                return Err(ModelError::unknown_field(
                    desc.name(),
                    name,
                    desc.field_names(),
                ));
            };
            if values[index].is_some() {
                return Err(ModelError::duplicate_field(desc.name(), name));
            }
            values[index] = Some(value);
        }
        for (field, slot) in desc.fields().iter().zip(&values) {
            if slot.is_none() && !field.optional {
                return Err(ModelError::missing_field(desc.name(), field.name.as_str()));
            }
        }
        Ok(Self { desc, values })
    }

    /// The struct's descriptor.
    #[must_use]
    pub fn desc(&self) -> &Arc<StructDesc> {
        &self.desc
    }

    /// Look up a field's value by name. `Ok(None)` means the declared field
    /// is absent; an undeclared name is an error.
    pub fn get(&self, field: &str) -> Result<Option<&Value>> {
        let Some(index) = self.desc.field_index(field) else {
            return Err(ModelError::unknown_field(
                self.desc.name(),
                field,
                self.desc.field_names(),
            ));
        };
        Ok(self.values[index].as_ref())
    }

    /// The index'th (zero-based) declared field's value, or `None` if the
    /// index is out of range or the field is absent.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Iterate over field values in declaration order; absent optional
    /// fields yield `None`.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> {
        self.values.iter().map(Option::as_ref)
    }
}

/// An exactly-one-of-N tagged selection instance.
///
/// The selection tag and its value change atomically together; there is
/// never zero or more than one live alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionValue {
    desc: Arc<UnionDesc>,
    selection: usize,
    value: Box<Value>,
}

impl UnionValue {
    /// Build an instance from exactly one (alternative name, value) pair.
    pub fn new(
        desc: Arc<UnionDesc>,
        fields: impl IntoIterator<Item = (impl Into<String>, Value)>,
    ) -> Result<Self> {
        let mut fields = fields.into_iter();
        let Some((name, value)) = fields.next() else {
            return Err(ModelError::Arity {
                type_name: desc.name().to_owned(),
                given: 0,
            });
        };
        let extra = fields.count();
        if extra > 0 {
            return Err(ModelError::Arity {
                type_name: desc.name().to_owned(),
                given: extra + 1,
            });
        }
        let name = name.into();
        let Some(selection) = desc.alternative_index(&name) else {
            return Err(ModelError::unknown_field(
                desc.name(),
                name,
                desc.alternative_names(),
            ));
        };
        Ok(Self {
            desc,
            selection,
            value: Box::new(value),
        })
    }

    /// Shorthand constructor for a single known alternative.
    pub fn select(desc: Arc<UnionDesc>, alternative: &str, value: Value) -> Result<Self> {
        Self::new(desc, [(alternative, value)])
    }

    /// The union's descriptor.
    #[must_use]
    pub fn desc(&self) -> &Arc<UnionDesc> {
        &self.desc
    }

    /// The currently selected alternative's name.
    #[must_use]
    pub fn selection(&self) -> &str {
        &self.desc.alternatives()[self.selection].name
    }

    /// The value held by the current selection.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Read a named alternative. Reading anything other than the current
    /// selection fails, naming the active alternative.
    pub fn get(&self, alternative: &str) -> Result<&Value> {
        let Some(index) = self.desc.alternative_index(alternative) else {
            return Err(ModelError::unknown_field(
                self.desc.name(),
                alternative,
                self.desc.alternative_names(),
            ));
        };
        if index != self.selection {
            return Err(ModelError::SelectionMismatch {
                type_name: self.desc.name().to_owned(),
                requested: alternative.to_owned(),
                active: self.selection().to_owned(),
            });
        }
        Ok(&self.value)
    }

    /// Replace the selection and its value atomically. Only declared
    /// alternatives may be set.
    pub fn set(&mut self, alternative: &str, value: Value) -> Result<()> {
        let Some(index) = self.desc.alternative_index(alternative) else {
            return Err(ModelError::unknown_field(
                self.desc.name(),
                alternative,
                self.desc.alternative_names(),
            ));
        };
        self.selection = index;
        *self.value = value;
        Ok(())
    }
}
