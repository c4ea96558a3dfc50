//! Schema type model for generated codecs.
//!
//! This crate holds everything a generated schema module needs at runtime,
//! short of the JSON codec itself:
//!
//! - **descriptor**: statically built per-type schema descriptors
//! - **value**: runtime struct / tagged-union / enum values with
//!   construction-time validation
//! - **mapping**: bijective internal-name to wire-name tables
//! - **registry**: type-name resolution for forward references
//! - **temporal**: ISO 8601 date/time/timestamp values and their
//!   parser/formatter
//!
//! Descriptors, mappings, and the registry are produced by an external code
//! generator when the schema loads and are immutable afterwards.

pub mod descriptor;
pub mod error;
pub mod mapping;
pub mod registry;
pub mod temporal;
pub mod value;

pub use descriptor::{AltDesc, EnumDesc, FieldDesc, StructDesc, TypeDesc, UnionDesc};
pub use error::{ModelError, Result};
pub use mapping::{NameMapping, NameMappings};
pub use registry::ClassRegistry;
pub use temporal::{
    Date, Datetime, Duration, OffsetSeconds, Temporal, Time, UtcOffset, Zone, parse_temporal,
};
pub use value::{EnumValue, StructValue, UnionValue, Value};
