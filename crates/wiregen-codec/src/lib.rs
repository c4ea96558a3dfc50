//! JSON encoding and decoding for generated schema values.
//!
//! This crate converts between in-memory schema values (structs, tagged
//! unions, enums, and scalars from `wiregen-model`) and `serde_json` trees,
//! renaming fields through bijective name mappings along the way.
//!
//! # Features
//!
//! - Symmetric encode/decode guided by type descriptors
//! - Wire-name translation via per-type [`NameMapping`](wiregen_model::NameMapping) tables
//! - Forward-reference resolution through a [`ClassRegistry`](wiregen_model::ClassRegistry)
//! - ISO 8601 temporal strings that survive a round trip byte for byte
//! - Configurable recursion depth guard
//!
//! # Example
//!
//! ```
//! use wiregen_codec::{decode, encode};
//! use wiregen_model::{
//!     ClassRegistry, FieldDesc, NameMapping, NameMappings, StructDesc, StructValue, TypeDesc,
//!     Value,
//! };
//!
//! let desc = StructDesc::new(
//!     "Greeting",
//!     vec![FieldDesc::required("message", TypeDesc::Str)],
//! )
//! .unwrap();
//!
//! let mut mappings = NameMappings::new();
//! mappings.insert(
//!     "Greeting",
//!     NameMapping::new([("message", "Message")]).unwrap(),
//! );
//! let mut registry = ClassRegistry::new();
//! registry.register_struct(desc.clone());
//!
//! let value = Value::Struct(
//!     StructValue::new(desc.clone(), [("message", Value::from("hello"))]).unwrap(),
//! );
//! let tree = encode(&value, &mappings).unwrap();
//! assert_eq!(tree.to_string(), r#"{"Message":"hello"}"#);
//!
//! let back = decode(&TypeDesc::Struct(desc), &tree, &mappings, &registry).unwrap();
//! assert_eq!(back, value);
//! ```

pub mod decode;
pub mod encode;
mod error;
pub mod options;

pub use decode::{decode, decode_with};
pub use encode::{encode, encode_with};
pub use error::{CodecError, Result};
pub use options::CodecOptions;
