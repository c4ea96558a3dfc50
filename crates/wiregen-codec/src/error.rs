//! Error types for encode and decode operations.

use thiserror::Error;
use wiregen_model::ModelError;

/// Errors that can occur while converting between schema values and JSON
/// trees.
///
/// All failures are synchronous and local; the codec never retries and
/// never partially recovers. Any resilience such as skipping unknown
/// fields is the caller's decision, not the codec's.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CodecError {
    /// A construction or temporal-parse failure from the model layer.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A value or target shape the codec does not handle. Time intervals
    /// are the deliberate case.
    #[error("unsupported type: {detail}")]
    Unsupported { detail: String },

    /// The JSON tree's shape disagrees with the requested target, or a
    /// parsed temporal value has the wrong shape for its target.
    #[error("expected {expected} but found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A wire name with no reverse-mapping entry.
    #[error("unknown wire name '{wire}' for type {type_name}")]
    UnknownWireName { type_name: String, wire: String },

    /// An internal name with no forward-mapping entry.
    #[error("no wire name mapped for field '{field}' of type {type_name}")]
    UnmappedField { type_name: String, field: String },

    /// No name mapping registered for a type at all.
    #[error("no name mapping registered for type {type_name}")]
    MissingMapping { type_name: String },

    /// A forward-referenced type name the registry cannot resolve.
    #[error("unknown type name: {name}")]
    UnknownType { name: String },

    /// A union target with more than one non-null member.
    #[error("ambiguous optional: union of {arms} non-null types is not supported")]
    AmbiguousOptional { arms: usize },

    /// Recursion deeper than the configured guard.
    #[error("recursion depth limit of {limit} exceeded")]
    DepthExceeded { limit: usize },
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Create an Unsupported error.
    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self::Unsupported {
            detail: detail.into(),
        }
    }

    /// Create a TypeMismatch error.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an UnknownWireName error.
    pub fn unknown_wire_name(type_name: impl Into<String>, wire: impl Into<String>) -> Self {
        Self::UnknownWireName {
            type_name: type_name.into(),
            wire: wire.into(),
        }
    }

    /// Create a MissingMapping error.
    pub fn missing_mapping(type_name: impl Into<String>) -> Self {
        Self::MissingMapping {
            type_name: type_name.into(),
        }
    }

    /// Create an UnknownType error.
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }
}
