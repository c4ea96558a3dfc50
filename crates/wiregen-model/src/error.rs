//! Error types for schema model construction and temporal parsing.

use thiserror::Error;

/// Errors raised while constructing schema values or parsing temporal text.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    // === Construction errors ===
    /// A field or alternative name outside the declared set.
    #[error("unknown field '{field}' for type {type_name}; valid fields are: {valid:?}")]
    UnknownField {
        type_name: String,
        field: String,
        valid: Vec<String>,
    },

    /// A required field was not supplied.
    #[error("required field '{field}' missing for type {type_name}")]
    MissingField { type_name: String, field: String },

    /// The same field name appeared more than once.
    #[error("duplicate field '{field}' for type {type_name}")]
    DuplicateField { type_name: String, field: String },

    /// A tagged union was given zero or more than one value.
    #[error("{type_name} must hold exactly one value, but {given} were supplied")]
    Arity { type_name: String, given: usize },

    /// A non-selected alternative of a tagged union was read.
    #[error(
        "cannot read alternative '{requested}' of {type_name}: current selection is '{active}'"
    )]
    SelectionMismatch {
        type_name: String,
        requested: String,
        active: String,
    },

    /// An enumeration variant name outside the declared set.
    #[error("unknown variant '{variant}' for enum {type_name}; valid variants are: {valid:?}")]
    UnknownVariant {
        type_name: String,
        variant: String,
        valid: Vec<String>,
    },

    // === Name mapping errors ===
    /// Two internal names collide onto the same wire name.
    #[error("duplicate wire name '{wire}': mapped from both '{first}' and '{second}'")]
    DuplicateWireName {
        wire: String,
        first: String,
        second: String,
    },

    /// One internal name mapped onto two wire names.
    #[error("duplicate internal name '{internal}': mapped to both '{first}' and '{second}'")]
    DuplicateInternalName {
        internal: String,
        first: String,
        second: String,
    },

    // === Temporal errors ===
    /// Text that does not match the ISO 8601 subset grammar.
    #[error("unable to parse as ISO-8601: {input:?}")]
    InvalidTemporal { input: String },

    /// A temporal component outside its valid range.
    #[error("temporal component out of range: {component} = {value}")]
    TemporalRange { component: &'static str, value: i64 },
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    /// Create an UnknownField error from a declared-field iterator.
    pub fn unknown_field<'a>(
        type_name: impl Into<String>,
        field: impl Into<String>,
        valid: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
            valid: valid.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Create a MissingField error.
    pub fn missing_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Create a DuplicateField error.
    pub fn duplicate_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Create an InvalidTemporal error.
    pub fn invalid_temporal(input: impl Into<String>) -> Self {
        Self::InvalidTemporal {
            input: input.into(),
        }
    }
}
