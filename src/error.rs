//! Error types for the typed-record engine.
//!
//! Errors split into three tiers: [`BuildError`] for mistakes made while
//! declaring a record type, [`ValidationError`] for runtime validation
//! failures on construction and mutation, and [`RecordError`] as the
//! top-level type covering both plus the JSON text layer.

/// Top-level error type for record operations.
///
/// Covers everything the crate can fail with: schema build problems,
/// validation failures, and JSON encode/decode errors from `dumps`/`loads`.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Validation errors raised during construction or mutation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Errors raised while building a schema
    #[error("Schema build error: {0}")]
    Build(#[from] BuildError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while declaring a record schema.
///
/// These are programming errors and surface once, at the one-shot
/// registration step, never during instance construction.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A declared field name collides with an engine-reserved name
    #[error("reserved attribute name: {name}")]
    ReservedAttribute { name: String },

    /// More than one catch-all field declared on the same type
    #[error("duplicate catch-all field: '{first}' and '{second}'")]
    DuplicateCatchAll { first: String, second: String },

    /// The catch-all name collides with a declared field name
    #[error("catch-all name collides with field: {name}")]
    CatchAllConflict { name: String },
}

/// Validation errors for record construction and mutation.
///
/// Every variant aborts the enclosing operation entirely; no partial
/// mutation is observable after a failure.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// More positional constructor values than declared fields
    #[error("extra attribute(s): {}", .values.join(", "))]
    ExtraAttributes { values: Vec<String> },

    /// A field supplied both positionally and by keyword
    #[error("duplicate attribute: {name}")]
    DuplicateAttribute { name: String },

    /// A keyword matches no declared field and no catch-all exists
    #[error("undefined field name '{name}'")]
    UnknownAttribute { name: String },

    /// A required field with no default is missing at construction
    #[error("missing required attribute: {name}")]
    MissingRequiredAttribute { name: String },

    /// Null supplied for a field whose default is not explicitly null
    #[error("field cannot be null: {name}")]
    NoneValue { name: String },

    /// An attempted write to a readonly field
    #[error("field is read-only: {name}")]
    ReadOnlyField { name: String },

    /// A nested field received neither a mapping nor an instance of the
    /// expected record type
    #[error("field '{field}' expects a nested '{expected}' record")]
    InvalidNestedType { field: String, expected: String },

    /// Read of a declared field that currently holds no value
    #[error("attribute '{name}' is not set")]
    UnsetAttribute { name: String },

    /// Attempted delete of a required field
    #[error("cannot delete required field: {name}")]
    DeleteRequired { name: String },

    /// A list-valued field received a non-sequence value
    #[error("field '{field}' expects a list")]
    ExpectedList { field: String },

    /// `from_value` received something other than a mapping
    #[error("expected a mapping, got {actual}")]
    ExpectedMapping { actual: String },

    /// The batch form of `from_value` received a non-sequence
    #[error("expected a sequence of mappings, got {actual}")]
    ExpectedSequence { actual: String },

    /// Bounded list would fall below its minimum length
    #[error("length must be at least {min}")]
    ListTooShort { min: usize },

    /// Bounded list would exceed its maximum length
    #[error("length must be no more than {max}")]
    ListTooLong { max: usize },

    /// Duplicate insert/update into a no-duplicates list
    #[error("{value} already in list")]
    DuplicateListItem { value: String },

    /// List index outside the current bounds
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A converter rejected a value; carries the field name and the
    /// converter's identity for diagnostics
    #[error("invalid <{type_name}> value ({value}) for field '{field}': {message}")]
    InvalidValue {
        field: String,
        type_name: String,
        value: String,
        message: String,
    },
}

/// A converter-side normalization failure.
///
/// Converters report this; the record engine wraps it into
/// [`ValidationError::InvalidValue`] with the field name and converter
/// identity attached.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ConversionError {
    pub message: String,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// Convenience constructors, mirroring how callers actually build these.
impl BuildError {
    pub fn reserved(name: impl Into<String>) -> Self {
        Self::ReservedAttribute { name: name.into() }
    }
}

impl ValidationError {
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateAttribute { name: name.into() }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownAttribute { name: name.into() }
    }

    pub fn missing_required(name: impl Into<String>) -> Self {
        Self::MissingRequiredAttribute { name: name.into() }
    }

    pub fn none_value(name: impl Into<String>) -> Self {
        Self::NoneValue { name: name.into() }
    }

    pub fn unset(name: impl Into<String>) -> Self {
        Self::UnsetAttribute { name: name.into() }
    }

    pub fn invalid_nested(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidNestedType {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

// Result type aliases for convenience
pub type RecordResult<T> = Result<T, RecordError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type BuildResult<T> = Result<T, BuildError>;
