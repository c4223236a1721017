//! Schema-driven record types with validation and JSON round-tripping.
//!
//! Declare a record type as a set of named, typed fields — with defaults,
//! required/nullable/readonly constraints, nested sub-records, and bounded
//! list fields — and get constructor-time validation, per-attribute
//! validation on mutation, and dict/JSON serialization for free.
//!
//! # Core Components
//!
//! - [`Schema`] / [`SchemaBuilder`] - the immutable, inheritance-merged
//!   field registry of a record type, built once at declaration time
//! - [`Field`] - one named, typed, constrained attribute
//! - [`Record`] - an instance: a private value store validated against its
//!   schema on construction and on every write
//! - [`BoundedList`] - the length- and uniqueness-constrained sequence used
//!   for repeated fields
//! - [`convert::Converter`] - the normalize/serialize contract for scalar
//!   values, with built-in converters in [`convert`]
//!
//! # Quick Start
//!
//! ```rust
//! use typed_record::{Field, Record, Schema};
//! use typed_record::convert::Integer;
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let user = Schema::builder("User")
//!         .field("id", Field::of(Integer::new()).required())
//!         .field("name", Field::new().default("anonymous"))
//!         .build()?;
//!
//!     let record = Record::construct(&user, vec![], vec![("id".into(), json!(7).into())])?;
//!     assert_eq!(record.as_value(true), json!({"id": 7, "name": "anonymous"}));
//!     Ok(())
//! }
//! ```

pub mod convert;
pub mod error;
pub mod func;
pub mod record;
pub mod schema;

// Re-export commonly used types for convenience
pub use error::{
    BuildError, BuildResult, ConversionError, RecordError, RecordResult, ValidationError,
    ValidationResult,
};
pub use func::FnValidator;
pub use record::{BoundedList, FieldValue, Input, Record};
pub use schema::{DefaultPolicy, Field, FieldKind, ListSpec, Schema, SchemaBuilder};
