//! Function-argument validation glue.
//!
//! Adapts the record engine to validate a free function's arguments: build
//! an ad-hoc schema from parameter-name/field pairs, validate a call's
//! positional and keyword arguments against it, then forward the normalized
//! (optionally re-serialized) values into the wrapped function.

use crate::error::ValidationResult;
use crate::record::{Input, Record};
use crate::schema::Schema;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Validates call arguments through a schema before invoking a function.
///
/// ```
/// use typed_record::{Field, FnValidator, Schema};
/// use typed_record::convert::Integer;
/// use serde_json::json;
///
/// let schema = Schema::builder("args")
///     .field("x", Field::of(Integer::new()).required())
///     .field("y", Field::of(Integer::new()).default(1))
///     .build()
///     .unwrap();
///
/// let validator = FnValidator::new(schema);
/// let sum = validator
///     .call(vec![json!("2").into()], vec![], |args| {
///         args["x"].as_i64().unwrap() + args["y"].as_i64().unwrap()
///     })
///     .unwrap();
/// assert_eq!(sum, 3);
/// ```
pub struct FnValidator {
    schema: Arc<Schema>,
    serialize: bool,
}

impl FnValidator {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            serialize: false,
        }
    }

    /// Re-serialize normalized values before forwarding them.
    pub fn serializing(mut self) -> Self {
        self.serialize = true;
        self
    }

    /// Validate `args`/`kwargs` against the schema and invoke `f` with the
    /// normalized value map. Validation failure short-circuits; `f` never
    /// runs on invalid input.
    pub fn call<F, R>(
        &self,
        args: Vec<Input>,
        kwargs: Vec<(String, Input)>,
        f: F,
    ) -> ValidationResult<R>
    where
        F: FnOnce(Map<String, Value>) -> R,
    {
        let record = Record::construct(&self.schema, args, kwargs)?;
        Ok(f(record.as_map(self.serialize)))
    }
}
