//! Dict and JSON round-tripping for records.
//!
//! `as_value`/`as_map` walk the registry in order to produce the JSON form;
//! `from_value` loads partially-shaped external data permissively (unknown
//! keys are dropped rather than rejected, unlike the strict constructor);
//! `dumps`/`loads` are thin JSON-text wrappers over the two.

use crate::error::{RecordResult, ValidationError, ValidationResult};
use crate::record::record::{FieldValue, Input, Record};
use crate::schema::{FieldKind, Schema};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::sync::Arc;

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Record {
    /// The record as a JSON object, fields in registry order, unset fields
    /// omitted, the catch-all bucket (when declared) first under its own
    /// key and never serialized.
    ///
    /// With `serialize` true, truthy values pass through their field's
    /// serializer: nested records recurse into their own `as_map`, list
    /// elements go through the element serializer, scalars through the
    /// converter's. With `serialize` false only the structure materializes.
    pub fn as_map(&self, serialize: bool) -> Map<String, Value> {
        let mut out = Map::new();

        if let Some(name) = self.schema().catch_all() {
            if let Some(bucket) = self.bucket() {
                out.insert(name.to_string(), Value::Object(bucket.clone()));
            }
        }

        for field in self.schema().fields() {
            let Some(stored) = self.values().get(field.name()) else {
                continue;
            };
            // Serializers only apply to truthy values; nested structure
            // materializes either way.
            let apply = serialize && stored.is_truthy();
            let value = match stored {
                FieldValue::Null => Value::Null,
                FieldValue::Record(record) => record.as_value(serialize),
                FieldValue::List(list) => list.to_value(serialize),
                FieldValue::Scalar(v) => match (field.kind(), apply) {
                    (FieldKind::Scalar(converter), true) => converter.serialize(v),
                    _ => v.clone(),
                },
                FieldValue::Bucket(bucket) => Value::Object(bucket.clone()),
            };
            out.insert(field.name().to_string(), value);
        }

        out
    }

    /// [`as_map`](Record::as_map) as a `Value::Object`.
    pub fn as_value(&self, serialize: bool) -> Value {
        Value::Object(self.as_map(serialize))
    }

    /// Construct a record from a mapping, keeping only keys that match
    /// declared field names — unmatched keys are silently dropped, since
    /// this entry point is meant for loading partially-shaped external
    /// data. Null or empty input yields no instance.
    pub fn from_value(schema: &Arc<Schema>, data: &Value) -> ValidationResult<Option<Record>> {
        match data {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            Value::Object(map) => {
                let kwargs = map
                    .iter()
                    .filter(|(name, _)| schema.has_field(name))
                    .map(|(name, value)| (name.clone(), Input::Value(value.clone())))
                    .collect();
                Record::construct(schema, Vec::new(), kwargs).map(Some)
            }
            other => Err(ValidationError::ExpectedMapping {
                actual: value_type(other).to_string(),
            }),
        }
    }

    /// Batch form of [`from_value`](Record::from_value): an ordered
    /// sequence of mappings, each constructing one record.
    pub fn from_value_seq(schema: &Arc<Schema>, data: &Value) -> ValidationResult<Vec<Record>> {
        let Value::Array(items) = data else {
            return Err(ValidationError::ExpectedSequence {
                actual: value_type(data).to_string(),
            });
        };
        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => {
                    let kwargs = map
                        .iter()
                        .filter(|(name, _)| schema.has_field(name))
                        .map(|(name, value)| (name.clone(), Input::Value(value.clone())))
                        .collect();
                    Record::construct(schema, Vec::new(), kwargs)
                }
                other => Err(ValidationError::ExpectedMapping {
                    actual: value_type(other).to_string(),
                }),
            })
            .collect()
    }

    /// JSON text of `as_value(serialize: true)`.
    pub fn dumps(&self) -> RecordResult<String> {
        Ok(serde_json::to_string(&self.as_value(true))?)
    }

    /// Parse JSON text and load it through the permissive
    /// [`from_value`](Record::from_value) path.
    pub fn loads(schema: &Arc<Schema>, text: &str) -> RecordResult<Option<Record>> {
        let data: Value = serde_json::from_str(text)?;
        Ok(Record::from_value(schema, &data)?)
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_value(true).serialize(serializer)
    }
}

impl Serialize for crate::record::list::BoundedList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value(true).serialize(serializer)
    }
}
