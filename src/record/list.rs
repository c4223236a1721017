//! Bounded list container for repeated fields.
//!
//! A [`BoundedList`] owns an ordered sequence of normalized elements and is
//! bound to one field's element type plus `(min, max, allow_dups)`
//! constraints. Elements parse eagerly on the way in; every mutation
//! re-checks the constraints before touching the store, so a failed
//! mutation leaves the list exactly as it was.

use crate::error::{ValidationError, ValidationResult};
use crate::record::record::{nested_from_input, FieldValue, Input};
use crate::schema::{ElementKind, ListSpec};
use serde_json::Value;
use std::ops::{Bound, Index, RangeBounds};

/// Length- and uniqueness-constrained sequence of normalized elements.
#[derive(Debug, Clone)]
pub struct BoundedList {
    field: String,
    spec: ListSpec,
    items: Vec<FieldValue>,
}

impl BoundedList {
    /// Build a list from a raw sequence: the raw length is checked against
    /// the bounds first, then each element goes through the append path so
    /// per-element parsing and duplicate detection match the steady-state
    /// append contract.
    pub(crate) fn from_input(
        field: &str,
        spec: &ListSpec,
        value: Input,
    ) -> ValidationResult<Self> {
        let raw: Vec<Input> = match value {
            Input::Value(Value::Array(items)) => items.into_iter().map(Input::Value).collect(),
            Input::List(items) => items,
            _ => {
                return Err(ValidationError::ExpectedList {
                    field: field.to_string(),
                });
            }
        };

        if spec.min > 0 && raw.len() < spec.min {
            return Err(ValidationError::ListTooShort { min: spec.min });
        }
        if spec.max > 0 && raw.len() > spec.max {
            return Err(ValidationError::ListTooLong { max: spec.max });
        }

        let mut list = Self {
            field: field.to_string(),
            spec: spec.clone(),
            items: Vec::with_capacity(raw.len()),
        };
        for item in raw {
            list.append(item)?;
        }
        Ok(list)
    }

    /// Parse one raw element into its normalized form.
    fn parse(&self, value: Input) -> ValidationResult<FieldValue> {
        match &self.spec.element {
            ElementKind::Nested(schema) => Ok(FieldValue::Record(nested_from_input(
                &self.field,
                schema,
                value,
            )?)),
            ElementKind::Scalar(converter) => {
                let raw = match value {
                    Input::Value(v) => v,
                    other => {
                        return Err(ValidationError::InvalidValue {
                            field: self.field.clone(),
                            type_name: converter.type_name().to_string(),
                            value: other.display(),
                            message: "expected a scalar value".to_string(),
                        });
                    }
                };
                converter.normalize(&raw).map(FieldValue::Scalar).map_err(|err| {
                    ValidationError::InvalidValue {
                        field: self.field.clone(),
                        type_name: converter.type_name().to_string(),
                        value: Input::Value(raw).display(),
                        message: err.message,
                    }
                })
            }
        }
    }

    /// Append an element, enforcing the max bound and the no-duplicates
    /// invariant.
    pub fn append(&mut self, value: impl Into<Input>) -> ValidationResult<()> {
        if self.spec.max > 0 && self.items.len() == self.spec.max {
            return Err(ValidationError::ListTooLong { max: self.spec.max });
        }
        let item = self.parse(value.into())?;
        if !self.spec.allow_dups && self.items.contains(&item) {
            return Err(Self::duplicate(&item));
        }
        self.items.push(item);
        Ok(())
    }

    /// Overwrite the element at `index`. Duplicate detection excludes the
    /// slot being overwritten, so writing a slot's own value back is not a
    /// conflict.
    pub fn set(&mut self, index: usize, value: impl Into<Input>) -> ValidationResult<()> {
        if index >= self.items.len() {
            return Err(ValidationError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let item = self.parse(value.into())?;
        if !self.spec.allow_dups
            && self
                .items
                .iter()
                .enumerate()
                .any(|(i, existing)| i != index && *existing == item)
        {
            return Err(Self::duplicate(&item));
        }
        self.items[index] = item;
        Ok(())
    }

    /// Remove the element at `index`, unless that would drop the length
    /// below the minimum.
    pub fn remove(&mut self, index: usize) -> ValidationResult<FieldValue> {
        if index >= self.items.len() {
            return Err(ValidationError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        if self.spec.min > 0 && self.items.len() - 1 < self.spec.min {
            return Err(ValidationError::ListTooShort { min: self.spec.min });
        }
        Ok(self.items.remove(index))
    }

    /// Remove a range of elements. The projected length is checked before
    /// any mutation, so a rejected removal leaves the list untouched. The
    /// range is clamped to the current length, slice-style.
    pub fn remove_range(&mut self, range: impl RangeBounds<usize>) -> ValidationResult<()> {
        let len = self.items.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e + 1,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        let start = start.min(len);
        let end = end.min(len);
        if start >= end {
            return Ok(());
        }
        if self.spec.min > 0 && len - (end - start) < self.spec.min {
            return Err(ValidationError::ListTooShort { min: self.spec.min });
        }
        self.items.drain(start..end);
        Ok(())
    }

    fn duplicate(item: &FieldValue) -> ValidationError {
        let value = match item {
            FieldValue::Scalar(Value::String(s)) => s.clone(),
            FieldValue::Scalar(v) => v.to_string(),
            other => format!("{other:?}"),
        };
        ValidationError::DuplicateListItem { value }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldValue> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[FieldValue] {
        &self.items
    }

    /// Index of the first element equal to the given scalar value.
    pub fn position(&self, value: &Value) -> Option<usize> {
        self.items
            .iter()
            .position(|item| matches!(item, FieldValue::Scalar(v) if v == value))
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.position(value).is_some()
    }

    /// Serialize the elements: nested records through their own dict walk,
    /// scalars through the element serializer.
    pub fn serialize(&self) -> Value {
        self.to_value(true)
    }

    /// JSON form of the elements; `serialize` gates converter serializers
    /// only, structure always materializes.
    pub(crate) fn to_value(&self, serialize: bool) -> Value {
        let items = self
            .items
            .iter()
            .map(|item| match item {
                FieldValue::Record(record) => record.as_value(serialize),
                FieldValue::Scalar(v) => match (&self.spec.element, serialize) {
                    (ElementKind::Scalar(converter), true) => converter.serialize(v),
                    _ => v.clone(),
                },
                FieldValue::Null => Value::Null,
                FieldValue::List(list) => list.to_value(serialize),
                FieldValue::Bucket(bucket) => Value::Object(bucket.clone()),
            })
            .collect();
        Value::Array(items)
    }
}

impl PartialEq for BoundedList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl PartialEq<Vec<Value>> for BoundedList {
    fn eq(&self, other: &Vec<Value>) -> bool {
        self.items.len() == other.len()
            && self
                .items
                .iter()
                .zip(other)
                .all(|(item, value)| matches!(item, FieldValue::Scalar(v) if v == value))
    }
}

impl Index<usize> for BoundedList {
    type Output = FieldValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a BoundedList {
    type Item = &'a FieldValue;
    type IntoIter = std::slice::Iter<'a, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
