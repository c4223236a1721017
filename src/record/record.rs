//! Record instances: the value store and its construction/mutation state
//! machine.
//!
//! A [`Record`] pairs one shared, read-only [`Schema`] with a private value
//! store. Construction reconciles positional values, keyword values,
//! defaults, and required/nullable rules against the registry; attribute
//! access goes through the explicit [`get`](Record::get) /
//! [`set`](Record::set) / [`delete`](Record::delete) API, each write routed
//! through the matching field's validation path. Failure at any point
//! aborts the whole operation; no partially-mutated record is observable.

use crate::error::{ValidationError, ValidationResult};
use crate::record::list::BoundedList;
use crate::schema::{DefaultPolicy, Field, FieldKind, Schema};
use log::trace;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Raw input to construction or an attribute write.
///
/// Lets callers pass plain JSON values, already-built nested records, or
/// lists mixing both, without forcing records through a JSON detour.
#[derive(Debug, Clone)]
pub enum Input {
    Value(Value),
    Record(Record),
    List(Vec<Input>),
}

impl Input {
    /// Structural JSON form, applying no converter serializers.
    pub(crate) fn into_value(self) -> Value {
        match self {
            Self::Value(v) => v,
            Self::Record(r) => r.as_value(false),
            Self::List(items) => Value::Array(items.into_iter().map(Self::into_value).collect()),
        }
    }

    /// Human form for error messages; bare strings print unquoted.
    pub(crate) fn display(&self) -> String {
        match self {
            Self::Value(Value::String(s)) => s.clone(),
            Self::Value(v) => v.to_string(),
            Self::Record(r) => format!("<{} record>", r.schema().name()),
            Self::List(items) => format!("<list of {} item(s)>", items.len()),
        }
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Record> for Input {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<Vec<Input>> for Input {
    fn from(items: Vec<Input>) -> Self {
        Self::List(items)
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Self::Value(Value::String(s.to_string()))
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Self::Value(Value::String(s))
    }
}

impl From<i64> for Input {
    fn from(n: i64) -> Self {
        Self::Value(Value::from(n))
    }
}

impl From<bool> for Input {
    fn from(b: bool) -> Self {
        Self::Value(Value::Bool(b))
    }
}

/// A normalized value held in a record's value store.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit null, stored only for nullable fields
    Null,
    /// A converter-normalized scalar
    Scalar(Value),
    /// A nested record
    Record(Record),
    /// A bounded list
    List(BoundedList),
    /// The catch-all bucket of undeclared keyword inputs, raw
    Bucket(Map<String, Value>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The scalar value, if this is a scalar.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn list(&self) -> Option<&BoundedList> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn bucket(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Bucket(b) => Some(b),
            _ => None,
        }
    }

    /// Truthiness over the stored value; serialization only
    /// applies serializers to truthy values.
    pub(crate) fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Scalar(v) => match v {
                Value::Null => false,
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_f64() != Some(0.0),
                Value::String(s) => !s.is_empty(),
                Value::Array(a) => !a.is_empty(),
                Value::Object(o) => !o.is_empty(),
            },
            Self::Record(_) => true,
            Self::List(l) => !l.is_empty(),
            Self::Bucket(b) => !b.is_empty(),
        }
    }
}

/// One instance of a record type: a shared schema plus a private value
/// store keyed by field name. Absent key means "unset".
#[derive(Clone)]
pub struct Record {
    schema: Arc<Schema>,
    values: HashMap<String, FieldValue>,
}

impl Record {
    /// Construct a record instance from positional and keyword values.
    ///
    /// Positional values zip onto fields in registry order. Keyword names
    /// matching no declared field go to the catch-all bucket when one is
    /// declared, and fail otherwise. Missing fields fall back to their
    /// declared defaults; a required field with no default must be
    /// supplied. Fields are then validated and stored in registry order,
    /// firing each field's `after_init` hook and finally the schema's
    /// `post_init` hook.
    pub fn construct(
        schema: &Arc<Schema>,
        args: Vec<Input>,
        kwargs: Vec<(String, Input)>,
    ) -> ValidationResult<Record> {
        trace!(
            "constructing '{}' from {} positional / {} keyword value(s)",
            schema.name(),
            args.len(),
            kwargs.len()
        );

        if args.len() > schema.fields().len() {
            let surplus = args[schema.fields().len()..]
                .iter()
                .map(Input::display)
                .collect();
            return Err(ValidationError::ExtraAttributes { values: surplus });
        }

        // Keyword entries, rejecting repeats.
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries: Vec<(String, Input)> = Vec::with_capacity(kwargs.len() + args.len());
        for (name, value) in kwargs {
            if !seen.insert(name.clone()) {
                return Err(ValidationError::duplicate(name));
            }
            entries.push((name, value));
        }

        // Positional values become keyword entries in registry order.
        for (value, field) in args.into_iter().zip(schema.fields()) {
            if !seen.insert(field.name().to_string()) {
                return Err(ValidationError::duplicate(field.name()));
            }
            entries.push((field.name().to_string(), value));
        }

        // Route entries to declared fields or the catch-all bucket.
        let mut supplied: HashMap<String, Input> = HashMap::new();
        let mut bucket: Map<String, Value> = Map::new();
        for (name, value) in entries {
            if schema.has_field(&name) {
                supplied.insert(name, value);
            } else if schema.catch_all().is_some() {
                bucket.insert(name, value.into_value());
            } else {
                return Err(ValidationError::unknown(name));
            }
        }

        // Required checks and default fill-in.
        for field in schema.fields() {
            if supplied.contains_key(field.name()) {
                continue;
            }
            match field.default_policy() {
                DefaultPolicy::NoDefault => {
                    if field.is_required() {
                        return Err(ValidationError::missing_required(field.name()));
                    }
                }
                DefaultPolicy::Null => {
                    supplied.insert(field.name().to_string(), Input::Value(Value::Null));
                }
                DefaultPolicy::Value(v) => {
                    supplied.insert(field.name().to_string(), Input::Value(v.clone()));
                }
            }
        }

        let mut record = Record {
            schema: Arc::clone(schema),
            values: HashMap::new(),
        };
        if let Some(name) = schema.catch_all() {
            record
                .values
                .insert(name.to_string(), FieldValue::Bucket(bucket));
        }

        // Validate and store in registry order, hooks firing per field.
        for field in schema.fields() {
            if let Some(value) = supplied.remove(field.name()) {
                record.store_value(field, value)?;
                if let Some(hook) = &field.after_init {
                    hook(&mut record)?;
                }
            }
        }

        if let Some(hook) = &schema.post_init {
            hook(&mut record)?;
        }

        Ok(record)
    }
}

impl Record {
    /// The schema this record was built from.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Read a field's stored value. Reading an unset field fails; reading
    /// the catch-all name returns the bucket.
    pub fn get(&self, name: &str) -> ValidationResult<&FieldValue> {
        if !self.schema.has_field(name) && self.schema.catch_all() != Some(name) {
            return Err(ValidationError::unknown(name));
        }
        self.values
            .get(name)
            .ok_or_else(|| ValidationError::unset(name))
    }

    /// True when the named field currently holds a value.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Write a field, routing through the readonly gate, the `before_set`
    /// hook, the field's validation path, and the `after_set` hook.
    pub fn set(&mut self, name: &str, value: impl Into<Input>) -> ValidationResult<()> {
        let schema = Arc::clone(&self.schema);
        let field = schema
            .field(name)
            .ok_or_else(|| ValidationError::unknown(name))?;
        if field.is_readonly() {
            return Err(ValidationError::ReadOnlyField {
                name: name.to_string(),
            });
        }
        let mut value = value.into();
        if let Some(hook) = &field.before_set {
            value = hook(self, value)?;
        }
        self.store_value(field, value)?;
        if let Some(hook) = &field.after_set {
            hook(self)?;
        }
        Ok(())
    }

    /// Return a field to "unset". Required fields may never become unset.
    pub fn delete(&mut self, name: &str) -> ValidationResult<()> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| ValidationError::unknown(name))?;
        if field.is_required() {
            return Err(ValidationError::DeleteRequired {
                name: name.to_string(),
            });
        }
        self.values
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ValidationError::unset(name))
    }

    /// Mutable access to a list-valued field for in-place mutation.
    pub fn list_mut(&mut self, name: &str) -> ValidationResult<&mut BoundedList> {
        if !self.schema.has_field(name) {
            return Err(ValidationError::unknown(name));
        }
        match self.values.get_mut(name) {
            Some(FieldValue::List(list)) => Ok(list),
            Some(_) => Err(ValidationError::ExpectedList {
                field: name.to_string(),
            }),
            None => Err(ValidationError::unset(name)),
        }
    }

    /// The catch-all bucket, when this record type declares one.
    pub fn bucket(&self) -> Option<&Map<String, Value>> {
        let name = self.schema.catch_all()?;
        self.values.get(name).and_then(FieldValue::bucket)
    }

    /// The validate-and-store kernel shared by construction and attribute
    /// writes: null/nullable handling, nested construction, list
    /// construction, or scalar conversion, then the store insert. Inserts
    /// only after full success, so a failed write leaves the store as it
    /// was.
    pub(crate) fn store_value(&mut self, field: &Field, value: Input) -> ValidationResult<()> {
        trace!("set '{}.{}'", self.schema.name(), field.name());

        if matches!(value, Input::Value(Value::Null)) {
            if field.is_nullable() {
                self.values
                    .insert(field.name().to_string(), FieldValue::Null);
                return Ok(());
            }
            return Err(ValidationError::none_value(field.name()));
        }

        let stored = match field.kind() {
            FieldKind::Nested(schema) => {
                FieldValue::Record(nested_from_input(field.name(), schema, value)?)
            }
            FieldKind::List(spec) => {
                FieldValue::List(BoundedList::from_input(field.name(), spec, value)?)
            }
            FieldKind::Scalar(converter) => {
                let raw = match value {
                    Input::Value(v) => v,
                    other => {
                        return Err(ValidationError::InvalidValue {
                            field: field.name().to_string(),
                            type_name: converter.type_name().to_string(),
                            value: other.display(),
                            message: "expected a scalar value".to_string(),
                        });
                    }
                };
                match converter.normalize(&raw) {
                    Ok(v) => FieldValue::Scalar(v),
                    Err(err) => {
                        return Err(ValidationError::InvalidValue {
                            field: field.name().to_string(),
                            type_name: converter.type_name().to_string(),
                            value: Input::Value(raw).display(),
                            message: err.message,
                        });
                    }
                }
            }
        };

        self.values.insert(field.name().to_string(), stored);
        Ok(())
    }

    pub(crate) fn values(&self) -> &HashMap<String, FieldValue> {
        &self.values
    }
}

/// Resolve an input for a nested field or list element: a mapping
/// constructs a new record strictly, an instance of the expected schema
/// passes through, anything else is the wrong nested type.
pub(crate) fn nested_from_input(
    field: &str,
    schema: &Arc<Schema>,
    value: Input,
) -> ValidationResult<Record> {
    match value {
        Input::Record(record) => {
            if Arc::ptr_eq(record.schema(), schema) {
                Ok(record)
            } else {
                Err(ValidationError::invalid_nested(field, schema.name()))
            }
        }
        Input::Value(Value::Object(map)) => {
            let kwargs = map
                .into_iter()
                .map(|(k, v)| (k, Input::Value(v)))
                .collect();
            Record::construct(schema, Vec::new(), kwargs)
        }
        _ => Err(ValidationError::invalid_nested(field, schema.name())),
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema) && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("schema", &self.schema.name())
            .field("values", &self.values)
            .finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_value(true))
    }
}
