//! Value converters: the normalize/serialize units bound to scalar fields
//! and list elements.
//!
//! A converter takes a raw JSON value, normalizes it into its canonical
//! stored form, or fails with a [`ConversionError`]. Serialization back to a
//! primitive defaults to identity; only converters whose stored form is not
//! already its wire form override it. User-defined converters implement
//! [`Converter`] and plug into fields the same way the built-ins do.

use crate::error::ConversionError;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::Value;

/// The converter contract consumed by the record engine.
///
/// `normalize` is required; `serialize` defaults to identity. `type_name`
/// identifies the converter in validation diagnostics.
pub trait Converter: Send + Sync {
    /// Identity of the converter, used in error messages.
    fn type_name(&self) -> &'static str;

    /// Normalize a raw value into its canonical stored form.
    fn normalize(&self, value: &Value) -> Result<Value, ConversionError>;

    /// Serialize a normalized value back to a primitive.
    fn serialize(&self, value: &Value) -> Value {
        value.clone()
    }
}

fn type_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "decimal",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// String converter with optional length bounds.
///
/// Coerces scalars (numbers, booleans) to their string form; arrays and
/// objects are rejected.
#[derive(Debug, Clone, Default)]
pub struct Text {
    min: usize,
    max: Option<usize>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length-bounded text. `max` of zero means unbounded.
    ///
    /// # Panics
    ///
    /// Panics when `max` is non-zero and smaller than `min`; inconsistent
    /// bounds are a declaration-time mistake, not a runtime condition.
    pub fn bounded(min: usize, max: usize) -> Self {
        assert!(
            max == 0 || min <= max,
            "Text bounds are inconsistent: min {min} > max {max}"
        );
        Self {
            min,
            max: if max == 0 { None } else { Some(max) },
        }
    }
}

impl Converter for Text {
    fn type_name(&self) -> &'static str {
        "Text"
    }

    fn normalize(&self, value: &Value) -> Result<Value, ConversionError> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(ConversionError::new(format!(
                    "cannot coerce {} to string",
                    type_of(other)
                )));
            }
        };
        if text.chars().count() < self.min {
            return Err(ConversionError::new(format!(
                "length must be at least {}",
                self.min
            )));
        }
        if let Some(max) = self.max {
            if text.chars().count() > max {
                return Err(ConversionError::new(format!(
                    "length must be no more than {max}"
                )));
            }
        }
        Ok(Value::String(text))
    }
}

/// Integer converter accepting integers and integer-formatted strings.
#[derive(Debug, Clone, Default)]
pub struct Integer;

impl Integer {
    pub fn new() -> Self {
        Self
    }
}

impl Converter for Integer {
    fn type_name(&self) -> &'static str {
        "Integer"
    }

    fn normalize(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| ConversionError::new(format!("not an integer: {s}"))),
            other => Err(ConversionError::new(format!(
                "not an integer: {}",
                type_of(other)
            ))),
        }
    }
}

/// Boolean converter accepting booleans, 0/1, and "0"/"1"/"true"/"false".
#[derive(Debug, Clone, Default)]
pub struct Boolean;

impl Boolean {
    pub fn new() -> Self {
        Self
    }
}

impl Converter for Boolean {
    fn type_name(&self) -> &'static str {
        "Boolean"
    }

    fn normalize(&self, value: &Value) -> Result<Value, ConversionError> {
        let result = match value {
            Value::Bool(b) => *b,
            Value::Number(n) => match n.as_i64() {
                Some(0) => false,
                Some(1) => true,
                _ => return Err(ConversionError::new(format!("not a boolean: {n}"))),
            },
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => return Err(ConversionError::new(format!("not a boolean: {s}"))),
            },
            other => {
                return Err(ConversionError::new(format!(
                    "not a boolean: {}",
                    type_of(other)
                )));
            }
        };
        Ok(Value::Bool(result))
    }
}

/// Fixed-precision decimal converter.
///
/// Accepts numbers and numeric strings; the stored form is a string with
/// exactly `precision` fractional digits so trailing zeros survive the JSON
/// round trip.
///
/// Values route through `f64`, so magnitudes beyond its 53-bit mantissa
/// (roughly 15-16 significant digits) round. Plug in a custom [`Converter`]
/// over a decimal crate where exactness at that scale matters.
#[derive(Debug, Clone)]
pub struct Decimal {
    precision: usize,
}

impl Decimal {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }
}

impl Converter for Decimal {
    fn type_name(&self) -> &'static str {
        "Decimal"
    }

    fn normalize(&self, value: &Value) -> Result<Value, ConversionError> {
        let parsed = match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| ConversionError::new(format!("not a decimal: {n}")))?,
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ConversionError::new(format!("not a decimal: {s}")))?,
            other => {
                return Err(ConversionError::new(format!(
                    "not a decimal: {}",
                    type_of(other)
                )));
            }
        };
        Ok(Value::String(format!("{parsed:.prec$}", prec = self.precision)))
    }
}

/// ISO-8601 calendar date converter (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default)]
pub struct IsoDate;

impl IsoDate {
    pub fn new() -> Self {
        Self
    }
}

impl Converter for IsoDate {
    fn type_name(&self) -> &'static str {
        "IsoDate"
    }

    fn normalize(&self, value: &Value) -> Result<Value, ConversionError> {
        let Value::String(s) = value else {
            return Err(ConversionError::new(format!(
                "not a date: {}",
                type_of(value)
            )));
        };
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| ConversionError::new(format!("not an ISO date: {e}")))?;
        Ok(Value::String(date.format("%Y-%m-%d").to_string()))
    }
}

/// RFC3339 datetime converter.
///
/// Delegates to chrono's RFC3339 parser, which handles timezone offsets,
/// fractional seconds, and calendar validity for free.
#[derive(Debug, Clone, Default)]
pub struct IsoDateTime;

impl IsoDateTime {
    pub fn new() -> Self {
        Self
    }
}

impl Converter for IsoDateTime {
    fn type_name(&self) -> &'static str {
        "IsoDateTime"
    }

    fn normalize(&self, value: &Value) -> Result<Value, ConversionError> {
        let Value::String(s) = value else {
            return Err(ConversionError::new(format!(
                "not a datetime: {}",
                type_of(value)
            )));
        };
        let parsed = DateTime::<FixedOffset>::parse_from_rfc3339(s)
            .map_err(|e| ConversionError::new(format!("not an RFC3339 datetime: {e}")))?;
        Ok(Value::String(parsed.to_rfc3339()))
    }
}

/// JSON blob converter.
///
/// A string normalizes by parsing it as JSON text; any other value passes
/// through as-is. Serializes back to compact JSON text.
#[derive(Debug, Clone, Default)]
pub struct Json;

impl Json {
    pub fn new() -> Self {
        Self
    }
}

impl Converter for Json {
    fn type_name(&self) -> &'static str {
        "Json"
    }

    fn normalize(&self, value: &Value) -> Result<Value, ConversionError> {
        match value {
            Value::String(s) => serde_json::from_str(s)
                .map_err(|e| ConversionError::new(format!("invalid JSON text: {e}"))),
            other => Ok(other.clone()),
        }
    }

    fn serialize(&self, value: &Value) -> Value {
        // to_string on a Value cannot fail
        Value::String(value.to_string())
    }
}

/// Enumerated-set converter: the value must be one of the allowed values.
#[derive(Debug, Clone)]
pub struct OneOf {
    allowed: Vec<Value>,
    name: &'static str,
}

impl OneOf {
    pub fn new(allowed: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            name: "OneOf",
        }
    }

    /// Report a domain-specific name in validation diagnostics instead of
    /// the generic "OneOf".
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Converter for OneOf {
    fn type_name(&self) -> &'static str {
        self.name
    }

    fn normalize(&self, value: &Value) -> Result<Value, ConversionError> {
        if self.allowed.contains(value) {
            Ok(value.clone())
        } else {
            let allowed: Vec<String> = self.allowed.iter().map(Value::to_string).collect();
            Err(ConversionError::new(format!(
                "must be one of ({})",
                allowed.join(", ")
            )))
        }
    }
}
