//! Field definition types.
//!
//! A [`Field`] describes one named attribute of a record type: its
//! converter (or nested schema, or list specification), its default policy,
//! required/readonly flags, and lifecycle hooks. Fields are declared on a
//! [`SchemaBuilder`](super::SchemaBuilder) and owned by exactly one built
//! [`Schema`](super::Schema); subclass schemas that do not override a field
//! share the parent's definition by cheap clone (the converter and hooks
//! live behind `Arc`).

use crate::convert::{Converter, Text};
use crate::error::ValidationResult;
use crate::record::{Input, Record};
use crate::schema::Schema;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Hook fired for a field after construction sets it.
pub type AfterInitHook = Arc<dyn Fn(&mut Record) -> ValidationResult<()> + Send + Sync>;
/// Hook applied to an incoming value before an attribute write; may
/// transform or reject it.
pub type BeforeSetHook = Arc<dyn Fn(&Record, Input) -> ValidationResult<Input> + Send + Sync>;
/// Hook fired after a successful attribute write.
pub type AfterSetHook = Arc<dyn Fn(&mut Record) -> ValidationResult<()> + Send + Sync>;
/// Whole-instance hook fired once after construction completes.
pub type PostInitHook = Arc<dyn Fn(&mut Record) -> ValidationResult<()> + Send + Sync>;

/// What kind of value a field holds.
#[derive(Clone)]
pub enum FieldKind {
    /// A scalar value normalized by a converter
    Scalar(Arc<dyn Converter>),
    /// A nested record of the given schema
    Nested(Arc<Schema>),
    /// A bounded list of scalar or nested elements
    List(ListSpec),
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(c) => write!(f, "Scalar({})", c.type_name()),
            Self::Nested(s) => write!(f, "Nested({})", s.name()),
            Self::List(spec) => write!(f, "List({})", spec.element.type_name()),
        }
    }
}

impl FieldKind {
    /// Converter identity (or schema name) for diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Self::Scalar(c) => c.type_name().to_string(),
            Self::Nested(s) => s.name().to_string(),
            Self::List(spec) => format!("List<{}>", spec.element.type_name()),
        }
    }
}

/// Element type of a bounded list.
#[derive(Clone)]
pub enum ElementKind {
    Scalar(Arc<dyn Converter>),
    Nested(Arc<Schema>),
}

impl ElementKind {
    pub fn type_name(&self) -> String {
        match self {
            Self::Scalar(c) => c.type_name().to_string(),
            Self::Nested(s) => s.name().to_string(),
        }
    }
}

impl fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Constraints for a list-valued field.
///
/// `max` of zero means unbounded, matching `min`'s zero meaning no lower
/// bound.
#[derive(Debug, Clone)]
pub struct ListSpec {
    pub element: ElementKind,
    pub min: usize,
    pub max: usize,
    pub allow_dups: bool,
}

impl ListSpec {
    /// List of scalar elements normalized by `converter`.
    pub fn of(converter: impl Converter + 'static) -> Self {
        Self {
            element: ElementKind::Scalar(Arc::new(converter)),
            min: 0,
            max: 0,
            allow_dups: true,
        }
    }

    /// List of nested records of `schema`.
    pub fn of_nested(schema: &Arc<Schema>) -> Self {
        Self {
            element: ElementKind::Nested(Arc::clone(schema)),
            min: 0,
            max: 0,
            allow_dups: true,
        }
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    pub fn no_dups(mut self) -> Self {
        self.allow_dups = false;
        self
    }
}

/// Default policy for a field: the three-way no-default / explicit-null /
/// explicit-value state.
///
/// A field whose default is explicitly null is nullable: writing null to it
/// stores null instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DefaultPolicy {
    /// No default declared; a required field without one must be supplied
    #[default]
    NoDefault,
    /// Explicit null default; marks the field nullable
    Null,
    /// Explicit non-null default value
    Value(Value),
}

/// Definition of one named, typed, constrained attribute.
///
/// The name is assigned at registration and immutable thereafter.
#[derive(Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) default: DefaultPolicy,
    pub(crate) is_required: bool,
    pub(crate) is_readonly: bool,
    pub(crate) after_init: Option<AfterInitHook>,
    pub(crate) before_set: Option<BeforeSetHook>,
    pub(crate) after_set: Option<AfterSetHook>,
}

impl Field {
    fn with_kind(kind: FieldKind) -> Self {
        Self {
            name: String::new(),
            kind,
            default: DefaultPolicy::NoDefault,
            is_required: false,
            is_readonly: false,
            after_init: None,
            before_set: None,
            after_set: None,
        }
    }

    /// A plain text field, the default field type.
    pub fn new() -> Self {
        Self::of(Text::new())
    }

    /// A scalar field with the given converter.
    pub fn of(converter: impl Converter + 'static) -> Self {
        Self::with_kind(FieldKind::Scalar(Arc::new(converter)))
    }

    /// A field holding a nested record of `schema`.
    pub fn nested(schema: &Arc<Schema>) -> Self {
        Self::with_kind(FieldKind::Nested(Arc::clone(schema)))
    }

    /// A bounded-list field.
    pub fn list(spec: ListSpec) -> Self {
        Self::with_kind(FieldKind::List(spec))
    }

    /// Declare a non-null default, supplied when construction receives no
    /// value for this field.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = DefaultPolicy::Value(value.into());
        self
    }

    /// Declare an explicit null default, marking the field nullable.
    pub fn nullable(mut self) -> Self {
        self.default = DefaultPolicy::Null;
        self
    }

    /// Require the field: construction fails without a value or default,
    /// and it can never be deleted back to unset.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Reject attribute writes after construction.
    pub fn readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }

    pub fn after_init(
        mut self,
        hook: impl Fn(&mut Record) -> ValidationResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.after_init = Some(Arc::new(hook));
        self
    }

    pub fn before_set(
        mut self,
        hook: impl Fn(&Record, Input) -> ValidationResult<Input> + Send + Sync + 'static,
    ) -> Self {
        self.before_set = Some(Arc::new(hook));
        self
    }

    pub fn after_set(
        mut self,
        hook: impl Fn(&mut Record) -> ValidationResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.after_set = Some(Arc::new(hook));
        self
    }

    /// The field's registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn default_policy(&self) -> &DefaultPolicy {
        &self.default
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn is_readonly(&self) -> bool {
        self.is_readonly
    }

    /// True when the field holds a nested record.
    pub fn is_nested(&self) -> bool {
        matches!(self.kind, FieldKind::Nested(_))
    }

    /// True when the field is nullable (default is explicitly null).
    pub fn is_nullable(&self) -> bool {
        self.default == DefaultPolicy::Null
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("is_required", &self.is_required)
            .field("is_readonly", &self.is_readonly)
            .finish_non_exhaustive()
    }
}
