//! Schema registry: the ordered, inheritance-merged set of field
//! definitions for a record type.
//!
//! A [`Schema`] is built exactly once, at type-declaration time, through a
//! [`SchemaBuilder`]. Parents contribute their *already-merged* field lists,
//! so multi-level and diamond inheritance terminate in a single pass. After
//! `build` the schema is immutable and shared behind an `Arc`; it is safe
//! to share across instances and threads precisely because it is never
//! mutated again.

use super::types::{Field, PostInitHook};
use crate::error::{BuildError, BuildResult, ValidationResult};
use crate::record::Record;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Names the engine claims for its own accessor surface; fields may not
/// shadow them.
pub const RESERVED_NAMES: &[&str] = &[
    "schema", "get", "set", "delete", "as_value", "from_value", "dumps", "loads",
];

/// The immutable field registry of a record type.
///
/// Field order is the order fields were first introduced while walking
/// ancestors oldest-first and then the declaring type; it governs
/// positional-argument order in [`Record::construct`](crate::Record).
pub struct Schema {
    name: String,
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    catch_all: Option<String>,
    pub(crate) post_init: Option<PostInitHook>,
}

impl Schema {
    /// Start declaring a record type.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            parents: Vec::new(),
            fields: Vec::new(),
            catch_alls: Vec::new(),
            post_init: None,
        }
    }

    /// The record type's name, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All fields in registry order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// O(1) keyed lookup of a field definition.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// The catch-all field name, if this type declares (or inherits) one.
    pub fn catch_all(&self) -> Option<&str> {
        self.catch_all.as_deref()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("catch_all", &self.catch_all)
            .finish_non_exhaustive()
    }
}

/// One-shot builder producing an immutable [`Schema`].
///
/// ```
/// use typed_record::{Field, Schema};
/// use typed_record::convert::Integer;
///
/// let point = Schema::builder("Point")
///     .field("x", Field::of(Integer::new()).required())
///     .field("y", Field::of(Integer::new()).required())
///     .build()
///     .unwrap();
/// assert_eq!(point.fields().len(), 2);
/// ```
pub struct SchemaBuilder {
    name: String,
    parents: Vec<Arc<Schema>>,
    fields: Vec<(String, Field)>,
    catch_alls: Vec<String>,
    post_init: Option<PostInitHook>,
}

impl SchemaBuilder {
    /// Inherit fields and catch-all from a parent schema. May be called
    /// more than once; parents are recorded in declaration order.
    pub fn extends(mut self, parent: &Arc<Schema>) -> Self {
        self.parents.push(Arc::clone(parent));
        self
    }

    /// Declare a field. A name matching an inherited field replaces that
    /// definition in place, preserving its position.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Declare the catch-all bucket for otherwise-undeclared keyword
    /// inputs. At most one per hierarchy; overrides an inherited one.
    pub fn catch_all(mut self, name: impl Into<String>) -> Self {
        self.catch_alls.push(name.into());
        self
    }

    /// Whole-instance hook fired once after construction completes.
    pub fn post_init(
        mut self,
        hook: impl Fn(&mut Record) -> ValidationResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.post_init = Some(Arc::new(hook));
        self
    }

    /// Merge ancestors and local declarations into the final registry.
    ///
    /// Ancestors are walked back-to-front so the first-declared parent's
    /// fields end up overlaying later-declared ones, and each contributes
    /// its already-merged registry. Local declarations overlay last.
    pub fn build(self) -> BuildResult<Arc<Schema>> {
        let mut fields: Vec<Field> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        let mut merge = |name: &str, field: Field| {
            if let Some(&i) = index.get(name) {
                fields[i] = field;
            } else {
                index.insert(name.to_string(), fields.len());
                fields.push(field);
            }
        };

        for parent in self.parents.iter().rev() {
            for field in &parent.fields {
                merge(&field.name, field.clone());
            }
        }

        for (name, mut field) in self.fields {
            if RESERVED_NAMES.contains(&name.as_str()) {
                return Err(BuildError::reserved(name));
            }
            field.name = name.clone();
            merge(&name, field);
        }

        // Catch-all: nearest ancestor with one, local declaration overrides.
        let mut catch_all = self
            .parents
            .iter()
            .find_map(|p| p.catch_all.clone());
        match self.catch_alls.len() {
            0 => {}
            1 => catch_all = Some(self.catch_alls[0].clone()),
            _ => {
                return Err(BuildError::DuplicateCatchAll {
                    first: self.catch_alls[0].clone(),
                    second: self.catch_alls[1].clone(),
                });
            }
        }
        if let Some(name) = &catch_all {
            if RESERVED_NAMES.contains(&name.as_str()) {
                return Err(BuildError::reserved(name.clone()));
            }
            if index.contains_key(name) {
                return Err(BuildError::CatchAllConflict { name: name.clone() });
            }
        }

        debug!(
            "built schema '{}': {} field(s), catch-all {:?}",
            self.name,
            fields.len(),
            catch_all
        );

        Ok(Arc::new(Schema {
            name: self.name,
            fields,
            index,
            catch_all,
            post_init: self.post_init,
        }))
    }
}
