//! Schema declaration: field definitions and the inheritance-merged
//! registry.

pub mod registry;
pub mod types;

#[cfg(test)]
mod tests;

pub use registry::{Schema, SchemaBuilder, RESERVED_NAMES};
pub use types::{
    AfterInitHook, AfterSetHook, BeforeSetHook, DefaultPolicy, ElementKind, Field, FieldKind,
    ListSpec, PostInitHook,
};
