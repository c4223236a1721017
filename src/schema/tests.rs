//! Tests for schema declaration and the inheritance merge.

use super::registry::Schema;
use super::types::Field;
use crate::convert::Integer;
use crate::error::BuildError;

#[test]
fn test_field_order_is_declaration_order() {
    let schema = Schema::builder("T")
        .field("a", Field::new())
        .field("b", Field::of(Integer::new()))
        .field("c", Field::new())
        .build()
        .unwrap();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn test_field_lookup() {
    let schema = Schema::builder("T")
        .field("a", Field::new().required())
        .build()
        .unwrap();
    assert!(schema.field("a").unwrap().is_required());
    assert!(schema.field("b").is_none());
    assert!(schema.has_field("a"));
}

#[test]
fn test_inherited_fields_come_first() {
    let base = Schema::builder("Base")
        .field("a", Field::new())
        .field("b", Field::new())
        .build()
        .unwrap();
    let child = Schema::builder("Child")
        .extends(&base)
        .field("c", Field::new())
        .build()
        .unwrap();
    let names: Vec<&str> = child.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn test_override_replaces_in_place() {
    let base = Schema::builder("Base")
        .field("a", Field::new().default("A"))
        .field("b", Field::new())
        .build()
        .unwrap();
    let child = Schema::builder("Child")
        .extends(&base)
        .field("c", Field::new())
        .field("a", Field::new().default("AA"))
        .build()
        .unwrap();
    let names: Vec<&str> = child.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert_eq!(
        child.field("a").unwrap().default_policy(),
        &super::DefaultPolicy::Value("AA".into())
    );
}

#[test]
fn test_multi_level_inheritance_merges_grandparent() {
    let grandparent = Schema::builder("GP")
        .field("a", Field::new())
        .build()
        .unwrap();
    let parent = Schema::builder("P")
        .extends(&grandparent)
        .field("b", Field::new())
        .build()
        .unwrap();
    let child = Schema::builder("C")
        .extends(&parent)
        .field("c", Field::new())
        .build()
        .unwrap();
    let names: Vec<&str> = child.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn test_first_declared_parent_wins() {
    let left = Schema::builder("Left")
        .field("a", Field::new().default("left"))
        .build()
        .unwrap();
    let right = Schema::builder("Right")
        .field("a", Field::new().default("right"))
        .field("b", Field::new())
        .build()
        .unwrap();
    let child = Schema::builder("Child")
        .extends(&left)
        .extends(&right)
        .build()
        .unwrap();
    assert_eq!(
        child.field("a").unwrap().default_policy(),
        &super::DefaultPolicy::Value("left".into())
    );
    assert!(child.has_field("b"));
}

#[test]
fn test_reserved_name_rejected() {
    let result = Schema::builder("T").field("get", Field::new()).build();
    assert!(matches!(
        result,
        Err(BuildError::ReservedAttribute { name }) if name == "get"
    ));
}

#[test]
fn test_catch_all_inherited() {
    let base = Schema::builder("Base")
        .field("a", Field::new())
        .catch_all("extras")
        .build()
        .unwrap();
    let child = Schema::builder("Child").extends(&base).build().unwrap();
    assert_eq!(child.catch_all(), Some("extras"));
}

#[test]
fn test_catch_all_local_override() {
    let base = Schema::builder("Base")
        .catch_all("extras")
        .build()
        .unwrap();
    let child = Schema::builder("Child")
        .extends(&base)
        .catch_all("rest")
        .build()
        .unwrap();
    assert_eq!(child.catch_all(), Some("rest"));
}

#[test]
fn test_catch_all_from_nearest_ancestor() {
    let with_bucket = Schema::builder("WithBucket")
        .catch_all("extras")
        .build()
        .unwrap();
    let without = Schema::builder("Without").build().unwrap();
    let child = Schema::builder("Child")
        .extends(&without)
        .extends(&with_bucket)
        .build()
        .unwrap();
    assert_eq!(child.catch_all(), Some("extras"));
}

#[test]
fn test_duplicate_catch_all_rejected() {
    let result = Schema::builder("T")
        .catch_all("extras")
        .catch_all("rest")
        .build();
    assert!(matches!(result, Err(BuildError::DuplicateCatchAll { .. })));
}

#[test]
fn test_catch_all_colliding_with_field_rejected() {
    let result = Schema::builder("T")
        .field("extras", Field::new())
        .catch_all("extras")
        .build();
    assert!(matches!(
        result,
        Err(BuildError::CatchAllConflict { name }) if name == "extras"
    ));
}

#[test]
fn test_schema_is_shareable_across_threads() {
    let schema = Schema::builder("T").field("a", Field::new()).build().unwrap();
    let clone = std::sync::Arc::clone(&schema);
    std::thread::spawn(move || {
        assert!(clone.has_field("a"));
    })
    .join()
    .unwrap();
}
