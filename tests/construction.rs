//! Construction state-machine tests: positional/keyword reconciliation,
//! defaults, required and nullable rules, the catch-all bucket, attribute
//! access, and lifecycle hooks.

mod common;

use common::{kw, no_kw};
use serde_json::json;
use std::sync::Arc;
use typed_record::convert::Integer;
use typed_record::{Field, Input, Record, Schema, ValidationError};

fn case1() -> Arc<Schema> {
    Schema::builder("Case1")
        .field("a", Field::new().default("foo"))
        .build()
        .unwrap()
}

fn case2() -> Arc<Schema> {
    Schema::builder("Case2")
        .field("a", Field::new().required())
        .field("b", Field::new().required().default("foo"))
        .build()
        .unwrap()
}

#[test]
fn test_default_applies() {
    let schema = case1();
    for record in [
        Record::construct(&schema, vec![], no_kw()).unwrap(),
        Record::construct(&schema, vec!["foo".into()], no_kw()).unwrap(),
        Record::construct(&schema, vec![], kw(vec![("a", "foo".into())]))
            .unwrap(),
    ] {
        assert_eq!(record.get("a").unwrap().value(), Some(&json!("foo")));
    }
}

#[test]
fn test_non_default_value() {
    let schema = case1();
    let positional = Record::construct(&schema, vec!["bar".into()], no_kw()).unwrap();
    assert_eq!(positional.get("a").unwrap().value(), Some(&json!("bar")));
    let keyword = Record::construct(&schema, vec![], kw(vec![("a", "bar".into())]))
        .unwrap();
    assert_eq!(keyword.get("a").unwrap().value(), Some(&json!("bar")));
}

#[test]
fn test_extra_positional_values() {
    let schema = case1();
    let err = Record::construct(&schema, vec!["foo".into(), "extra".into()], no_kw())
        .unwrap_err();
    assert_eq!(err.to_string(), "extra attribute(s): extra");

    let err = Record::construct(&schema, vec!["foo".into(), "extra".into(), "bar".into()], no_kw())
        .unwrap_err();
    assert_eq!(err.to_string(), "extra attribute(s): extra, bar");
}

#[test]
fn test_duplicate_positional_and_keyword() {
    let schema = case1();
    let err = Record::construct(&schema, vec!["foo".into()], kw(vec![("a", "bar".into())]))
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::DuplicateAttribute { name } if name == "a"
    ));
}

#[test]
fn test_repeated_keyword() {
    let schema = case1();
    let err = Record::construct(
        &schema,
        vec![],
        kw(vec![("a", "x".into()), ("a", "y".into())]),
    )
    .unwrap_err();
    assert!(matches!(err, ValidationError::DuplicateAttribute { .. }));
}

#[test]
fn test_unknown_keyword_without_catch_all() {
    let schema = case1();
    let err = Record::construct(&schema, vec![], kw(vec![("b", "yikes".into())]))
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::UnknownAttribute { name } if name == "b"
    ));
}

#[test]
fn test_required_missing() {
    let err = Record::construct(&case2(), vec![], no_kw()).unwrap_err();
    assert_eq!(err.to_string(), "missing required attribute: a");
}

#[test]
fn test_required_null_rejected() {
    let schema = case2();
    let err = Record::construct(&schema, vec![], kw(vec![("a", json!(null).into())]))
        .unwrap_err();
    assert_eq!(err.to_string(), "field cannot be null: a");

    let err = Record::construct(
        &schema,
        vec![],
        kw(vec![("a", "bar".into()), ("b", json!(null).into())]),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "field cannot be null: b");
}

#[test]
fn test_required_with_default_backfills() {
    let record = Record::construct(&case2(), vec!["bar".into()], no_kw()).unwrap();
    assert_eq!(record.get("a").unwrap().value(), Some(&json!("bar")));
    assert_eq!(record.get("b").unwrap().value(), Some(&json!("foo")));
}

#[test]
fn test_nullable_field_round_trips_null() {
    let schema = Schema::builder("Nullable")
        .field("a", Field::new().nullable())
        .build()
        .unwrap();
    let record = Record::construct(&schema, vec![], kw(vec![("a", json!(null).into())]))
        .unwrap();
    assert!(record.get("a").unwrap().is_null());

    // No value supplied: the null default still applies.
    let defaulted = Record::construct(&schema, vec![], no_kw()).unwrap();
    assert!(defaulted.get("a").unwrap().is_null());
}

#[test]
fn test_catch_all_collects_unknown_keywords() {
    let schema = Schema::builder("Open")
        .field("a", Field::new())
        .catch_all("extras")
        .build()
        .unwrap();
    let record = Record::construct(
        &schema,
        vec![],
        kw(vec![("a", "x".into()), ("b", json!(1).into()), ("c", "y".into())]),
    )
    .unwrap();
    let bucket = record.bucket().unwrap();
    assert_eq!(bucket.get("b"), Some(&json!(1)));
    assert_eq!(bucket.get("c"), Some(&json!("y")));
    // Reading the catch-all name returns the bucket.
    assert_eq!(record.get("extras").unwrap().bucket(), Some(bucket));
}

#[test]
fn test_readonly_settable_at_construction_only() {
    let schema = Schema::builder("Frozen")
        .field("a", Field::new().readonly())
        .build()
        .unwrap();
    let mut record = Record::construct(&schema, vec![], kw(vec![("a", "x".into())]))
        .unwrap();
    let err = record.set("a", "y").unwrap_err();
    assert!(matches!(err, ValidationError::ReadOnlyField { .. }));
    assert_eq!(record.get("a").unwrap().value(), Some(&json!("x")));
}

#[test]
fn test_set_and_get_roundtrip() {
    let schema = Schema::builder("T")
        .field("n", Field::of(Integer::new()))
        .build()
        .unwrap();
    let mut record = Record::construct(&schema, vec![], no_kw()).unwrap();
    assert!(!record.has("n"));
    assert!(matches!(
        record.get("n"),
        Err(ValidationError::UnsetAttribute { .. })
    ));

    record.set("n", json!("42")).unwrap();
    assert_eq!(record.get("n").unwrap().value(), Some(&json!(42)));

    let err = record.set("n", json!("nope")).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidValue { .. }));
    assert!(err.to_string().contains("<Integer>"));
    assert!(err.to_string().contains("field 'n'"));
    // Failed write leaves the stored value untouched.
    assert_eq!(record.get("n").unwrap().value(), Some(&json!(42)));
}

#[test]
fn test_converter_name_in_diagnostics() {
    let schema = Schema::builder("Card")
        .field(
            "suit",
            Field::of(typed_record::convert::OneOf::new(["hearts", "spades"]).named("Suit")),
        )
        .build()
        .unwrap();
    let err = Record::construct(&schema, vec![], kw(vec![("suit", "clubs".into())]))
        .unwrap_err();
    assert!(err.to_string().contains("<Suit>"));
    assert!(err.to_string().contains("field 'suit'"));
}

#[test]
fn test_set_undeclared_field() {
    let mut record = Record::construct(&case1(), vec![], no_kw()).unwrap();
    assert!(matches!(
        record.set("zzz", "x"),
        Err(ValidationError::UnknownAttribute { .. })
    ));
}

#[test]
fn test_delete_returns_field_to_unset() {
    let mut record = Record::construct(&case1(), vec![], no_kw()).unwrap();
    record.delete("a").unwrap();
    assert!(!record.has("a"));
    assert!(matches!(
        record.delete("a"),
        Err(ValidationError::UnsetAttribute { .. })
    ));
}

#[test]
fn test_delete_required_rejected() {
    let mut record = Record::construct(&case2(), vec!["bar".into()], no_kw()).unwrap();
    assert!(matches!(
        record.delete("a"),
        Err(ValidationError::DeleteRequired { name }) if name == "a"
    ));
    assert!(record.has("a"));
}

#[test]
fn test_nested_field_from_mapping_and_instance() {
    let inner = Schema::builder("Inner")
        .field("id", Field::of(Integer::new()).required())
        .build()
        .unwrap();
    let outer = Schema::builder("Outer")
        .field("inner", Field::nested(&inner))
        .build()
        .unwrap();

    let from_map = Record::construct(&outer, vec![], kw(vec![("inner", json!({"id": 100}).into())]))
        .unwrap();
    let nested = from_map.get("inner").unwrap().record().unwrap();
    assert_eq!(nested.get("id").unwrap().value(), Some(&json!(100)));

    let instance = Record::construct(&inner, vec![], kw(vec![("id", json!(200).into())]))
        .unwrap();
    let from_instance = Record::construct(&outer, vec![], kw(vec![("inner", Input::Record(instance))]))
        .unwrap();
    assert!(from_instance.get("inner").unwrap().record().is_some());
}

#[test]
fn test_nested_field_wrong_type() {
    let inner = Schema::builder("Inner").field("id", Field::new()).build().unwrap();
    let other = Schema::builder("Other").field("id", Field::new()).build().unwrap();
    let outer = Schema::builder("Outer")
        .field("inner", Field::nested(&inner))
        .build()
        .unwrap();

    let err = Record::construct(&outer, vec![], kw(vec![("inner", json!(5).into())]))
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidNestedType { .. }));

    let wrong = Record::construct(&other, vec![], no_kw()).unwrap();
    let err = Record::construct(&outer, vec![], kw(vec![("inner", Input::Record(wrong))]))
        .unwrap_err();
    assert!(
        matches!(err, ValidationError::InvalidNestedType { ref expected, .. } if expected == "Inner")
    );
}

#[test]
fn test_subclass_override_default() {
    let base = Schema::builder("Base")
        .field("a", Field::new().default("A"))
        .build()
        .unwrap();
    let child = Schema::builder("Child")
        .extends(&base)
        .field("b", Field::new())
        .field("a", Field::new().default("AA"))
        .build()
        .unwrap();

    let record = Record::construct(&child, vec![], kw(vec![("b", "x".into())]))
        .unwrap();
    assert_eq!(record.get("a").unwrap().value(), Some(&json!("AA")));
}

#[test]
fn test_before_set_hook_transforms() {
    let schema = Schema::builder("Hooked")
        .field(
            "a",
            Field::new().before_set(|_record, value| match value {
                Input::Value(serde_json::Value::String(s)) => {
                    Ok(Input::Value(serde_json::Value::String(s.to_uppercase())))
                }
                other => Ok(other),
            }),
        )
        .build()
        .unwrap();
    let mut record = Record::construct(&schema, vec![], no_kw()).unwrap();
    record.set("a", "quiet").unwrap();
    assert_eq!(record.get("a").unwrap().value(), Some(&json!("QUIET")));
}

#[test]
fn test_after_init_and_post_init_hooks() {
    let schema = Schema::builder("Hooked")
        .field(
            "a",
            Field::new().after_init(|record| {
                let seen = record.get("a")?.value().cloned();
                assert_eq!(seen, Some(json!("x")));
                Ok(())
            }),
        )
        .field("log", Field::new())
        .post_init(|record| record.set("log", "done"))
        .build()
        .unwrap();
    let record = Record::construct(&schema, vec![], kw(vec![("a", "x".into())]))
        .unwrap();
    assert_eq!(record.get("log").unwrap().value(), Some(&json!("done")));
}

#[test]
fn test_after_set_hook_fires_on_writes() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    let schema = Schema::builder("Hooked")
        .field(
            "a",
            Field::new().after_set(|_record| {
                CALLS.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
        .build()
        .unwrap();
    // Construction does not fire after_set; only attribute writes do.
    let mut record = Record::construct(&schema, vec![], kw(vec![("a", "x".into())]))
        .unwrap();
    assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    record.set("a", "y").unwrap();
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}
