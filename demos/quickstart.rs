//! Quickstart: declare a schema, construct records, round-trip JSON.
//!
//! Run with `RUST_LOG=debug cargo run --example quickstart` to see the
//! engine's build and store logging.

use serde_json::json;
use typed_record::convert::{Decimal, Integer, IsoDate};
use typed_record::{Field, ListSpec, Record, Schema};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let line_item = Schema::builder("LineItem")
        .field("sku", Field::new().required())
        .field("qty", Field::of(Integer::new()).default(1))
        .build()?;

    let order = Schema::builder("Order")
        .field("id", Field::of(Integer::new()).required().readonly())
        .field("placed", Field::of(IsoDate::new()))
        .field("total", Field::of(Decimal::new(2)))
        .field("items", Field::list(ListSpec::of_nested(&line_item).min(1)))
        .catch_all("extras")
        .build()?;

    let mut record = Record::construct(
        &order,
        vec![],
        vec![
            ("id".into(), json!(1001).into()),
            ("placed".into(), json!("2024-06-01").into()),
            ("total".into(), json!(24.5).into()),
            ("items".into(), json!([{"sku": "A-1"}, {"sku": "B-2", "qty": 3}]).into()),
            ("channel".into(), json!("web").into()),
        ],
    )?;

    record.list_mut("items")?.append(json!({"sku": "C-3"}))?;

    let text = record.dumps()?;
    println!("serialized: {text}");

    let reloaded = Record::loads(&order, &text)?.expect("non-empty payload");
    println!("total after reload: {:?}", reloaded.get("total")?.value());

    Ok(())
}
