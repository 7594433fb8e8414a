mod common;

use common::schema;
use serde_json::{json, Value};
use viewurl::datatype::{SpanType, ValueType};
use viewurl::schema::{Context, Schema, WILDCARD};
use viewurl::ViewUrlError;

fn minimal() -> Value {
    json!({
        "findKeys": [{"id": "name", "type": "string"}],
        "types": ["things"],
        "views": {"things": {"list": ["grid"]}}
    })
}

fn build(config: Value) -> Result<Schema, ViewUrlError> {
    Schema::from_json(&config.to_string())
}

fn rejected(config: Value, needle: &str) {
    match build(config) {
        Err(ViewUrlError::Schema { message }) => {
            assert!(message.contains(needle), "'{}' does not mention '{}'", message, needle)
        }
        other => panic!("expected a schema error about '{}', got {:?}", needle, other),
    }
}

#[test]
fn fixture_tables() {
    let schema = schema();
    let cities = schema.item_type("cities").expect("cities declared");
    assert_eq!(schema.default_type().id(), "countries");
    assert_eq!(schema.type_index("cities"), Some(1));
    assert!(schema.is_page("about"));
    assert_eq!(cities.default_view(Context::List).map(|view| view.id()), Some("grid"));
    assert_eq!(cities.default_view(Context::Item).map(|view| view.id()), Some("info"));
    assert_eq!(
        cities.span_types(Context::List),
        vec![SpanType::Location, SpanType::Date, SpanType::Duration]
    );
    let grid = schema.view("cities", Context::List, "grid").expect("grid declared");
    assert_eq!(grid.sort_keys().len(), 2);
    assert_eq!(grid.span_type(), None);
    assert_eq!(schema.views("countries", Context::Item).len(), 3);
    assert!(schema.views("villages", Context::List).is_empty());
    assert_eq!(schema.find_key("continent").map(|key| key.values().len()), Some(6));
}

#[test]
fn wildcard_is_always_present() {
    let schema = build(minimal()).expect("schema ok");
    let wildcard = schema.wildcard();
    assert_eq!(wildcard.id(), WILDCARD);
    assert_eq!(wildcard.value_type(), ValueType::String);
    assert_eq!(schema.find_keys().len(), 2);
}

#[test]
fn sort_keys_and_span_types_are_optional() {
    let schema = build(minimal()).expect("schema ok");
    let grid = schema.view("things", Context::List, "grid").expect("grid declared");
    assert!(grid.sort_keys().is_empty());
    assert_eq!(grid.span_type(), None);
    assert!(schema.item_type("things").expect("declared").views(Context::Item).is_empty());
}

#[test]
fn misconfigurations_are_reported() {
    let mut config = minimal();
    config["types"] = json!([]);
    rejected(config, "at least one type");

    let mut config = minimal();
    config["types"] = json!(["things", "things"]);
    rejected(config, "duplicate type");

    let mut config = minimal();
    config["pages"] = json!(["things"]);
    rejected(config, "both as a page and as a type");

    let mut config = minimal();
    config["findKeys"] = json!([{"id": "a=b", "type": "string"}]);
    rejected(config, "not a valid id");

    let mut config = minimal();
    config["findKeys"] = json!([{"id": "kind", "type": "enum"}]);
    rejected(config, "declares no values");

    let mut config = minimal();
    config["findKeys"] = json!([{"id": "name", "type": "string"}, {"id": "name", "type": "text"}]);
    rejected(config, "duplicate find key");

    let mut config = minimal();
    config["types"] = json!(["things", "others"]);
    rejected(config, "type 'others' declares no views");

    let mut config = minimal();
    config["views"]["things"]["list"] = json!([]);
    rejected(config, "no list views");

    let mut config = minimal();
    config["views"]["things"]["list"] = json!(["grid", "grid"]);
    rejected(config, "duplicate things list view");

    let mut config = minimal();
    config["views"]["others"] = json!({"list": ["grid"]});
    rejected(config, "views references undeclared type 'others'");

    let mut config = minimal();
    config["sortKeys"] = json!({"things": {"list": {"map": [{"id": "name", "operator": "+"}]}}});
    rejected(config, "sortKeys references undeclared list view 'map'");

    let mut config = minimal();
    config["sortKeys"] = json!({"things": {"list": {"grid": [
        {"id": "name", "operator": "+"},
        {"id": "name", "operator": "-"}
    ]}}});
    rejected(config, "duplicate sort key");

    let mut config = minimal();
    config["spanType"] = json!({"others": {"list": {"grid": "date"}}});
    rejected(config, "spanType references undeclared type 'others'");
}

#[test]
fn malformed_documents_are_schema_errors() {
    rejected(json!({"types": ["things"]}), "views");

    let mut config = minimal();
    config["spanType"] = json!({"things": {"list": {"grid": "colour"}}});
    rejected(config, "colour");

    assert!(matches!(Schema::from_file("does/not/exist.json"), Err(ViewUrlError::Io(_))));
}
