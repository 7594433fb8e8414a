#![allow(dead_code)]

use viewurl::datatype::{LatLng, SpanPoint};
use viewurl::{Codec, Schema, StaticHooks};

pub const SCHEMA: &str = r#"{
    "findKeys": [
        {"id": "name", "type": "string"},
        {"id": "population", "type": "integer"},
        {"id": "area", "type": "float"},
        {"id": "founded", "type": "date"},
        {"id": "continent", "type": "enum",
         "values": ["Africa", "Asia", "Europe", "North America", "Oceania", "South America"]},
        {"id": "capital", "type": "boolean"},
        {"id": "time", "type": "time"},
        {"id": "year", "type": "year"},
        {"id": "notes", "type": "text"}
    ],
    "types": ["countries", "cities"],
    "pages": ["about", "help"],
    "views": {
        "countries": {"list": ["map", "grid", "list", "chart"], "item": ["info", "map", "timeline"]},
        "cities": {"list": ["grid", "map", "calendar", "clips"], "item": ["info", "video", "map"]}
    },
    "sortKeys": {
        "countries": {
            "list": {
                "grid": [
                    {"id": "name", "operator": "+"},
                    {"id": "population", "operator": "-"},
                    {"id": "area", "operator": "-"}
                ],
                "list": [{"id": "name", "operator": "+"}]
            }
        },
        "cities": {
            "list": {
                "grid": [
                    {"id": "name", "operator": "+"},
                    {"id": "population", "operator": "-"}
                ],
                "clips": [{"id": "duration", "operator": "-"}]
            },
            "item": {
                "video": [{"id": "time", "operator": "+"}]
            }
        }
    },
    "spanType": {
        "countries": {
            "list": {"map": "location", "chart": "number"},
            "item": {"map": "location", "timeline": "date"}
        },
        "cities": {
            "list": {"map": "location", "calendar": "date", "clips": "duration"},
            "item": {"video": "duration", "map": "location"}
        }
    }
}"#;

pub fn schema() -> Schema {
    Schema::from_json(SCHEMA).expect("schema ok")
}

pub fn hooks() -> StaticHooks {
    StaticHooks::new()
        .with_item("cities", "paris")
        .with_item("cities", "new york")
        .with_item("countries", "france")
        .with_item("countries", "about")
        .with_item("countries", "cities")
        .with_part("about", "team")
        .with_span("Paris", vec![SpanPoint::Location(LatLng::new(48.85, 2.35))])
}

pub fn setup() -> Codec<StaticHooks> {
    Codec::new(schema(), hooks())
}
