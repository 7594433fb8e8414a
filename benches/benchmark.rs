use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use viewurl::find::parse_find;
use viewurl::{Codec, Schema, StaticHooks};

const SCHEMA: &str = r#"{
    "findKeys": [
        {"id": "name", "type": "string"},
        {"id": "population", "type": "integer"},
        {"id": "continent", "type": "enum", "values": ["Africa", "Asia", "Europe"]}
    ],
    "types": ["countries", "cities"],
    "views": {
        "countries": {"list": ["map", "grid"], "item": ["info"]},
        "cities": {"list": ["grid", "map", "clips"], "item": ["info", "video"]}
    },
    "sortKeys": {"cities": {"list": {"grid": [{"id": "name", "operator": "+"}]}}},
    "spanType": {
        "countries": {"list": {"map": "location"}},
        "cities": {"list": {"map": "location", "clips": "duration"}, "item": {"video": "duration"}}
    }
}"#;

pub fn criterion_benchmark(c: &mut Criterion) {
    let schema = Schema::from_json(SCHEMA).expect("schema ok");
    let hooks = StaticHooks::new().with_item("cities", "paris");
    let codec = Codec::new(schema, hooks);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime ok");

    let find = "population>1000&(continent=Europe|continent=Asia)&name=Par*";
    c.bench_function("parse find", |b| b.iter(|| parse_find(black_box(find), codec.schema())));

    let urls = [
        "/",
        "/cities",
        "/-45,-90,45,90",
        "/cities/paris/video/0:01:00,0:02:00",
        "/cities/grid/-name/population>1000&(continent=Europe|continent=Asia)#?zoom=3",
    ];
    for url in urls {
        c.bench_function(&format!("parse {}", url), |b| {
            b.iter(|| runtime.block_on(codec.parse(black_box(url))))
        });
        let state = runtime.block_on(codec.parse(url));
        c.bench_function(&format!("construct {}", url), |b| b.iter(|| codec.construct(black_box(&state))));
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
