mod common;

use std::sync::Mutex;

use common::{schema, setup};
use serde_json::json;
use viewurl::datatype::SpanPoint;
use viewurl::{Codec, Hooks, SpanHint, State, StaticHooks};

/// Records every hook call and answers only for the names it is given.
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
    item: Option<&'static str>,
}

impl Recorder {
    fn record(&self, call: String) {
        self.calls.lock().expect("lock ok").push(call);
    }
    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock ok").clone()
    }
}

impl Hooks for Recorder {
    async fn get_part(&self, _state: &mut State, part: &str) {
        self.record(format!("part:{part}"));
    }
    async fn get_item(&self, state: &mut State, item: &str) {
        self.record(format!("item:{item}"));
        if self.item == Some(item) {
            state.item = Some(item.to_owned());
        }
    }
    async fn get_span(&self, state: &mut State, hint: SpanHint) {
        match hint {
            SpanHint::Parsed(span) => {
                self.record(format!("span:{}", span.len()));
                // the host knows this duration is really a clip id
                state.span = Some(vec![SpanPoint::Name("clip 7".into())]);
            }
            SpanHint::Named(name) => self.record(format!("span:{name}")),
        }
    }
    async fn get_hash(&self, _state: &mut State) {
        self.record("hash".into());
    }
}

fn recording(item: Option<&'static str>) -> Codec<Recorder> {
    Codec::new(
        schema(),
        Recorder {
            item,
            ..Recorder::default()
        },
    )
}

#[tokio::test]
async fn hooks_run_once_each_in_order() {
    let codec = recording(None);
    let state = codec.parse("/cities/Paris_Texas/Rome#?x=1").await;
    assert_eq!(codec.hooks().calls(), vec!["item:Paris Texas", "span:Paris Texas", "hash"]);
    assert_eq!(state.item.as_deref(), Some(""));
    assert!(state.find.is_some());
}

#[tokio::test]
async fn named_span_is_asked_after_the_item() {
    let codec = recording(Some("paris"));
    let state = codec.parse("/cities/paris/Rome").await;
    assert_eq!(codec.hooks().calls(), vec!["item:paris", "span:Rome", "hash"]);
    assert_eq!(state.item.as_deref(), Some("paris"));
    assert_eq!(state.view.as_deref(), Some("info"));
}

#[tokio::test]
async fn list_views_need_no_item_lookup() {
    let codec = recording(None);
    codec.parse("/cities/grid").await;
    codec.parse("/").await;
    assert_eq!(codec.hooks().calls(), vec!["hash", "hash"]);
}

#[tokio::test]
async fn page_parts_are_looked_up() {
    let codec = recording(None);
    let state = codec.parse("/help/getting_started").await;
    assert_eq!(codec.hooks().calls(), vec!["part:getting started", "hash"]);
    assert_eq!(state.page.as_deref(), Some("help"));
}

#[tokio::test]
async fn duration_spans_can_be_replaced() {
    let codec = recording(None);
    let state = codec.parse("/cities/clips/0:07").await;
    assert_eq!(codec.hooks().calls(), vec!["span:1", "hash"]);
    assert_eq!(state.span, Some(vec![SpanPoint::Name("clip 7".into())]));
    assert_eq!(codec.construct(&state), "/cities/clips/clip_7");
}

#[tokio::test]
async fn static_hooks_filter_hash_keys() {
    let codec = Codec::new(schema(), StaticHooks::new().with_hash_keys(["zoom"]));
    let state = codec.parse("/#?zoom=3&junk=1").await;
    let hash = state.hash.expect("hash present");
    assert_eq!(hash.get("zoom"), Some(&json!(3)));
    assert_eq!(hash.get("junk"), None);

    let state = codec.parse("/#?junk=1").await;
    assert_eq!(state.hash, None, "nothing left of the hash");

    let state = codec.parse("/#section?junk=1").await;
    assert_eq!(state.hash.and_then(|hash| hash.anchor), Some("section".to_owned()));
}

#[tokio::test]
async fn static_hooks_know_their_items() {
    let codec = setup();
    assert_eq!(codec.parse("/france").await.item.as_deref(), Some("france"));
    assert_eq!(codec.parse("/cities/france").await.item.as_deref(), Some(""));
}
