mod common;

use common::setup;
use viewurl::interface::{Destination, LocationPort, MemoryLocation, Navigator};
use viewurl::State;

fn navigator(url: &str) -> Navigator<viewurl::StaticHooks, MemoryLocation> {
    Navigator::new(setup(), MemoryLocation::new(url))
}

#[tokio::test]
async fn parse_current_reads_the_location() {
    let navigator = navigator("/cities/paris");
    let state = navigator.parse_current().await;
    assert_eq!(state.item.as_deref(), Some("paris"));
}

#[tokio::test]
async fn push_constructs_the_url_from_a_state() {
    let mut navigator = navigator("/");
    let state = State {
        kind: Some("cities".into()),
        item: Some(String::new()),
        view: Some("map".into()),
        ..State::default()
    };
    let navigated = navigator.push(Destination::State(state.clone()), "Cities").await;
    assert_eq!(navigated, state);
    let location = navigator.location();
    assert_eq!(location.entries().len(), 2);
    assert_eq!(location.current_url(), "/cities/map");
    assert_eq!(location.title(), "Cities");
    assert_eq!(location.current().state, state);
}

#[tokio::test]
async fn push_parses_the_state_from_a_url() {
    let mut navigator = navigator("/");
    let state = navigator.push(Destination::Url("/cities/paris/video".into()), "Paris").await;
    assert_eq!(state.view.as_deref(), Some("video"));
    // the url is kept as given
    assert_eq!(navigator.location().current_url(), "/cities/paris/video");
}

#[tokio::test]
async fn unchanged_urls_are_not_written() {
    let mut navigator = navigator("/cities/grid");
    let state = navigator.parse_current().await;
    navigator.push(Destination::State(state.clone()), "Cities").await;
    navigator.replace(Destination::Both(state, "/cities/grid".into()), "Cities").await;
    assert_eq!(navigator.location().entries().len(), 1);
    assert_eq!(navigator.location().title(), "", "untouched entry");
}

#[tokio::test]
async fn replace_overwrites_the_current_entry() {
    let mut navigator = navigator("/cities/grid");
    navigator.push(Destination::Url("/cities/map".into()), "Map").await;
    navigator.replace(Destination::Url("/cities/calendar".into()), "Calendar").await;
    let location = navigator.location();
    assert_eq!(
        location.entries().iter().map(|entry| entry.url.as_str()).collect::<Vec<_>>(),
        vec!["/cities/grid", "/cities/calendar"]
    );
}

#[tokio::test]
async fn pushing_after_going_back_drops_forward_history() {
    let mut navigator = navigator("/cities/grid");
    navigator.push(Destination::Url("/cities/map".into()), "Map").await;
    navigator.push(Destination::Url("/cities/calendar".into()), "Calendar").await;
    assert!(navigator.location_mut().back());
    assert_eq!(navigator.parse_current().await.view.as_deref(), Some("map"));

    navigator.push(Destination::Url("/cities/clips".into()), "Clips").await;
    let location = navigator.location_mut();
    assert_eq!(location.entries().len(), 3);
    assert!(!location.forward());
    assert_eq!(location.current_url(), "/cities/clips");
}
