//! viewurl – a bidirectional codec between view-state urls and structured view state.
//!
//! An application with a schema of *item types* (each with list and item
//! *views*), free-form *pages* and searchable *find keys* keeps its whole view
//! state in the url:
//!
//! ```text
//! /cities/paris/video/0:01:30,0:02:00
//! /cities/grid/population/population>1000000&(continent=Europe|continent=Asia)
//! /-45,-90,45,90#?zoom=3
//! /about/team
//! ```
//!
//! [`Codec::parse`] reads such a url into a [`State`] and [`Codec::construct`]
//! writes the shortest url for a state. Parsing never fails: anything that does
//! not fit the grammar ends up in the find query. Host-specific decisions (is
//! this segment an item?) go through the async [`Hooks`] trait.
//!
//! ## Modules
//! * [`schema`] – schema documents, validated into typed lookup tables.
//! * [`state`] – the decoded state: sort specs, find conditions, hash.
//! * [`datatype`] – value types, escaping, dates, durations and spans.
//! * [`find`] – the find grammar (conditions joined by `&`/`|`, parenthesized groups).
//! * [`hash`] – the `#anchor?key=value` fragment.
//! * [`hooks`] – the host hook trait, plus [`hooks::StaticHooks`] answering from tables.
//! * [`resolver`] – the segment-by-segment parse.
//! * [`codec`] – [`Codec`], tying both directions to one schema.
//! * [`interface`] – [`interface::Navigator`] keeping a location in step with the codec.
//! * [`settings`] – settings file and environment for the binary.
//! * [`server`] – the HTTP surface (`POST /v1/parse`, `POST /v1/construct`).
//!
//! ## Quick Start
//! ```
//! use viewurl::{Codec, NoHooks, Schema};
//! let schema = Schema::from_json(r#"{
//!     "findKeys": [{"id": "name", "type": "string"}],
//!     "types": ["cities"],
//!     "views": {"cities": {"list": ["grid", "map"], "item": ["info"]}},
//!     "sortKeys": {"cities": {"list": {"grid": [{"id": "name", "operator": "+"}]}}},
//!     "spanType": {"cities": {"list": {"map": "location"}}}
//! }"#).unwrap();
//! let codec = Codec::new(schema, NoHooks);
//! let state = tokio_test_block_on(codec.parse("/map/-45,-90,45,90"));
//! assert_eq!(state.view.as_deref(), Some("map"));
//! assert_eq!(codec.construct(&state), "/map/-45,-90,45,90");
//! # fn tokio_test_block_on<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
//! # }
//! ```

pub mod codec;
pub mod datatype;
pub mod error;
pub mod find;
pub mod hash;
pub mod hooks;
pub mod interface;
pub mod resolver;
pub mod schema;
pub mod server;
pub mod settings;
pub mod state;

pub use codec::Codec;
pub use error::{Result, ViewUrlError};
pub use hooks::{Hooks, NoHooks, SpanHint, StaticHooks};
pub use schema::Schema;
pub use settings::Settings;
pub use state::State;
