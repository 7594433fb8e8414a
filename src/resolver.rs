//! The segment resolver: reads a path left to right into a [`State`].
//!
//! Segments are matched in a fixed grammar order and never revisited:
//!
//! ```text
//! /page[/part]
//! /[type][/item[/itemview] | /listview][/span][/sort][/find...]
//! ```
//!
//! Every stage is optional. A segment that does not fit the stage at hand is
//! left for the next one, and whatever remains at the end is read as a find
//! query, so resolution always yields a state. Where the schema alone cannot
//! decide (items, page parts, named spans) the host [`Hooks`] are consulted.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};

use crate::datatype::{decode_value, infer_span_type, is_numerical_span, parse_span, SpanType};
use crate::find::parse_find;
use crate::hash::parse_hash;
use crate::hooks::{Hooks, SpanHint};
use crate::schema::{Context, ItemType, Schema, View};
use crate::state::{SortOperator, SortSpec, State};

lazy_static! {
    static ref NAMED_SPAN: Regex = Regex::new(r"^[A-Z@]").unwrap();
}

/// Resolves `url` (path and optional `#fragment`) against the schema.
pub async fn resolve<H: Hooks>(schema: &Schema, hooks: &H, url: &str) -> State {
    let url = strip_origin(url);
    let (path, fragment) = match url.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (url, None),
    };
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    let state = State {
        hash: fragment.and_then(parse_hash),
        ..State::default()
    };
    let mut resolver = Resolver {
        schema,
        hooks,
        segments: &segments,
        position: 0,
        state,
    };
    resolver.run().await;
    let mut state = resolver.state;
    hooks.get_hash(&mut state).await;
    debug!(url, state = ?state, "resolved");
    state
}

// absolute urls are accepted, only their path and fragment matter
fn strip_origin(url: &str) -> &str {
    match url.split_once("://") {
        Some((scheme, rest)) if !scheme.contains(['/', '#']) => match rest.find(['/', '#']) {
            Some(index) => &rest[index..],
            None => "",
        },
        _ => url,
    }
}

struct Resolver<'a, H> {
    schema: &'a Schema,
    hooks: &'a H,
    segments: &'a [&'a str],
    position: usize,
    state: State,
}

impl<'a, H: Hooks> Resolver<'a, H> {
    fn peek(&self) -> Option<&'a str> {
        self.segments.get(self.position).copied()
    }
    fn consume(&mut self) {
        self.position += 1;
    }
    fn context(&self) -> Context {
        Context::of(self.state.item.as_deref())
    }
    fn item_type(&self) -> Option<&'a ItemType> {
        let schema = self.schema;
        self.state.kind.as_deref().and_then(|kind| schema.item_type(kind))
    }
    fn view(&self) -> Option<&'a View> {
        let item_type = self.item_type()?;
        let context = self.context();
        self.state.view.as_deref().and_then(|view| item_type.view(context, view))
    }

    async fn run(&mut self) {
        let Some(first) = self.peek() else {
            trace!("empty path");
            return;
        };
        if self.schema.is_page(first) {
            self.page(first).await;
            return;
        }
        if !self.item().await {
            return;
        }
        self.item_view();
        if !self.span().await {
            return;
        }
        self.sort();
        self.find();
    }

    async fn page(&mut self, page: &str) {
        trace!(page, "page");
        self.state.page = Some(page.to_owned());
        self.consume();
        if let Some(segment) = self.peek() {
            self.hooks.get_part(&mut self.state, &decode_value(segment)).await;
            // consumed even when the host did not recognize it as a part
            self.consume();
        }
    }

    /// Type, then list view or item. Returns false when the path is exhausted.
    async fn item(&mut self) -> bool {
        let schema = self.schema;
        let item_type = match self.peek().and_then(|segment| schema.item_type(segment)) {
            Some(item_type) => {
                self.consume();
                item_type
            }
            None => schema.default_type(),
        };
        trace!(kind = item_type.id(), "type");
        self.state.kind = Some(item_type.id().to_owned());

        let Some(segment) = self.peek() else {
            self.state.item = Some(String::new());
            self.state.view = item_type.default_view(Context::List).map(|view| view.id().to_owned());
            return false;
        };
        if item_type.view(Context::List, segment).is_some() {
            trace!(view = segment, "list view");
            self.state.item = Some(String::new());
            self.state.view = Some(segment.to_owned());
            self.consume();
            return true;
        }
        self.hooks.get_item(&mut self.state, &decode_value(segment)).await;
        if self.state.selected_item().is_some() {
            trace!(item = ?self.state.item, "item");
            self.consume();
        } else {
            self.state.item = Some(String::new());
        }
        true
    }

    fn item_view(&mut self) {
        if self.state.selected_item().is_none() {
            return;
        }
        if let (Some(segment), Some(item_type)) = (self.peek(), self.item_type()) {
            if item_type.view(Context::Item, segment).is_some() {
                trace!(view = segment, "item view");
                self.state.view = Some(segment.to_owned());
                self.consume();
            }
        }
    }

    /// Returns false when the path is exhausted.
    async fn span(&mut self) -> bool {
        let Some(segment) = self.peek() else {
            self.default_view();
            return false;
        };
        let mut span_type = None;
        if let Some(item_type) = self.item_type().filter(|_| is_numerical_span(segment)) {
            let context = self.context();
            // without a view, the span may be of any type a view of this context supports
            let candidates: Vec<SpanType> = match self.state.view.as_deref() {
                Some(view) => item_type.view(context, view).and_then(View::span_type).into_iter().collect(),
                None => item_type.span_types(context),
            };
            span_type = infer_span_type(segment, &candidates);
            trace!(segment, ?candidates, ?span_type, "span type");
            if let Some(span) = span_type.and_then(|span_type| parse_span(segment, span_type)) {
                if self.state.view.is_none() {
                    self.state.view = item_type
                        .views(context)
                        .iter()
                        .find(|view| view.span_type() == span_type)
                        .map(|view| view.id().to_owned());
                }
                self.state.span = Some(span);
                self.consume();
            }
        }
        if span_type == Some(SpanType::Duration) {
            if let Some(span) = self.state.span.clone() {
                self.hooks.get_span(&mut self.state, SpanHint::Parsed(span)).await;
            }
        } else if self.state.span.is_none() && NAMED_SPAN.is_match(segment) {
            self.hooks.get_span(&mut self.state, SpanHint::Named(decode_value(segment))).await;
            if self.state.span.is_some() {
                trace!(segment, "named span");
                self.consume();
            }
        }
        self.default_view();
        true
    }

    fn default_view(&mut self) {
        if self.state.view.is_none() {
            let context = self.context();
            self.state.view = self
                .item_type()
                .and_then(|item_type| item_type.default_view(context))
                .map(|view| view.id().to_owned());
        }
    }

    fn sort(&mut self) {
        let (Some(segment), Some(item_type)) = (self.peek(), self.item_type()) else {
            return;
        };
        let parts: Vec<(&str, Option<SortOperator>)> = segment
            .split(',')
            .map(|part| {
                if let Some(key) = part.strip_prefix('+') {
                    (key, Some(SortOperator::Ascending))
                } else if let Some(key) = part.strip_prefix('-') {
                    (key, Some(SortOperator::Descending))
                } else {
                    (part, None)
                }
            })
            .collect();
        let candidates: Vec<&View> = match self.view() {
            Some(view) => vec![view],
            None if self.state.view.is_none() => item_type.views(self.context()).iter().collect(),
            None => Vec::new(),
        };
        for view in candidates {
            let sort: Option<Vec<SortSpec>> = parts
                .iter()
                .map(|(key, operator)| {
                    view.sort_key(key)
                        .map(|sort_key| SortSpec::new(*key, operator.unwrap_or(sort_key.operator())))
                })
                .collect();
            if let Some(sort) = sort {
                trace!(view = view.id(), ?sort, "sort");
                if self.state.view.is_none() {
                    self.state.view = Some(view.id().to_owned());
                }
                self.state.sort = sort;
                self.consume();
                return;
            }
        }
    }

    fn find(&mut self) {
        if self.position < self.segments.len() {
            let find = self.segments[self.position..].join("/");
            trace!(%find, "find");
            self.state.find = Some(parse_find(&find, self.schema));
            self.position = self.segments.len();
        }
    }
}
