//! Host hooks: the decisions a url cannot make on its own.
//!
//! Whether a segment names an item, a page part or a named span depends on
//! data only the host has. The resolver asks through [`Hooks`], awaiting each
//! hook at most once per parse and in a fixed order (part or item, then span,
//! then hash). A hook answers by mutating the state it is handed; leaving the
//! state alone means "no match".

use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::datatype::SpanPoint;
use crate::state::State;

/// What the resolver hands to [`Hooks::get_span`].
#[derive(Debug, Clone, PartialEq)]
pub enum SpanHint {
    /// A duration span that was already parsed; the host may replace it,
    /// for instance when the literal is really an id shaped like a duration.
    Parsed(Vec<SpanPoint>),
    /// A decoded segment starting with an uppercase letter or `@`.
    Named(String),
}

#[allow(async_fn_in_trait)]
pub trait Hooks {
    /// May set `state.part` for the page in `state.page`.
    async fn get_part(&self, _state: &mut State, _part: &str) {}
    /// May set `state.item` (and anything else) when `item` names an item of `state.kind`.
    async fn get_item(&self, _state: &mut State, _item: &str) {}
    /// May set or replace `state.span`, and `state.view` along with it.
    async fn get_span(&self, _state: &mut State, _hint: SpanHint) {}
    /// May normalize or strip `state.hash`.
    async fn get_hash(&self, _state: &mut State) {}
}

/// Hooks that never match anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl Hooks for NoHooks {}

/// Hooks answering from fixed tables, for hosts that know their items up front.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StaticHooks {
    /// Known parts per page.
    #[serde(default)]
    pub parts: HashMap<String, HashSet<String>>,
    /// Known item ids per type.
    #[serde(default)]
    pub items: HashMap<String, HashSet<String>>,
    /// Named spans, applying to any view.
    #[serde(default)]
    pub spans: HashMap<String, Vec<SpanPoint>>,
    /// When set, hash query entries with other keys are dropped.
    #[serde(default)]
    pub hash_keys: Option<HashSet<String>>,
}

impl StaticHooks {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_part(mut self, page: &str, part: &str) -> Self {
        self.parts.entry(page.to_owned()).or_default().insert(part.to_owned());
        self
    }
    pub fn with_item(mut self, kind: &str, item: &str) -> Self {
        self.items.entry(kind.to_owned()).or_default().insert(item.to_owned());
        self
    }
    pub fn with_span(mut self, name: &str, span: Vec<SpanPoint>) -> Self {
        self.spans.insert(name.to_owned(), span);
        self
    }
    pub fn with_hash_keys<'a>(mut self, keys: impl IntoIterator<Item = &'a str>) -> Self {
        self.hash_keys = Some(keys.into_iter().map(str::to_owned).collect());
        self
    }
}

impl Hooks for StaticHooks {
    async fn get_part(&self, state: &mut State, part: &str) {
        let known = state
            .page
            .as_ref()
            .and_then(|page| self.parts.get(page))
            .is_some_and(|parts| parts.contains(part));
        if known {
            state.part = Some(part.to_owned());
        }
    }
    async fn get_item(&self, state: &mut State, item: &str) {
        let known = state
            .kind
            .as_ref()
            .and_then(|kind| self.items.get(kind))
            .is_some_and(|items| items.contains(item));
        if known {
            state.item = Some(item.to_owned());
        }
    }
    async fn get_span(&self, state: &mut State, hint: SpanHint) {
        if let SpanHint::Named(name) = hint {
            if let Some(span) = self.spans.get(&name) {
                state.span = Some(span.clone());
            }
        }
    }
    async fn get_hash(&self, state: &mut State) {
        let (Some(allowed), Some(hash)) = (&self.hash_keys, state.hash.as_mut()) else {
            return;
        };
        hash.query.retain(|entry| allowed.contains(&entry.key));
        if hash.is_empty() {
            state.hash = None;
        }
    }
}

