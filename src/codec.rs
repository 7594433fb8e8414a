//! The two directions of the codec, bound to one schema and one set of hooks.

use tracing::debug;

use crate::datatype::{encode_value, format_span};
use crate::find::construct_find;
use crate::hash::construct_hash;
use crate::hooks::Hooks;
use crate::resolver::resolve;
use crate::schema::{Context, Schema, View};
use crate::state::{SortSpec, State};

/// Parses urls into states and constructs urls from states.
///
/// Construction omits whatever parsing would infer anyway (the default type,
/// default sort operators), so a constructed url is the shortest one that
/// reads back into the same state.
#[derive(Debug)]
pub struct Codec<H> {
    schema: Schema,
    hooks: H,
}

impl<H: Hooks> Codec<H> {
    pub fn new(schema: Schema, hooks: H) -> Self {
        Self { schema, hooks }
    }
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Reads a url (path, optional fragment, optionally with scheme and host).
    pub async fn parse(&self, url: &str) -> State {
        resolve(&self.schema, &self.hooks, url).await
    }

    pub fn construct(&self, state: &State) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(page) = &state.page {
            parts.push(page.clone());
            if let Some(part) = state.part.as_deref() {
                parts.push(encode_value(part));
            }
        } else {
            let kind = state.kind.as_deref().unwrap_or(self.schema.default_type().id());
            if let Some(item) = state.selected_item() {
                parts.push(encode_value(item));
            }
            let context = Context::of(state.item.as_deref());
            let view = state
                .view
                .as_deref()
                .and_then(|view| self.schema.view(kind, context, view));
            if let Some(view) = view {
                parts.push(view.id().to_owned());
            }
            if let Some(span) = &state.span {
                parts.push(format_span(span));
            }
            if let (Some(view), false) = (view, state.sort.is_empty()) {
                parts.push(construct_sort(&state.sort, view));
            }
            if let Some(find) = &state.find {
                parts.push(construct_find(find, &self.schema));
            }
            parts.retain(|part| !part.is_empty());
            let leads_with_list_view = state.selected_item().is_none() && view.is_some();
            if self.schema.type_index(kind).is_some_and(|index| index > 0)
                || parts
                    .first()
                    .is_some_and(|first| self.misreads(kind, first, leads_with_list_view))
            {
                parts.insert(0, kind.to_owned());
            }
        }
        parts.retain(|part| !part.is_empty());
        let mut url = format!("/{}", parts.join("/"));
        if let Some(hash) = &state.hash {
            url.push_str(&construct_hash(hash));
        }
        debug!(%url, "constructed");
        url
    }
}

impl<H> Codec<H> {
    // whether a segment right after the omitted default type would be read as something else
    fn misreads(&self, kind: &str, segment: &str, is_list_view: bool) -> bool {
        self.schema.is_page(segment)
            || self.schema.item_type(segment).is_some()
            || (!is_list_view && self.schema.view(kind, Context::List, segment).is_some())
    }
}

// a sort key listed with its default operator goes without a prefix
fn construct_sort(sort: &[SortSpec], view: &View) -> String {
    sort.iter()
        .map(|spec| match view.sort_key(&spec.key) {
            Some(sort_key) if sort_key.operator() == spec.operator => spec.key.clone(),
            _ => format!("{}{}", spec.operator, spec.key),
        })
        .collect::<Vec<_>>()
        .join(",")
}
