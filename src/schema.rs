//! The schema registry: the per-application vocabulary a url is read against.
//!
//! A schema is handed over once as a loosely typed [`SchemaConfig`] (mirroring
//! the JSON an application ships) and validated into typed tables. Every
//! misconfiguration is reported by [`Schema::new`]; once built, a schema is
//! never mutated and lookups against it cannot fail on account of the schema.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::datatype::{SpanType, ValueType};
use crate::error::{Result, ViewUrlError};
use crate::state::SortOperator;

/// The id of the find key every schema carries, matching any field.
pub const WILDCARD: &str = "*";

// characters the find grammar reserves, so they cannot appear in a find key id
const RESERVED: &[char] = &['=', '!', '<', '>', '&', '|', '(', ')', '*', ',', '/', '#', '%'];

// ------------- Configuration --------------
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaConfig {
    #[serde(default)]
    pub find_keys: Vec<FindKeyConfig>,
    pub types: Vec<String>,
    pub views: HashMap<String, ViewsConfig>,
    #[serde(default)]
    pub sort_keys: HashMap<String, ContextConfig<Vec<SortKeyConfig>>>,
    #[serde(default)]
    pub span_type: HashMap<String, ContextConfig<SpanType>>,
    #[serde(default)]
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindKeyConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewsConfig {
    pub list: Vec<String>,
    #[serde(default)]
    pub item: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ContextConfig<T> {
    #[serde(default)]
    pub list: HashMap<String, T>,
    #[serde(default)]
    pub item: HashMap<String, T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SortKeyConfig {
    pub id: String,
    pub operator: SortOperator,
}

// ------------- Schema --------------
/// Whether a view presents a list of items or a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    List,
    Item,
}

impl Context {
    /// An empty item id means the list.
    pub fn of(item: Option<&str>) -> Self {
        match item {
            Some(item) if !item.is_empty() => Self::Item,
            _ => Self::List,
        }
    }
}
impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Item => write!(f, "item"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FindKey {
    id: String,
    value_type: ValueType,
    values: Vec<String>,
}

impl FindKey {
    pub fn new(id: impl Into<String>, value_type: ValueType, values: Vec<String>) -> Self {
        Self {
            id: id.into(),
            value_type,
            values,
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    id: String,
    operator: SortOperator,
}

impl SortKey {
    pub fn id(&self) -> &str {
        &self.id
    }
    /// The direction used when a url names the key without `+` or `-`.
    pub fn operator(&self) -> SortOperator {
        self.operator
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    id: String,
    sort_keys: Vec<SortKey>,
    span_type: Option<SpanType>,
}

impl View {
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }
    pub fn sort_key(&self, id: &str) -> Option<&SortKey> {
        self.sort_keys.iter().find(|key| key.id == id)
    }
    pub fn span_type(&self) -> Option<SpanType> {
        self.span_type
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemType {
    id: String,
    list: Vec<View>,
    item: Vec<View>,
}

impl ItemType {
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn views(&self, context: Context) -> &[View] {
        match context {
            Context::List => &self.list,
            Context::Item => &self.item,
        }
    }
    pub fn view(&self, context: Context, id: &str) -> Option<&View> {
        self.views(context).iter().find(|view| view.id == id)
    }
    pub fn default_view(&self, context: Context) -> Option<&View> {
        self.views(context).first()
    }
    /// Distinct span types over the views of a context, in view order.
    pub fn span_types(&self, context: Context) -> Vec<SpanType> {
        let mut span_types = Vec::new();
        for span_type in self.views(context).iter().filter_map(|view| view.span_type) {
            if !span_types.contains(&span_type) {
                span_types.push(span_type);
            }
        }
        span_types
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    find_keys: Vec<FindKey>,
    wildcard: usize,
    types: Vec<ItemType>,
    pages: Vec<String>,
}

impl Schema {
    pub fn new(config: SchemaConfig) -> Result<Self> {
        let SchemaConfig {
            find_keys,
            types,
            mut views,
            mut sort_keys,
            mut span_type,
            pages,
        } = config;

        if types.is_empty() {
            return Err(ViewUrlError::schema("at least one type must be declared"));
        }
        unique("type", types.iter())?;
        unique("page", pages.iter())?;
        unique("find key", find_keys.iter().map(|key| &key.id))?;
        if let Some(page) = pages.iter().find(|page| types.contains(page)) {
            return Err(ViewUrlError::schema(format!("'{}' is declared both as a page and as a type", page)));
        }

        let mut find_keys: Vec<FindKey> = find_keys
            .into_iter()
            .map(|key| {
                if key.id != WILDCARD && (key.id.is_empty() || key.id.contains(RESERVED)) {
                    return Err(ViewUrlError::schema(format!("find key '{}' is not a valid id", key.id)));
                }
                if key.value_type == ValueType::Enum && key.values.is_empty() {
                    return Err(ViewUrlError::schema(format!("enum find key '{}' declares no values", key.id)));
                }
                Ok(FindKey::new(key.id, key.value_type, key.values))
            })
            .collect::<Result<_>>()?;
        let wildcard = match find_keys.iter().position(|key| key.id == WILDCARD) {
            Some(index) => index,
            None => {
                find_keys.push(FindKey::new(WILDCARD, ValueType::String, Vec::new()));
                find_keys.len() - 1
            }
        };

        let mut item_types = Vec::with_capacity(types.len());
        for type_id in &types {
            let declared = views
                .remove(type_id)
                .ok_or_else(|| ViewUrlError::schema(format!("type '{}' declares no views", type_id)))?;
            if declared.list.is_empty() {
                return Err(ViewUrlError::schema(format!("type '{}' declares no list views", type_id)));
            }
            let mut type_sort_keys = sort_keys.remove(type_id).unwrap_or_else(ContextConfig::empty);
            let mut type_span_type = span_type.remove(type_id).unwrap_or_else(ContextConfig::empty);
            let list = build_views(
                type_id,
                Context::List,
                declared.list,
                &mut type_sort_keys.list,
                &mut type_span_type.list,
            )?;
            let item = build_views(
                type_id,
                Context::Item,
                declared.item,
                &mut type_sort_keys.item,
                &mut type_span_type.item,
            )?;
            item_types.push(ItemType {
                id: type_id.clone(),
                list,
                item,
            });
        }
        for (table, leftover) in [
            ("views", views.keys().next()),
            ("sortKeys", sort_keys.keys().next()),
            ("spanType", span_type.keys().next()),
        ] {
            if let Some(type_id) = leftover {
                return Err(ViewUrlError::schema(format!("{} references undeclared type '{}'", table, type_id)));
            }
        }

        Ok(Self {
            find_keys,
            wildcard,
            types: item_types,
            pages,
        })
    }
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SchemaConfig = serde_json::from_str(json)
            .map_err(|e| ViewUrlError::schema(e.to_string()))?;
        Self::new(config)
    }
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
    pub fn find_keys(&self) -> &[FindKey] {
        &self.find_keys
    }
    pub fn find_key(&self, id: &str) -> Option<&FindKey> {
        self.find_keys.iter().find(|key| key.id == id)
    }
    pub fn wildcard(&self) -> &FindKey {
        &self.find_keys[self.wildcard]
    }
    pub fn types(&self) -> &[ItemType] {
        &self.types
    }
    pub fn item_type(&self, id: &str) -> Option<&ItemType> {
        self.types.iter().find(|item_type| item_type.id == id)
    }
    pub fn type_index(&self, id: &str) -> Option<usize> {
        self.types.iter().position(|item_type| item_type.id == id)
    }
    pub fn default_type(&self) -> &ItemType {
        &self.types[0]
    }
    pub fn pages(&self) -> &[String] {
        &self.pages
    }
    pub fn is_page(&self, id: &str) -> bool {
        self.pages.iter().any(|page| page == id)
    }
    /// The views of a type in a context; empty for an undeclared type.
    pub fn views(&self, type_id: &str, context: Context) -> &[View] {
        self.item_type(type_id)
            .map(|item_type| item_type.views(context))
            .unwrap_or(&[])
    }
    /// Looks up a view of a type; `None` when either is undeclared.
    pub fn view(&self, type_id: &str, context: Context, view_id: &str) -> Option<&View> {
        self.item_type(type_id)?.view(context, view_id)
    }
}

impl<T> ContextConfig<T> {
    fn empty() -> Self {
        Self {
            list: HashMap::new(),
            item: HashMap::new(),
        }
    }
}

fn unique<'a>(what: &str, ids: impl Iterator<Item = &'a String>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ViewUrlError::schema(format!("duplicate {} '{}'", what, id)));
        }
    }
    Ok(())
}

fn build_views(
    type_id: &str,
    context: Context,
    view_ids: Vec<String>,
    sort_keys: &mut HashMap<String, Vec<SortKeyConfig>>,
    span_types: &mut HashMap<String, SpanType>,
) -> Result<Vec<View>> {
    unique(&format!("{} {} view", type_id, context), view_ids.iter())?;
    let mut views = Vec::with_capacity(view_ids.len());
    for id in view_ids {
        let keys = sort_keys.remove(&id).unwrap_or_default();
        unique(&format!("sort key of {} view '{}'", context, id), keys.iter().map(|key| &key.id))?;
        views.push(View {
            sort_keys: keys
                .into_iter()
                .map(|key| SortKey {
                    id: key.id,
                    operator: key.operator,
                })
                .collect(),
            span_type: span_types.remove(&id),
            id,
        });
    }
    for (table, leftover) in [
        ("sortKeys", sort_keys.keys().next()),
        ("spanType", span_types.keys().next()),
    ] {
        if let Some(view_id) = leftover {
            return Err(ViewUrlError::schema(format!(
                "{} references undeclared {} view '{}' of type '{}'",
                table, context, view_id, type_id
            )));
        }
    }
    Ok(views)
}
