//! The view state a url decodes into, and its building blocks.
//!
//! A [`State`] is a plain value: every parse produces a fresh one and
//! construction only reads it. Which fields are set follows the branch the
//! url took: a *page* (`page`, `part`) or an item *type* with its item, view,
//! span, sort order and find query. The fragment (`hash`) is independent of
//! either branch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::datatype::SpanPoint;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The empty string selects the list rather than a single item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Vec<SpanPoint>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find: Option<ConditionGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Hash>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }
    /// The selected item, if the state is about a single item rather than a list.
    pub fn selected_item(&self) -> Option<&str> {
        self.item.as_deref().filter(|item| !item.is_empty())
    }
}

// ------------- Sort -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOperator {
    #[serde(rename = "+")]
    Ascending,
    #[serde(rename = "-")]
    Descending,
}

impl SortOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "+",
            Self::Descending => "-",
        }
    }
}
impl fmt::Display for SortOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub operator: SortOperator,
}

impl SortSpec {
    pub fn new(key: impl Into<String>, operator: SortOperator) -> Self {
        Self {
            key: key.into(),
            operator,
        }
    }
}

// ------------- Find -------------
/*
The comparison operators of a condition. The url spellings of the negated
forms put a ! in front of the positive one; starts-with and ends-with have no
spelling of their own but are written as = (or !=) with a trailing or leading *.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    #[serde(rename = "=")]
    Contains,
    #[serde(rename = "!=")]
    NotContains,
    #[serde(rename = "==")]
    Equals,
    #[serde(rename = "!==")]
    NotEquals,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "!<")]
    NotLess,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "!>")]
    NotGreater,
    #[serde(rename = "^")]
    StartsWith,
    #[serde(rename = "!^")]
    NotStartsWith,
    #[serde(rename = "$")]
    EndsWith,
    #[serde(rename = "!$")]
    NotEndsWith,
}

impl ConditionOperator {
    /// Spellings recognized in a url, most specific first.
    pub const SPELLINGS: [(&'static str, ConditionOperator); 8] = [
        ("!==", Self::NotEquals),
        ("==", Self::Equals),
        ("!=", Self::NotContains),
        ("=", Self::Contains),
        ("!<", Self::NotLess),
        ("<", Self::Less),
        ("!>", Self::NotGreater),
        (">", Self::Greater),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "=",
            Self::NotContains => "!=",
            Self::Equals => "==",
            Self::NotEquals => "!==",
            Self::Less => "<",
            Self::NotLess => "!<",
            Self::Greater => ">",
            Self::NotGreater => "!>",
            Self::StartsWith => "^",
            Self::NotStartsWith => "!^",
            Self::EndsWith => "$",
            Self::NotEndsWith => "!$",
        }
    }
    pub fn is_negated(&self) -> bool {
        self.as_str().starts_with('!')
    }
}
impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl FromStr for ConditionOperator {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Contains,
            Self::NotContains,
            Self::Equals,
            Self::NotEquals,
            Self::Less,
            Self::NotLess,
            Self::Greater,
            Self::NotGreater,
            Self::StartsWith,
            Self::NotStartsWith,
            Self::EndsWith,
            Self::NotEndsWith,
        ]
        .into_iter()
        .find(|operator| operator.as_str() == s)
        .ok_or_else(|| format!("Unknown condition operator: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Single(String),
    Range(String, String),
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}
impl From<(&str, &str)> for ConditionValue {
    fn from((from, to): (&str, &str)) -> Self {
        Self::Range(from.to_owned(), to.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,
    pub operator: ConditionOperator,
    pub value: ConditionValue,
}

impl Condition {
    pub fn new(key: impl Into<String>, operator: ConditionOperator, value: impl Into<ConditionValue>) -> Self {
        Self {
            key: key.into(),
            operator,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(rename = "&")]
    And,
    #[serde(rename = "|")]
    Or,
}

impl LogicalOperator {
    pub fn as_char(&self) -> char {
        match self {
            Self::And => '&',
            Self::Or => '|',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FindNode {
    Condition(Condition),
    Group(ConditionGroup),
}

impl From<Condition> for FindNode {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}
impl From<ConditionGroup> for FindNode {
    fn from(group: ConditionGroup) -> Self {
        Self::Group(group)
    }
}

/// One nesting level of a find query: every member is joined by the same operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub conditions: Vec<FindNode>,
    pub operator: LogicalOperator,
}

impl ConditionGroup {
    pub fn new(operator: LogicalOperator, conditions: Vec<FindNode>) -> Self {
        Self { conditions, operator }
    }
    pub fn empty() -> Self {
        Self::new(LogicalOperator::And, Vec::new())
    }
}

// ------------- Hash -------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hash {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<HashEntry>,
}

impl Hash {
    pub fn is_empty(&self) -> bool {
        self.anchor.is_none() && self.query.is_empty()
    }
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.query.iter().find(|entry| entry.key == key).map(|entry| &entry.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashEntry {
    pub key: String,
    pub value: Value,
}

impl HashEntry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self { key: key.into(), value }
    }
}
