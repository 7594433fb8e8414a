//! The fragment codec: `#anchor?key=value&key=value`.
//!
//! Query values are read as JSON where they parse as JSON and as plain text
//! otherwise, so `?a=[1,2]&b=true&c=hello` yields an array, a boolean and a
//! string. A text value that happens to look like JSON (`true`, `12`) reads
//! back as JSON; construction quotes such strings to keep them strings.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use crate::datatype::percent_decode;
use crate::state::{Hash, HashEntry};

const COMPONENT: &AsciiSet = &CONTROLS.add(b' ').add(b'%').add(b'&').add(b'=').add(b'#');
const ANCHOR: &AsciiSet = &COMPONENT.add(b'?');

/// Parses a fragment without its leading `#`. Empty fragments yield `None`.
pub fn parse_hash(fragment: &str) -> Option<Hash> {
    let (anchor, query) = match fragment.split_once('?') {
        Some((anchor, query)) => (anchor, query),
        None => (fragment, ""),
    };
    let mut hash = Hash {
        anchor: (!anchor.is_empty()).then(|| percent_decode(anchor)),
        query: Vec::new(),
    };
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let entry = HashEntry::new(percent_decode(key), parse_hash_value(&percent_decode(value)));
        // the query is a map: a repeated key keeps its first position and its last value
        match hash.query.iter_mut().find(|existing| existing.key == entry.key) {
            Some(existing) => existing.value = entry.value,
            None => hash.query.push(entry),
        }
    }
    (!hash.is_empty()).then_some(hash)
}

fn parse_hash_value(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()))
}

/// Builds `#anchor?query`, or the empty string when there is neither.
pub fn construct_hash(hash: &Hash) -> String {
    if hash.is_empty() {
        return String::new();
    }
    let mut fragment = String::from("#");
    if let Some(anchor) = &hash.anchor {
        fragment.push_str(&utf8_percent_encode(anchor, ANCHOR).to_string());
    }
    let mut entries: Vec<(&str, &Value)> = Vec::with_capacity(hash.query.len());
    for entry in &hash.query {
        match entries.iter_mut().find(|(key, _)| *key == entry.key) {
            Some(existing) => existing.1 = &entry.value,
            None => entries.push((entry.key.as_str(), &entry.value)),
        }
    }
    if !entries.is_empty() {
        let query = entries
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, COMPONENT),
                    utf8_percent_encode(&construct_hash_value(value), COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        fragment.push('?');
        fragment.push_str(&query);
    }
    fragment
}

fn construct_hash_value(value: &Value) -> String {
    match value {
        Value::String(text) if serde_json::from_str::<Value>(text).is_err() => text.clone(),
        value => value.to_string(),
    }
}
