//! The find grammar: the boolean query embedded in a path.
//!
//! ```text
//! find := term (('&' | '|') term)*
//! term := condition | '(' find ')'
//! ```
//!
//! Every nesting level is joined by a single operator: a level is an *or* as
//! soon as a `|` appears on it outside of parentheses, and an *and* otherwise.
//! Mixing both on one level therefore needs explicit parentheses,
//! `a=1&(b=2|c=3)`.
//!
//! Parsing never fails. Text that does not read as `key operator value` for a
//! declared key becomes a condition on the wildcard key matching the text.

use crate::datatype::{construct_value, decode_value, encode_value, parse_value};
use crate::schema::{Schema, WILDCARD};
use crate::state::{
    Condition, ConditionGroup, ConditionOperator, ConditionValue, FindNode, LogicalOperator,
};

/// A top-level piece of one nesting level.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Piece<'a> {
    Text(&'a str),
    /// The contents of a balanced pair of parentheses.
    Group(&'a str),
}

/// Splits one level into literal text and parenthesized groups.
/// An unmatched `)` stays text, as does everything from an unclosed `(` on.
fn tokenize(input: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut text_start = 0;
    let mut group_start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => {
                if depth == 0 {
                    if text_start < i {
                        pieces.push(Piece::Text(&input[text_start..i]));
                    }
                    group_start = i;
                }
                depth += 1;
            }
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    pieces.push(Piece::Group(&input[group_start + 1..i]));
                    text_start = i + 1;
                }
            }
            _ => (),
        }
    }
    if depth > 0 {
        pieces.push(Piece::Text(&input[group_start..]));
    } else if text_start < input.len() {
        pieces.push(Piece::Text(&input[text_start..]));
    }
    pieces
}

pub fn parse_find(input: &str, schema: &Schema) -> ConditionGroup {
    if input.is_empty() {
        return ConditionGroup::empty();
    }
    let pieces = tokenize(input);
    let operator = if pieces
        .iter()
        .any(|piece| matches!(piece, Piece::Text(text) if text.contains('|')))
    {
        LogicalOperator::Or
    } else {
        LogicalOperator::And
    };

    let mut terms: Vec<Vec<Piece<'_>>> = vec![Vec::new()];
    for piece in pieces {
        match piece {
            Piece::Text(text) => {
                for (i, fragment) in text.split(operator.as_char()).enumerate() {
                    if i > 0 {
                        terms.push(Vec::new());
                    }
                    if !fragment.is_empty() {
                        if let Some(term) = terms.last_mut() {
                            term.push(Piece::Text(fragment));
                        }
                    }
                }
            }
            group => {
                if let Some(term) = terms.last_mut() {
                    term.push(group);
                }
            }
        }
    }

    let conditions = terms
        .into_iter()
        .map(|term| match term.as_slice() {
            [Piece::Group(inner)] => FindNode::Group(parse_find(inner, schema)),
            pieces => {
                let raw: String = pieces
                    .iter()
                    .map(|piece| match piece {
                        Piece::Text(text) => text.to_string(),
                        Piece::Group(inner) => format!("({})", inner),
                    })
                    .collect();
                FindNode::Condition(parse_condition(&raw, schema))
            }
        })
        .collect();
    ConditionGroup::new(operator, conditions)
}

pub fn parse_condition(input: &str, schema: &Schema) -> Condition {
    // comparison operators may arrive percent-escaped by the browser
    let input = input
        .replace("%3C", "<")
        .replace("%3c", "<")
        .replace("%3E", ">")
        .replace("%3e", ">");
    let split = ConditionOperator::SPELLINGS
        .iter()
        .find_map(|(spelling, operator)| {
            input
                .find(spelling)
                .map(|index| (&input[..index], *operator, &input[index + spelling.len()..]))
        })
        .and_then(|(key, operator, value)| {
            schema.find_key(key).map(|find_key| (find_key, operator, value))
        });
    let (find_key, mut operator, mut value) = match split {
        Some(split) => split,
        // missing operator or unknown key
        None => (schema.wildcard(), ConditionOperator::Contains, input.as_str()),
    };

    if matches!(operator, ConditionOperator::Contains | ConditionOperator::NotContains) {
        let negated = operator.is_negated();
        if let Some(rest) = value.strip_prefix('*') {
            value = rest;
            operator = if negated { ConditionOperator::NotEndsWith } else { ConditionOperator::EndsWith };
        } else if let Some(rest) = value.strip_suffix('*') {
            value = rest;
            operator = if negated { ConditionOperator::NotStartsWith } else { ConditionOperator::StartsWith };
        }
    }

    let value = match value.split_once(',') {
        Some((from, to)) if find_key.value_type().is_rangeable() => ConditionValue::Range(
            parse_value(&decode_value(from), find_key),
            parse_value(&decode_value(to), find_key),
        ),
        _ => ConditionValue::Single(parse_value(&decode_value(value), find_key)),
    };
    Condition {
        key: find_key.id().to_owned(),
        operator,
        value,
    }
}

pub fn construct_find(group: &ConditionGroup, schema: &Schema) -> String {
    group
        .conditions
        .iter()
        .map(|node| match node {
            FindNode::Condition(condition) => construct_condition(condition, schema),
            FindNode::Group(group) => format!("({})", construct_find(group, schema)),
        })
        .collect::<Vec<_>>()
        .join(&group.operator.as_char().to_string())
}

pub fn construct_condition(condition: &Condition, schema: &Schema) -> String {
    let find_key = schema.find_key(&condition.key).unwrap_or_else(|| schema.wildcard());
    let encode = |value: &str| encode_value(&construct_value(value, find_key));
    let mut value = match &condition.value {
        ConditionValue::Single(value) => encode(value),
        ConditionValue::Range(from, to) => format!("{},{}", encode(from), encode(to)),
    };
    let spelling = match condition.operator {
        ConditionOperator::StartsWith | ConditionOperator::NotStartsWith => {
            value.push('*');
            if condition.operator.is_negated() { "!=" } else { "=" }
        }
        ConditionOperator::EndsWith | ConditionOperator::NotEndsWith => {
            value.insert(0, '*');
            if condition.operator.is_negated() { "!=" } else { "=" }
        }
        operator => operator.as_str(),
    };
    if find_key.id() == WILDCARD && spelling == "=" {
        value
    } else {
        format!("{}{}{}", find_key.id(), spelling, value)
    }
}
