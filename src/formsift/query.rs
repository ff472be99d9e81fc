//! # Query Builder
//!
//! Turns a form snapshot into two queries:
//!
//! - a [`MatchQuery`], the AND of one [`Clause`] per active field, deciding
//!   which candidates stay visible;
//! - a [`HighlightQuery`], the OR of the positive conditions of every field
//!   flagged `hilite`, deciding which attribute content is marked.
//!
//! Both evaluate natively against [`Item`]s and also render as CSS selector
//! text, so a DOM host can hand them straight to `querySelectorAll` or a
//! style sheet. Attribute names and values are escaped with
//! [`css_escape`] before they are embedded.

use crate::escape::css_escape;
use crate::field::{words, FieldDescriptor, FieldEntry, MatchMode};
use crate::model::Item;
use std::fmt;

/// A single attribute test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Full attribute key, `<component>-<attribute>`.
    pub key: String,
    pub mode: MatchMode,
    pub value: String,
}

impl Condition {
    pub fn new(key: impl Into<String>, mode: MatchMode, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            mode,
            value: value.into(),
        }
    }

    /// Tests this node's own attribute, ignoring ASCII case like the `i` flag
    /// of the rendered selector.
    pub fn holds(&self, node: &Item) -> bool {
        let Some(actual) = node.attr(&self.key) else {
            return false;
        };
        let actual = actual.to_ascii_lowercase();
        let wanted = self.value.to_ascii_lowercase();
        match self.mode {
            MatchMode::Exact => actual == wanted,
            MatchMode::Includes => actual.contains(&wanted),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.mode {
            MatchMode::Exact => "=",
            MatchMode::Includes => "*=",
        };
        write!(
            f,
            "[data-{}{}\"{}\" i]",
            css_escape(&self.key),
            op,
            css_escape(&self.value)
        )
    }
}

/// The contribution of one field: any of its conditions, optionally negated.
///
/// A clause without conditions comes from a malformed field name and always
/// holds, negated or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub field: String,
    pub conditions: Vec<Condition>,
    pub negated: bool,
}

impl Clause {
    pub fn is_noop(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Holds when the item or any descendant satisfies one of the conditions,
    /// inverted for negated clauses.
    pub fn matches(&self, item: &Item) -> bool {
        if self.is_noop() {
            return true;
        }
        let hit = item.any_node(&|node| self.conditions.iter().any(|c| c.holds(node)));
        hit != self.negated
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noop() {
            return Ok(());
        }
        let list = selector_list(&self.conditions);
        if self.negated {
            write!(f, ":not(:is({list}, :has({list})))")
        } else {
            write!(f, ":is({list}, :has({list}))")
        }
    }
}

/// Conjunction of all active clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchQuery {
    pub clauses: Vec<Clause>,
}

impl MatchQuery {
    /// True when no field contributed a clause, i.e. the form is blank.
    /// A malformed field still counts even though its clause always holds.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.clauses.iter().all(|c| c.matches(item))
    }

    /// Renders the query as a selector for the container's direct children,
    /// narrowed to `rows` when given.
    pub fn selector(&self, rows: Option<&str>) -> String {
        let clauses: String = self.clauses.iter().map(|c| c.to_string()).collect();
        format!(":scope > {}{}", rows.unwrap_or("*"), clauses)
    }
}

/// Disjunction of the conditions of highlight-flagged fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightQuery {
    pub conditions: Vec<Condition>,
}

impl HighlightQuery {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Tests this node's own attributes only; descendants are marked
    /// individually.
    pub fn marks(&self, node: &Item) -> bool {
        self.conditions.iter().any(|c| c.holds(node))
    }

    /// `:is(...)` over every condition, or an empty string when empty.
    pub fn selector(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(":is({})", selector_list(&self.conditions))
        }
    }
}

fn selector_list(conditions: &[Condition]) -> String {
    conditions
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Positive conditions for one field, before any negation.
fn conditions_for(descriptor: &FieldDescriptor, value: &str, component: &str) -> Vec<Condition> {
    let key = format!("{}-{}", component, descriptor.attribute);
    match descriptor.mode() {
        MatchMode::Exact if value.trim().is_empty() => Vec::new(),
        MatchMode::Exact => vec![Condition::new(key, MatchMode::Exact, value)],
        MatchMode::Includes => words(value)
            .into_iter()
            .map(|w| Condition::new(key.clone(), MatchMode::Includes, w))
            .collect(),
    }
}

/// Builds the match and highlight queries for one filter pass.
///
/// Entries are expected in form order with empty values already removed
/// (see [`FieldEntry::active`]). Malformed names yield no-op clauses and never
/// abort the build.
pub fn build(entries: &[FieldEntry], component: &str) -> (MatchQuery, HighlightQuery) {
    let mut query = MatchQuery::default();
    let mut highlight = HighlightQuery::default();

    for entry in entries {
        let descriptor = FieldDescriptor::parse(&entry.name);

        if descriptor.is_malformed() {
            if words(&entry.value).is_empty() {
                continue;
            }
            tracing::debug!(field = %entry.name, "malformed field name, clause is a no-op");
            query.clauses.push(Clause {
                field: entry.name.clone(),
                conditions: Vec::new(),
                negated: descriptor.negated(),
            });
            continue;
        }

        if !descriptor.modifiers.unknown.is_empty() {
            tracing::debug!(
                field = %entry.name,
                unknown = ?descriptor.modifiers.unknown,
                "ignoring unknown modifiers"
            );
        }

        let conditions = conditions_for(&descriptor, &entry.value, component);
        if conditions.is_empty() {
            continue;
        }

        if descriptor.highlighted() {
            highlight.conditions.extend(conditions.iter().cloned());
        }

        query.clauses.push(Clause {
            field: entry.name.clone(),
            conditions,
            negated: descriptor.negated(),
        });
    }

    (query, highlight)
}
