//! # Field Names
//!
//! Form field names carry a tiny grammar: an attribute name followed by
//! colon-separated modifiers.
//!
//! ```text
//! color              substring match on every word of the value
//! color:exact        full-value equality
//! color:not          negate the clause
//! color:hilite       also highlight matching attribute content
//! color:exact:not:hi modifiers compose freely
//! ```
//!
//! Parsing happens in exactly one place, [`FieldDescriptor::parse`], which
//! turns the name into an attribute plus a fixed set of boolean flags.
//! Malformed names (no attribute before the first colon) are accepted and
//! produce an empty attribute; the query builder turns those into a no-op
//! clause. Callers that want to reject them use [`FieldDescriptor::parse_strict`].

use crate::error::{FilterError, Result};

/// Separator between the attribute name and its modifiers.
pub const MODIFIER_DELIMITER: char = ':';

/// One `(name, value)` pair from a form snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,
    pub value: String,
}

impl FieldEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Keeps only the entries that participate in filtering (non-empty values),
    /// preserving form order.
    pub fn active<I, N, V>(pairs: I) -> Vec<FieldEntry>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(n, v)| FieldEntry::new(n, v))
            .filter(|e| !e.value.is_empty())
            .collect()
    }
}

/// How a field's value is compared against attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every word is a case-insensitive substring test; any word may hit.
    #[default]
    Includes,
    /// The whole value must equal the attribute value, ignoring case.
    Exact,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub exact: bool,
    pub includes: bool,
    pub not: bool,
    pub hilite: bool,
    /// Modifiers we did not recognise, kept for diagnostics only.
    pub unknown: Vec<String>,
}

impl Modifiers {
    /// Exact wins when both `exact` and `includes` are present.
    pub fn mode(&self) -> MatchMode {
        if self.exact {
            MatchMode::Exact
        } else {
            MatchMode::Includes
        }
    }

    fn set(&mut self, modifier: &str) {
        match modifier {
            "exact" => self.exact = true,
            "includes" => self.includes = true,
            "not" => self.not = true,
            "hilite" | "hi" => self.hilite = true,
            "" => {}
            other => self.unknown.push(other.to_string()),
        }
    }
}

/// The parsed form of a field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub attribute: String,
    pub modifiers: Modifiers,
}

impl FieldDescriptor {
    /// Parses a field name permissively. Never fails.
    pub fn parse(name: &str) -> Self {
        let mut parts = name.split(MODIFIER_DELIMITER);
        let attribute = parts.next().unwrap_or_default().to_string();
        let mut modifiers = Modifiers::default();
        for part in parts {
            modifiers.set(part);
        }
        Self {
            attribute,
            modifiers,
        }
    }

    /// Parses a field name, rejecting names without an attribute.
    pub fn parse_strict(name: &str) -> Result<Self> {
        let descriptor = Self::parse(name);
        if descriptor.is_malformed() {
            return Err(FilterError::MalformedField(name.to_string()));
        }
        Ok(descriptor)
    }

    pub fn is_malformed(&self) -> bool {
        self.attribute.is_empty()
    }

    pub fn mode(&self) -> MatchMode {
        self.modifiers.mode()
    }

    pub fn negated(&self) -> bool {
        self.modifiers.not
    }

    pub fn highlighted(&self) -> bool {
        self.modifiers.hilite
    }
}

/// Splits a value into the words used by includes mode.
///
/// The value is trimmed and split on literal spaces only; empty pieces left by
/// repeated spaces are dropped. Tabs and newlines stay part of their word.
pub fn words(value: &str) -> Vec<&str> {
    value
        .trim()
        .split(' ')
        .filter(|w| !w.is_empty())
        .collect()
}
