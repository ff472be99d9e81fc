//! # Match & Highlight Engine
//!
//! Evaluation is split into two phases:
//!
//! 1. [`evaluate`] is pure. It runs the [`MatchQuery`] over the candidates and
//!    derives the highlight marks and style rule, producing a [`MatchResult`].
//! 2. [`commit`] is the only place that mutates candidates. It sets each
//!    candidate's `hidden` flag from the result and is idempotent.
//!
//! The caller decides whether to commit, which is how a canceled `filtered`
//! notification vetoes the visibility change.

use crate::model::Item;
use crate::query::{HighlightQuery, MatchQuery};
use serde::Serialize;

/// Where the candidates live and how highlight rules are scoped.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalContext<'a> {
    /// Name used for the `data-<component>-*` attributes and CSS variables.
    pub component: &'a str,
    /// Stable id of the container. Without it no style rule is produced.
    pub scope_key: Option<&'a str>,
    /// Item selector used in the style rule, `*` when absent.
    pub rows: Option<&'a str>,
    /// Hide everything when the form is blank.
    pub hide_blank: bool,
    pub mark_fallback: &'a str,
    pub mark_text_fallback: &'a str,
}

/// A node designated as highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mark {
    /// Index into the candidate sequence.
    pub item: usize,
    /// Child index path from the candidate to the marked node.
    pub path: Vec<usize>,
}

/// The single generated highlight rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRule {
    pub selector: String,
    pub color: String,
    pub background_color: String,
}

impl StyleRule {
    pub fn new(ctx: &EvalContext<'_>, scope_key: &str, highlight: &HighlightQuery) -> Self {
        Self {
            selector: format!(
                "#{} {} {}",
                crate::escape::css_escape(scope_key),
                ctx.rows.unwrap_or("*"),
                highlight.selector()
            ),
            color: format!("var(--{}-marktext, {})", ctx.component, ctx.mark_text_fallback),
            background_color: format!("var(--{}-mark, {})", ctx.component, ctx.mark_fallback),
        }
    }

    pub fn css(&self) -> String {
        format!(
            "{} {{ color: {}; background-color: {}; }}",
            self.selector, self.color, self.background_color
        )
    }
}

/// An exclusively owned styling resource holding at most one rule.
pub trait StyleSink {
    /// Replaces whatever rule is installed.
    fn install(&mut self, rule: &StyleRule);

    fn clear(&mut self);
}

/// In-memory [`StyleSink`]; holds the CSS text of the live rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSlot {
    css: Option<String>,
}

impl StyleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn css(&self) -> Option<&str> {
        self.css.as_deref()
    }
}

impl StyleSink for StyleSlot {
    fn install(&mut self, rule: &StyleRule) {
        self.css = Some(rule.css());
    }

    fn clear(&mut self) {
        self.css = None;
    }
}

/// Output of the pure evaluation phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Indexes of matching candidates, in candidate order.
    pub found: Vec<usize>,
    /// Highlighted descendants of found candidates. Empty when `style` is `None`.
    pub marks: Vec<Mark>,
    /// Rule to install, or `None` to clear the sink.
    pub style: Option<StyleRule>,
}

impl MatchResult {
    pub fn is_found(&self, index: usize) -> bool {
        self.found.binary_search(&index).is_ok()
    }
}

/// Pure evaluation of one filter pass.
pub fn evaluate(
    candidates: &[&Item],
    query: &MatchQuery,
    highlight: &HighlightQuery,
    ctx: &EvalContext<'_>,
) -> MatchResult {
    let found: Vec<usize> = if query.is_empty() {
        if ctx.hide_blank {
            Vec::new()
        } else {
            (0..candidates.len()).collect()
        }
    } else {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, item)| query.matches(item))
            .map(|(i, _)| i)
            .collect()
    };

    let style = match ctx.scope_key {
        Some(key) if !highlight.is_empty() => Some(StyleRule::new(ctx, key, highlight)),
        _ => None,
    };

    // The rule uses a descendant combinator, so the candidate itself is never marked.
    let mut marks = Vec::new();
    if style.is_some() {
        for &i in &found {
            candidates[i].walk(&mut |path, node| {
                if !path.is_empty() && highlight.marks(node) {
                    marks.push(Mark {
                        item: i,
                        path: path.to_vec(),
                    });
                }
            });
        }
    }

    MatchResult {
        found,
        marks,
        style,
    }
}

/// Applies visibility from `result` to the candidates. Returns how many
/// candidates actually changed state.
pub fn commit(candidates: &mut [&mut Item], result: &MatchResult) -> usize {
    let mut changed = 0;
    for (i, item) in candidates.iter_mut().enumerate() {
        let hidden = !result.is_found(i);
        if item.hidden != hidden {
            item.hidden = hidden;
            changed += 1;
        }
    }
    changed
}

/// Installs the rule from `result`, or clears the sink when there is none.
pub fn apply_style(sink: &mut impl StyleSink, result: &MatchResult) {
    match &result.style {
        Some(rule) => sink.install(rule),
        None => sink.clear(),
    }
}
