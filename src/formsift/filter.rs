//! # Filter Host
//!
//! [`Filter`] is the facade tying the pieces together. It owns:
//!
//! - the [`FilterConfig`] (host attributes),
//! - a [`FormSource`] and a [`CandidateSource`] supplied at construction,
//! - the [`StyleSink`] holding the single highlight rule,
//! - the `filtered` listeners and the [`Debouncer`].
//!
//! A pass runs in two phases. [`Filter::compute`] snapshots the form, builds
//! the queries and evaluates them without touching anything. The `filtered`
//! event is then dispatched, and only if no listener cancels it does
//! [`Filter::commit`] update visibility. With [`CancelPolicy::SkipAll`] a
//! canceled pass leaves the style rule alone as well.
//!
//! When no form can be resolved at construction the filter is inert: requests
//! are ignored, passes return `None`, and every item keeps its visibility.

use crate::config::{CancelPolicy, FilterConfig};
use crate::debounce::Debouncer;
use crate::engine::{self, EvalContext, MatchResult, StyleSink};
use crate::error::Result;
use crate::event::{FilterListener, FilteredEvent, Listeners};
use crate::field::FieldEntry;
use crate::model::Item;
use crate::query;
use crate::source::{candidate_indexes, CandidateSource, FormSource};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl FilterMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Result of the pure phase of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Container item indexes of the candidates; `result` indexes into this.
    pub candidates: Vec<usize>,
    pub result: MatchResult,
}

impl Evaluation {
    /// Container item indexes of the found candidates.
    pub fn found_items(&self) -> Vec<usize> {
        self.result
            .found
            .iter()
            .map(|&i| self.candidates[i])
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub evaluation: Evaluation,
    /// A listener vetoed the visibility commit.
    pub canceled: bool,
    /// Candidates whose hidden state changed.
    pub changed: usize,
}

/// Candidates of the last committed pass.
#[derive(Debug, Clone)]
struct Committed {
    target: Option<String>,
    candidates: Vec<usize>,
}

pub struct Filter<F: FormSource, C: CandidateSource, S: StyleSink> {
    config: FilterConfig,
    form: F,
    candidates: C,
    style: S,
    listeners: Listeners,
    debouncer: Debouncer,
    attached: bool,
    committed: Option<Committed>,
    passes: usize,
    messages: Vec<FilterMessage>,
}

impl<F: FormSource, C: CandidateSource, S: StyleSink> Filter<F, C, S> {
    pub fn new(config: FilterConfig, form: F, candidates: C, style: S) -> Self {
        let resolved = form.resolve(config.form.as_deref());
        let attached = resolved.is_some();
        let mut messages = Vec::new();
        if let (Some(wanted), Some(found)) = (&config.form, resolved) {
            if found.name.as_deref() != Some(wanted.as_str()) {
                tracing::info!(form = %wanted, "named form missing, using the first form");
                messages.push(FilterMessage::info(format!(
                    "No form named \"{}\", using the first form",
                    wanted
                )));
            }
        }
        if !attached {
            tracing::warn!(form = ?config.form, "no form found, filtering disabled");
            messages.push(FilterMessage::warning(match &config.form {
                Some(name) => format!("No form found for \"{}\", filtering disabled", name),
                None => "No form found, filtering disabled".to_string(),
            }));
        }
        let debouncer = Debouncer::new(config.debounce());

        Self {
            config,
            form,
            candidates,
            style,
            listeners: Listeners::new(),
            debouncer,
            attached,
            committed: None,
            passes: 0,
            messages,
        }
    }

    /// Whether a form was found and input is being listened to.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn candidates(&self) -> &C {
        &self.candidates
    }

    pub fn style(&self) -> &S {
        &self.style
    }

    pub fn messages(&self) -> &[FilterMessage] {
        &self.messages
    }

    /// Number of passes actually executed.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn add_listener(&mut self, listener: impl FilterListener + 'static) {
        self.listeners.add(listener);
    }

    /// Signals a form input change; the pass runs once input settles.
    pub fn on_input(&mut self, now: Instant) {
        if self.attached {
            self.debouncer.request(now);
        }
    }

    /// Applies a host attribute change and schedules a pass.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>, now: Instant) -> Result<()> {
        self.config.set_attribute(name, value)?;
        self.debouncer.set_delay(self.config.debounce());
        self.on_input(now);
        Ok(())
    }

    /// Runs the pending pass if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Result<Option<FilterOutcome>> {
        if self.debouncer.poll(now) {
            self.filter()
        } else {
            Ok(None)
        }
    }

    /// Pure phase: evaluates the current form against the candidates.
    pub fn compute(&self) -> Result<Evaluation> {
        let Some(form) = self.form.resolve(self.config.form.as_deref()) else {
            return Ok(Evaluation::default());
        };
        let entries = FieldEntry::active(form.fields.iter().cloned());
        let (match_query, highlight) = query::build(&entries, &self.config.component);

        let rows = self.config.rows.as_deref();
        let container = self.candidates.container(self.config.target.as_deref())?;
        let candidates = candidate_indexes(container, rows);
        let items: Vec<&Item> = candidates.iter().map(|&i| &container.items[i]).collect();

        let ctx = EvalContext {
            component: &self.config.component,
            scope_key: container.id.as_deref(),
            rows,
            hide_blank: self.config.hideblank,
            mark_fallback: &self.config.mark_fallback,
            mark_text_fallback: &self.config.mark_text_fallback,
        };
        let result = engine::evaluate(&items, &match_query, &highlight, &ctx);

        tracing::debug!(
            selector = %match_query.selector(rows),
            candidates = candidates.len(),
            found = result.found.len(),
            "evaluated filter"
        );

        Ok(Evaluation { candidates, result })
    }

    /// Impure phase: applies visibility from `evaluation`.
    ///
    /// Items hidden by the previous commit that are no longer candidates are
    /// shown again first.
    pub fn commit(&mut self, evaluation: &Evaluation) -> Result<usize> {
        let target = self.config.target.clone();
        let released = self.release_stale(target.as_deref(), &evaluation.candidates);

        let container = self.candidates.container_mut(target.as_deref())?;
        let mut items: Vec<&mut Item> = container
            .items
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| evaluation.candidates.binary_search(i).is_ok())
            .map(|(_, item)| item)
            .collect();
        let changed = engine::commit(&mut items, &evaluation.result);

        self.committed = Some(Committed {
            target,
            candidates: evaluation.candidates.clone(),
        });
        Ok(released + changed)
    }

    fn release_stale(&mut self, target: Option<&str>, current: &[usize]) -> usize {
        let Some(previous) = self.committed.take() else {
            return 0;
        };
        let same_target = previous.target.as_deref() == target;
        let Ok(container) = self.candidates.container_mut(previous.target.as_deref()) else {
            return 0;
        };

        let mut released = 0;
        for &i in &previous.candidates {
            if same_target && current.binary_search(&i).is_ok() {
                continue;
            }
            if let Some(item) = container.items.get_mut(i) {
                if item.hidden {
                    item.hidden = false;
                    released += 1;
                }
            }
        }
        if released > 0 {
            tracing::debug!(released, "showing items that are no longer candidates");
        }
        released
    }

    /// Runs one full pass immediately, superseding any pending debounced pass.
    /// Returns `None` when the filter is inert.
    pub fn filter(&mut self) -> Result<Option<FilterOutcome>> {
        if !self.attached {
            return Ok(None);
        }
        self.debouncer.cancel();

        let evaluation = self.compute()?;
        let mut event = FilteredEvent::new(&self.config.component, evaluation.result.found.clone());
        let proceed = self.listeners.dispatch(&mut event);

        let mut changed = 0;
        if proceed {
            changed = self.commit(&evaluation)?;
        }
        if proceed || self.config.cancel_policy == CancelPolicy::KeepHighlight {
            engine::apply_style(&mut self.style, &evaluation.result);
        }

        self.passes += 1;
        tracing::debug!(pass = self.passes, canceled = !proceed, changed, "filter pass done");

        Ok(Some(FilterOutcome {
            evaluation,
            canceled: !proceed,
            changed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StyleSlot;
    use crate::model::{Container, Document, Form};
    use std::time::Duration;

    type TestFilter = Filter<Form, Container, StyleSlot>;

    fn row(color: &str, name: &str) -> Item {
        Item::new("tr")
            .with_attr("filter-color", color)
            .with_child(Item::new("td").with_attr("filter-name", name).with_text(name))
    }

    fn people() -> Container {
        Container::new(
            Some("people".into()),
            vec![row("red", "Ada"), row("blue", "Grace"), row("red velvet", "Alan")],
        )
    }

    fn filter_with(form: Form) -> TestFilter {
        Filter::new(FilterConfig::default(), form, people(), StyleSlot::new())
    }

    fn hidden(filter: &TestFilter) -> Vec<bool> {
        filter.candidates().hidden_states()
    }

    #[test]
    fn pass_hides_non_matches() {
        let mut filter = filter_with(Form::default().with_field("color", "blue"));
        let outcome = filter.filter().unwrap().unwrap();
        assert_eq!(outcome.evaluation.found_items(), vec![1]);
        assert!(!outcome.canceled);
        assert_eq!(hidden(&filter), vec![true, false, true]);
    }

    #[test]
    fn repeated_passes_are_idempotent() {
        let mut filter = filter_with(Form::default().with_field("color", "red"));
        let first = filter.filter().unwrap().unwrap();
        let after_first = hidden(&filter);
        let second = filter.filter().unwrap().unwrap();

        assert_eq!(first.evaluation, second.evaluation);
        assert_eq!(after_first, hidden(&filter));
        assert_eq!(second.changed, 0);
    }

    #[test]
    fn canceled_pass_leaves_items_and_style_alone() {
        let mut filter = filter_with(Form::default().with_field("name:hi", "ada"));
        filter.add_listener(|e: &mut FilteredEvent| e.prevent_default());

        let before = hidden(&filter);
        let outcome = filter.filter().unwrap().unwrap();

        assert!(outcome.canceled);
        assert_eq!(outcome.evaluation.found_items(), vec![0]);
        assert_eq!(before, hidden(&filter));
        assert_eq!(filter.style().css(), None);
    }

    #[test]
    fn keep_highlight_policy_installs_rule_on_cancel() {
        let config = FilterConfig {
            cancel_policy: CancelPolicy::KeepHighlight,
            ..FilterConfig::default()
        };
        let form = Form::default().with_field("name:hi", "ada");
        let mut filter = Filter::new(config, form, people(), StyleSlot::new());
        filter.add_listener(|e: &mut FilteredEvent| e.prevent_default());

        let before = hidden(&filter);
        filter.filter().unwrap();
        assert_eq!(before, hidden(&filter));
        assert!(filter.style().css().is_some());
    }

    #[test]
    fn listeners_see_found_set() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(None));
        let mut filter = filter_with(Form::default().with_field("color:exact", "red"));
        let sink = Rc::clone(&seen);
        filter.add_listener(move |e: &mut FilteredEvent| {
            *sink.borrow_mut() = Some((e.kind.clone(), e.found.clone(), e.bubbles));
        });

        filter.filter().unwrap();
        assert_eq!(
            *seen.borrow(),
            Some(("filter".to_string(), vec![0], true))
        );
    }

    #[test]
    fn blank_form_shows_all_or_hides_all() {
        let mut shown = filter_with(Form::default().with_field("color", ""));
        shown.filter().unwrap();
        assert_eq!(hidden(&shown), vec![false, false, false]);

        let config = FilterConfig {
            hideblank: true,
            ..FilterConfig::default()
        };
        let mut blanked = Filter::new(config, Form::default(), people(), StyleSlot::new());
        blanked.filter().unwrap();
        assert_eq!(hidden(&blanked), vec![true, true, true]);
    }

    #[test]
    fn highlight_rule_follows_form_changes() {
        let mut filter = filter_with(Form::default().with_field("name:hi", "ada"));
        filter.filter().unwrap();
        assert!(filter.style().css().unwrap().contains(r#"*="ada""#));

        filter.form_mut().set("name:hi", "grace");
        filter.filter().unwrap();
        let css = filter.style().css().unwrap();
        assert!(css.contains(r#"*="grace""#));
        assert!(!css.contains("ada"));

        filter.form_mut().set("name:hi", "");
        filter.filter().unwrap();
        assert_eq!(filter.style().css(), None);
    }

    #[test]
    fn debounced_input_runs_once_with_final_state() {
        let t0 = Instant::now();
        let mut filter = filter_with(Form::default());

        for (ms, value) in [(0, "r"), (10, "re"), (20, "red"), (30, "blue")] {
            let now = t0 + Duration::from_millis(ms);
            filter.form_mut().set("color", value);
            filter.on_input(now);
            assert!(filter.poll(now).unwrap().is_none());
        }

        assert!(filter.poll(t0 + Duration::from_millis(79)).unwrap().is_none());
        let outcome = filter.poll(t0 + Duration::from_millis(80)).unwrap().unwrap();
        assert_eq!(filter.passes(), 1);
        assert_eq!(outcome.evaluation.found_items(), vec![1]);
        assert!(filter.poll(t0 + Duration::from_secs(1)).unwrap().is_none());
    }

    #[test]
    fn attribute_change_schedules_pass() {
        let t0 = Instant::now();
        let mut filter = filter_with(Form::default());
        filter.set_attribute("hideblank", Some(""), t0).unwrap();
        filter.poll(t0 + Duration::from_millis(50)).unwrap();
        assert_eq!(hidden(&filter), vec![true, true, true]);
    }

    #[test]
    fn missing_form_makes_filter_inert() {
        let t0 = Instant::now();
        let mut filter: Filter<Vec<Form>, Container, StyleSlot> = Filter::new(
            FilterConfig::default(),
            Vec::new(),
            people(),
            StyleSlot::new(),
        );

        assert!(!filter.is_attached());
        assert_eq!(filter.messages()[0].level, MessageLevel::Warning);

        filter.on_input(t0);
        assert!(filter.poll(t0 + Duration::from_secs(1)).unwrap().is_none());
        assert!(filter.filter().unwrap().is_none());
        assert_eq!(filter.passes(), 0);
        assert_eq!(filter.candidates().hidden_states(), vec![false, false, false]);
    }

    #[test]
    fn rows_and_target_select_candidates() {
        let doc = Document {
            containers: vec![
                Container::new(Some("other".into()), vec![row("red", "Nobody")]),
                Container::new(
                    Some("table".into()),
                    vec![Item::new("caption"), row("red", "Ada"), row("blue", "Grace")],
                ),
            ],
        };
        let config = FilterConfig {
            target: Some("table".into()),
            rows: Some("tr".into()),
            ..FilterConfig::default()
        };
        let form = Form::default().with_field("color", "red");
        let mut filter = Filter::new(config, form, doc, StyleSlot::new());

        let outcome = filter.filter().unwrap().unwrap();
        assert_eq!(outcome.evaluation.candidates, vec![1, 2]);
        assert_eq!(outcome.evaluation.found_items(), vec![1]);

        let doc = filter.candidates();
        assert!(!doc.containers[0].items[0].hidden);
        let table = &doc.containers[1];
        assert_eq!(table.hidden_states(), vec![false, false, true]);
    }

    #[test]
    fn items_dropped_from_candidates_are_shown_again() {
        let t0 = Instant::now();
        let container = Container::new(
            Some("table".into()),
            vec![Item::new("caption"), row("red", "Ada")],
        );
        let form = Form::default().with_field("color", "red");
        let mut filter = Filter::new(FilterConfig::default(), form, container, StyleSlot::new());

        filter.filter().unwrap();
        assert_eq!(filter.candidates().hidden_states(), vec![true, false]);

        filter.form_mut().set("color", "");
        filter.set_attribute("rows", Some("tr"), t0).unwrap();
        let outcome = filter.poll(t0 + Duration::from_millis(50)).unwrap().unwrap();

        assert_eq!(outcome.evaluation.candidates, vec![1]);
        assert_eq!(outcome.changed, 1);
        assert_eq!(filter.candidates().hidden_states(), vec![false, false]);
    }

    #[test]
    fn changing_target_releases_the_old_container() {
        let doc = Document {
            containers: vec![
                Container::new(Some("a".into()), vec![row("red", "Ada"), row("blue", "Grace")]),
                Container::new(Some("b".into()), vec![row("blue", "Alan")]),
            ],
        };
        let config = FilterConfig {
            target: Some("a".into()),
            ..FilterConfig::default()
        };
        let form = Form::default().with_field("color", "red");
        let mut filter = Filter::new(config, form, doc, StyleSlot::new());

        filter.filter().unwrap();
        assert_eq!(filter.candidates().containers[0].hidden_states(), vec![false, true]);

        filter.set_attribute("target", Some("b"), Instant::now()).unwrap();
        filter.filter().unwrap();
        let doc = filter.candidates();
        assert_eq!(doc.containers[0].hidden_states(), vec![false, false]);
        assert_eq!(doc.containers[1].hidden_states(), vec![true]);
    }

    #[test]
    fn debounce_attribute_retunes_the_delay() {
        let t0 = Instant::now();
        let mut filter = filter_with(Form::default().with_field("color", "blue"));
        filter.set_attribute("debounce", Some("200"), t0).unwrap();

        assert!(filter.poll(t0 + Duration::from_millis(150)).unwrap().is_none());
        assert!(filter.poll(t0 + Duration::from_millis(200)).unwrap().is_some());
    }

    #[test]
    fn immediate_pass_supersedes_pending_one() {
        let t0 = Instant::now();
        let mut filter = filter_with(Form::default().with_field("color", "blue"));
        filter.on_input(t0);
        filter.filter().unwrap();
        assert!(filter.poll(t0 + Duration::from_secs(1)).unwrap().is_none());
        assert_eq!(filter.passes(), 1);
    }

    #[test]
    fn missing_named_form_falls_back_with_a_note() {
        let forms = vec![Form::new(Some("search".into())).with_field("color", "blue")];
        let config = FilterConfig {
            form: Some("other".into()),
            ..FilterConfig::default()
        };
        let mut filter = Filter::new(config, forms, people(), StyleSlot::new());

        assert!(filter.is_attached());
        assert_eq!(filter.messages().len(), 1);
        assert_eq!(filter.messages()[0].level, MessageLevel::Info);
        let outcome = filter.filter().unwrap().unwrap();
        assert_eq!(outcome.evaluation.found_items(), vec![1]);
    }

    #[test]
    fn unknown_target_is_an_error() {
        let config = FilterConfig {
            target: Some("nope".into()),
            ..FilterConfig::default()
        };
        let mut filter = Filter::new(config, Form::default(), Document::default(), StyleSlot::new());
        assert!(filter.filter().is_err());
    }
}
