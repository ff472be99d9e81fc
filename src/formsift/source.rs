//! # Sources
//!
//! The filter never looks anything up globally. It is handed a [`FormSource`]
//! for field values and a [`CandidateSource`] for the items to filter.
//!
//! - [`Form`] and `Vec<Form>` implement [`FormSource`]. A named lookup falls
//!   back to the first form, so only an empty collection resolves to nothing.
//! - [`Container`] and [`Document`] implement [`CandidateSource`]. A document
//!   picks its container by `target` id, defaulting to the first.

use crate::error::{FilterError, Result};
use crate::model::{Container, Document, Form};

pub trait FormSource {
    /// Resolves the form to read, preferring the one called `name`.
    fn resolve(&self, name: Option<&str>) -> Option<&Form>;
}

impl FormSource for Form {
    fn resolve(&self, _name: Option<&str>) -> Option<&Form> {
        Some(self)
    }
}

impl FormSource for Vec<Form> {
    fn resolve(&self, name: Option<&str>) -> Option<&Form> {
        name.and_then(|n| self.iter().find(|f| f.name.as_deref() == Some(n)))
            .or_else(|| self.first())
    }
}

pub trait CandidateSource {
    /// Resolves the container whose items are filtered.
    fn container(&self, target: Option<&str>) -> Result<&Container>;

    fn container_mut(&mut self, target: Option<&str>) -> Result<&mut Container>;
}

impl CandidateSource for Container {
    fn container(&self, _target: Option<&str>) -> Result<&Container> {
        Ok(self)
    }

    fn container_mut(&mut self, _target: Option<&str>) -> Result<&mut Container> {
        Ok(self)
    }
}

impl CandidateSource for Document {
    fn container(&self, target: Option<&str>) -> Result<&Container> {
        match target {
            Some(id) => self
                .containers
                .iter()
                .find(|c| c.id.as_deref() == Some(id))
                .ok_or_else(|| FilterError::TargetNotFound(id.to_string())),
            None => self
                .containers
                .first()
                .ok_or_else(|| FilterError::TargetNotFound("<first container>".to_string())),
        }
    }

    fn container_mut(&mut self, target: Option<&str>) -> Result<&mut Container> {
        match target {
            Some(id) => self
                .containers
                .iter_mut()
                .find(|c| c.id.as_deref() == Some(id))
                .ok_or_else(|| FilterError::TargetNotFound(id.to_string())),
            None => self
                .containers
                .first_mut()
                .ok_or_else(|| FilterError::TargetNotFound("<first container>".to_string())),
        }
    }
}

/// Indexes of the container items that are candidates, narrowed to items
/// whose tag equals `rows` when given.
pub fn candidate_indexes(container: &Container, rows: Option<&str>) -> Vec<usize> {
    container
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| rows.map_or(true, |tag| item.tag.eq_ignore_ascii_case(tag)))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;

    #[test]
    fn named_form_falls_back_to_first() {
        let forms = vec![
            Form::new(Some("a".into())),
            Form::new(Some("b".into())),
        ];
        assert_eq!(forms.resolve(Some("b")).unwrap().name.as_deref(), Some("b"));
        assert_eq!(forms.resolve(Some("zz")).unwrap().name.as_deref(), Some("a"));
        assert_eq!(forms.resolve(None).unwrap().name.as_deref(), Some("a"));
        assert!(Vec::<Form>::new().resolve(None).is_none());
    }

    #[test]
    fn document_resolves_target() {
        let doc = Document {
            containers: vec![
                Container::new(Some("one".into()), vec![]),
                Container::new(Some("two".into()), vec![Item::new("li")]),
            ],
        };
        assert_eq!(doc.container(Some("two")).unwrap().items.len(), 1);
        assert_eq!(doc.container(None).unwrap().id.as_deref(), Some("one"));
        assert!(matches!(
            doc.container(Some("three")),
            Err(FilterError::TargetNotFound(_))
        ));
    }

    #[test]
    fn rows_narrow_candidates() {
        let container = Container::new(
            None,
            vec![Item::new("caption"), Item::new("tr"), Item::new("TR")],
        );
        assert_eq!(candidate_indexes(&container, Some("tr")), vec![1, 2]);
        assert_eq!(candidate_indexes(&container, None), vec![0, 1, 2]);
    }
}
