use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_tag() -> String {
    "div".to_string()
}

/// A node that can be filtered or highlighted.
///
/// Data attributes are keyed by their full name without the `data-` prefix,
/// i.e. `<component>-<attribute>` such as `filter-color`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Item>,
    #[serde(default)]
    pub hidden: bool,
}

impl Item {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Item) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// True if this node or any descendant satisfies `pred`.
    pub fn any_node(&self, pred: &impl Fn(&Item) -> bool) -> bool {
        pred(self) || self.children.iter().any(|c| c.any_node(pred))
    }

    /// Visits this node and its descendants depth-first, passing the child
    /// index path from this node (empty for the node itself).
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&[usize], &'a Item)) {
        fn go<'a>(
            node: &'a Item,
            path: &mut Vec<usize>,
            visit: &mut impl FnMut(&[usize], &'a Item),
        ) {
            visit(path.as_slice(), node);
            for (i, child) in node.children.iter().enumerate() {
                path.push(i);
                go(child, path, visit);
                path.pop();
            }
        }
        go(self, &mut Vec::new(), visit);
    }
}

/// An element whose items are the filter candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Stable identifying key; highlight rules are only scoped when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Container {
    pub fn new(id: Option<String>, items: Vec<Item>) -> Self {
        Self { id, items }
    }

    pub fn hidden_states(&self) -> Vec<bool> {
        self.items.iter().map(|i| i.hidden).collect()
    }
}

/// A set of containers; the `target` option picks one by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub containers: Vec<Container>,
}

/// A form snapshot: ordered `(name, value)` pairs, repeated names allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Vec<(String, String)>,
}

impl Form {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Sets the first field called `name`, appending it if absent.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }
}
