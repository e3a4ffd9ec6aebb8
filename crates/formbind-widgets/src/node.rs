#![forbid(unsafe_code)]

//! A minimal element tree for bound controls.
//!
//! Nodes are plain data: a host renderer walks them and attaches
//! [`OnChange`] handlers to its own controls. [`Node::to_markup`] gives a
//! stable text form used by snapshots and tests.

use std::fmt::Write as _;

use formbind_runtime::model::{Attributes, FieldValue};
use formbind_runtime::mutation::OnChange;

/// One element with attributes, an optional change handler and children.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Attributes,
    pub on_change: Option<OnChange>,
    pub children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn attrs(mut self, attrs: Attributes) -> Self {
        self.attrs.extend(attrs);
        self
    }

    #[must_use]
    pub fn handler(mut self, on_change: OnChange) -> Self {
        self.on_change = Some(on_change);
        self
    }

    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    #[must_use]
    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        self.children.extend(nodes);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.attrs.get(key)
    }
}

/// Presentation produced by a binding point.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
    Fragment(Vec<Node>),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl Node {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// First element with `tag`, depth first, including `self`.
    #[must_use]
    pub fn find(&self, tag: &str) -> Option<&Element> {
        match self {
            Self::Element(element) if element.tag == tag => Some(element),
            Self::Element(element) => element.children.iter().find_map(|c| c.find(tag)),
            Self::Fragment(nodes) => nodes.iter().find_map(|c| c.find(tag)),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text of every descendant text node.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(Element { children, .. }) | Self::Fragment(children) => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Deterministic markup.
    ///
    /// Attributes are written in key order. `true` flags are written bare,
    /// `false` and `Null` attributes are omitted, and a bound element gets a
    /// trailing `@change` marker.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&escape(text)),
            Self::Fragment(nodes) => {
                for node in nodes {
                    node.write_markup(out);
                }
            }
            Self::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (key, value) in &element.attrs {
                    match value {
                        FieldValue::Null | FieldValue::Bool(false) => {}
                        FieldValue::Bool(true) => {
                            let _ = write!(out, " {key}");
                        }
                        other => {
                            let _ = write!(out, " {key}=\"{}\"", escape(&other.to_string()));
                        }
                    }
                }
                if element.on_change.is_some() {
                    out.push_str(" @change");
                }
                if element.children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in &element.children {
                    child.write_markup(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
