//! XML document model and the parser seam
//!
//! The actual bytes-to-tree conversion is an external collaborator: anything
//! that can turn a response body into a [`Document`] (quick-xml, roxmltree, a
//! test fixture) plugs in through [`XmlParser`]. The document itself is a
//! plain owned tree supporting descendant selection by tag name, text
//! extraction and attribute lookup — the only navigation the resolvers need.

use crate::error::ParseError;

/// Converts a raw response body into a navigable document.
pub trait XmlParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<Document, ParseError>;
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// All elements named `tag` in document order, the root included.
    pub fn select(&self, tag: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        if self.root.name == tag {
            found.push(&self.root);
        }
        self.root.collect_descendants(tag, &mut found);
        found
    }
}

/// A single element: name, attributes, text content and child elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    text: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Node {
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct text content of this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Descendant elements named `tag` in document order, self excluded.
    pub fn select(&self, tag: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_descendants(tag, &mut found);
        found
    }

    /// First descendant named `tag`, if any.
    pub fn first(&self, tag: &str) -> Option<&Node> {
        for child in &self.children {
            if child.name == tag {
                return Some(child);
            }
            if let Some(node) = child.first(tag) {
                return Some(node);
            }
        }
        None
    }

    fn collect_descendants<'a>(&'a self, tag: &str, found: &mut Vec<&'a Node>) {
        for child in &self.children {
            if child.name == tag {
                found.push(child);
            }
            child.collect_descendants(tag, found);
        }
    }
}
