//! Tree node types.

use crate::attributes::Attributes;
use crate::parser;
use crate::serialize::Serializer;
use crate::walk::{self, NodePath, Visit};

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Check whether `name` is a void element, ignoring ASCII case.
#[must_use]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|void| void.eq_ignore_ascii_case(name))
}

/// A node of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// An element and its subtree.
    Element(Element),
    /// Character data.
    Text(Text),
    /// Comment content, without the `<!--` and `-->` delimiters.
    Comment(String),
    /// Markup declaration content between `<!` and `>` (e.g. `doctype html`).
    Doctype(String),
}

impl Node {
    /// Create a text node holding `content`, escaped.
    #[must_use]
    pub fn text(content: &str) -> Self {
        Self::Text(Text::new(content))
    }

    /// The element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Mutable access to the element, if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// Character data, stored in its serialized (escaped) form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    raw: String,
}

impl Text {
    /// Create a text node from plain content, escaping `&`, `<` and `>`.
    #[must_use]
    pub fn new(content: &str) -> Self {
        Self {
            raw: escape_text(content),
        }
    }

    /// Create a text node from already-serialized markup.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The serialized form.
    #[must_use]
    pub fn as_raw(&self) -> &str {
        &self.raw
    }

    pub(crate) fn push_raw(&mut self, raw: &str) {
        self.raw.push_str(raw);
    }
}

/// Escape text content for inclusion between tags.
#[must_use]
pub fn escape_text(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// An element with its attributes and children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written in the source.
    pub name: String,
    /// Attribute list; `None` when the start tag had no attributes.
    pub attributes: Option<Attributes>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
    /// Whitespace before `>` or `/>`.
    pub(crate) trailing: String,
    /// Start tag ended with `/>`.
    pub(crate) self_closing: bool,
    /// An explicit end tag closed this element.
    pub(crate) has_end_tag: bool,
}

impl Element {
    /// Create an empty element that serializes with an end tag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: None,
            children: Vec::new(),
            trailing: String::new(),
            self_closing: false,
            has_end_tag: true,
        }
    }

    /// Create an element wrapping `children`.
    #[must_use]
    pub fn with_children(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(name)
        }
    }

    pub(crate) fn parsed(name: &str) -> Self {
        Self {
            has_end_tag: false,
            ..Self::new(name)
        }
    }

    /// Compare the tag name, ignoring ASCII case.
    #[must_use]
    pub fn is_tag_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Whether this is a void element such as `<img>` or `<input>`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }

    /// Unquoted value of the attribute named `name`.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.as_ref()?.get_value(name)
    }

    /// Whether the element carries an attribute named `name`.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes
            .as_ref()
            .is_some_and(|attributes| attributes.has_name(name))
    }

    /// Replace all children with a single escaped text node.
    pub fn set_text(&mut self, content: &str) {
        self.children = vec![Node::text(content)];
    }

    /// Walk this element and its descendants depth-first.
    ///
    /// The element itself is visited first. It has no owner here, so a
    /// [`Visit::Detach`] answer for it is ignored and its children are still
    /// visited.
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut Element) -> Visit) {
        match visit(self) {
            Visit::SkipChildren => {}
            Visit::Continue | Visit::Detach => walk::walk_nodes_mut(&mut self.children, visit),
        }
    }

    /// First descendant matching `matches`, in document order.
    pub fn find_element(&self, matches: impl FnMut(&Element) -> bool) -> Option<&Element> {
        let path = walk::find_path(&self.children, matches)?;
        walk::element_at(&self.children, &path)
    }

    /// Mutable access to the first descendant matching `matches`.
    pub fn find_element_mut(
        &mut self,
        matches: impl FnMut(&Element) -> bool,
    ) -> Option<&mut Element> {
        let path = walk::find_path(&self.children, matches)?;
        walk::element_at_mut(&mut self.children, &path)
    }

    /// Paths of descendants matching `matches`; matched subtrees are not searched.
    pub fn find_paths(&self, matches: impl FnMut(&Element) -> bool) -> Vec<NodePath> {
        walk::find_paths(&self.children, matches)
    }

    /// Descendant at `path`, relative to this element's children.
    #[must_use]
    pub fn element_at(&self, path: &NodePath) -> Option<&Element> {
        walk::element_at(&self.children, path)
    }

    /// Mutable descendant at `path`, relative to this element's children.
    pub fn element_at_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        walk::element_at_mut(&mut self.children, path)
    }

    /// Serialize the element and its subtree.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut serializer = Serializer::new(false);
        serializer.element(self);
        serializer.finish()
    }
}

/// A parsed document: the top-level node sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level nodes (doctype, `<html>`, stray text...).
    pub children: Vec<Node>,
}

impl Document {
    /// Parse markup into a document.
    ///
    /// Parsing never fails: unknown constructs are kept as text so that
    /// serializing the result reproduces the input.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        parser::parse(html)
    }

    /// Create a document from top-level nodes.
    #[must_use]
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Walk every element depth-first.
    ///
    /// Every visited element has an owner, so [`Visit::Detach`] always removes it.
    pub fn walk_mut(&mut self, visit: &mut dyn FnMut(&mut Element) -> Visit) {
        walk::walk_nodes_mut(&mut self.children, visit);
    }

    /// First element matching `matches`, in document order.
    pub fn find_element(&self, matches: impl FnMut(&Element) -> bool) -> Option<&Element> {
        let path = walk::find_path(&self.children, matches)?;
        walk::element_at(&self.children, &path)
    }

    /// Mutable access to the first element matching `matches`.
    pub fn find_element_mut(
        &mut self,
        matches: impl FnMut(&Element) -> bool,
    ) -> Option<&mut Element> {
        let path = walk::find_path(&self.children, matches)?;
        walk::element_at_mut(&mut self.children, &path)
    }

    /// Paths of elements matching `matches`; matched subtrees are not searched.
    pub fn find_paths(&self, matches: impl FnMut(&Element) -> bool) -> Vec<NodePath> {
        walk::find_paths(&self.children, matches)
    }

    /// Element at `path`.
    #[must_use]
    pub fn element_at(&self, path: &NodePath) -> Option<&Element> {
        walk::element_at(&self.children, path)
    }

    /// Mutable element at `path`.
    pub fn element_at_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        walk::element_at_mut(&mut self.children, path)
    }

    /// Serialize the document.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut serializer = Serializer::new(false);
        serializer.nodes(&self.children);
        serializer.finish()
    }

    /// Serialize the document without comments and with collapsed whitespace.
    ///
    /// Content of `pre`, `textarea`, `script` and `style` is kept as is.
    #[must_use]
    pub fn minified_outer_html(&self) -> String {
        let mut serializer = Serializer::new(true);
        serializer.nodes(&self.children);
        serializer.finish()
    }
}
