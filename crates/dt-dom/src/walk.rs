//! Depth-first traversal and positional addressing.
//!
//! Nodes have no parent pointer. Removal is done by whoever owns the child
//! vector: a visitor answers [`Visit::Detach`] and the walk removes the
//! element at its current position. Elements that must be revisited after
//! other mutations are addressed by [`NodePath`].

use crate::node::{Element, Node};

/// Visitor answer controlling a walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the element's children.
    Continue,
    /// Do not descend into the element's children.
    SkipChildren,
    /// Remove the element from its parent's children.
    Detach,
}

/// Position of an element as a chain of child indices from a root node list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Create a path from child indices.
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The child indices, outermost first.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }
}

/// Visit every element of `nodes` depth-first, honoring detach requests.
pub(crate) fn walk_nodes_mut(nodes: &mut Vec<Node>, visit: &mut dyn FnMut(&mut Element) -> Visit) {
    let mut index = 0;
    while index < nodes.len() {
        let answer = match &mut nodes[index] {
            Node::Element(element) => visit(element),
            _ => Visit::SkipChildren,
        };
        match answer {
            Visit::Detach => {
                nodes.remove(index);
                continue;
            }
            Visit::Continue => {
                if let Node::Element(element) = &mut nodes[index] {
                    walk_nodes_mut(&mut element.children, visit);
                }
            }
            Visit::SkipChildren => {}
        }
        index += 1;
    }
}

/// Path of the first element matching `matches`, in document order.
pub(crate) fn find_path(
    nodes: &[Node],
    mut matches: impl FnMut(&Element) -> bool,
) -> Option<NodePath> {
    fn search(
        nodes: &[Node],
        base: &NodePath,
        matches: &mut dyn FnMut(&Element) -> bool,
    ) -> Option<NodePath> {
        for (index, node) in nodes.iter().enumerate() {
            let Node::Element(element) = node else {
                continue;
            };
            let path = base.child(index);
            if matches(element) {
                return Some(path);
            }
            if let Some(found) = search(&element.children, &path, matches) {
                return Some(found);
            }
        }
        None
    }

    search(nodes, &NodePath::default(), &mut matches)
}

/// Paths of all elements matching `matches`; matched subtrees are not searched.
pub(crate) fn find_paths(
    nodes: &[Node],
    mut matches: impl FnMut(&Element) -> bool,
) -> Vec<NodePath> {
    fn collect(
        nodes: &[Node],
        base: &NodePath,
        matches: &mut dyn FnMut(&Element) -> bool,
        out: &mut Vec<NodePath>,
    ) {
        for (index, node) in nodes.iter().enumerate() {
            let Node::Element(element) = node else {
                continue;
            };
            let path = base.child(index);
            if matches(element) {
                out.push(path);
            } else {
                collect(&element.children, &path, matches, out);
            }
        }
    }

    let mut out = Vec::new();
    collect(nodes, &NodePath::default(), &mut matches, &mut out);
    out
}

/// Element at `path` relative to `nodes`.
pub(crate) fn element_at<'a>(nodes: &'a [Node], path: &NodePath) -> Option<&'a Element> {
    let (first, rest) = path.indices().split_first()?;
    let mut current = nodes.get(*first)?.as_element()?;
    for &index in rest {
        current = current.children.get(index)?.as_element()?;
    }
    Some(current)
}

/// Mutable element at `path` relative to `nodes`.
pub(crate) fn element_at_mut<'a>(
    nodes: &'a mut [Node],
    path: &NodePath,
) -> Option<&'a mut Element> {
    let (first, rest) = path.indices().split_first()?;
    let mut current = nodes.get_mut(*first)?.as_element_mut()?;
    for &index in rest {
        current = current.children.get_mut(index)?.as_element_mut()?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::Document;

    use super::*;

    #[test]
    fn test_walk_visits_in_document_order() {
        let mut document = Document::parse("<a><b></b><c><d></d></c></a><e></e>");
        let mut seen = Vec::new();
        document.walk_mut(&mut |element| {
            seen.push(element.name.clone());
            Visit::Continue
        });

        assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_walk_skip_children() {
        let mut document = Document::parse("<a><b></b></a><c></c>");
        let mut seen = Vec::new();
        document.walk_mut(&mut |element| {
            seen.push(element.name.clone());
            if element.is_tag_name("a") {
                Visit::SkipChildren
            } else {
                Visit::Continue
            }
        });

        assert_eq!(seen, vec!["a", "c"]);
    }

    #[test]
    fn test_walk_detach_keeps_visiting_siblings() {
        let mut document = Document::parse("<ul><li>1</li><li x>2</li><li x>3</li><li>4</li></ul>");
        document.walk_mut(&mut |element| {
            if element.has_attr("x") {
                Visit::Detach
            } else {
                Visit::Continue
            }
        });

        assert_eq!(document.outer_html(), "<ul><li>1</li><li>4</li></ul>");
    }

    #[test]
    fn test_element_walk_ignores_detach_on_root() {
        let mut document = Document::parse("<div x><p x></p><span></span></div>");
        let root = document.find_element_mut(|e| e.is_tag_name("div")).unwrap();
        root.walk_mut(&mut |element| {
            if element.has_attr("x") {
                Visit::Detach
            } else {
                Visit::Continue
            }
        });

        assert_eq!(document.outer_html(), "<div x><span></span></div>");
    }

    #[test]
    fn test_find_paths_skips_matched_subtrees() {
        let document = Document::parse(
            "<div t><p t></p></div><section><span t></span></section>",
        );
        let paths = document.find_paths(|e| e.has_attr("t"));

        assert_eq!(
            paths,
            vec![NodePath::new(vec![0]), NodePath::new(vec![1, 0])]
        );
    }

    #[test]
    fn test_element_at_follows_path() {
        let mut document = Document::parse("<div>text<p></p><span>x</span></div>");
        let path = NodePath::new(vec![0, 2]);

        assert!(document.element_at(&path).unwrap().is_tag_name("span"));
        document.element_at_mut(&path).unwrap().set_text("y");
        assert_eq!(document.outer_html(), "<div>text<p></p><span>y</span></div>");
    }

    #[test]
    fn test_element_at_rejects_text_positions() {
        let document = Document::parse("<div>text</div>");
        assert!(document.element_at(&NodePath::new(vec![0, 0])).is_none());
        assert!(document.element_at(&NodePath::default()).is_none());
    }
}
