//! Markup serialization.

use crate::node::{Element, Node};

/// Elements whose whitespace is significant when minifying.
const PRESERVE_WHITESPACE: &[&str] = &["pre", "textarea", "script", "style"];

pub(crate) struct Serializer {
    out: String,
    minify: bool,
    /// Depth of enclosing whitespace-preserving elements.
    preserve: usize,
}

impl Serializer {
    pub(crate) fn new(minify: bool) -> Self {
        Self {
            out: String::new(),
            minify,
            preserve: 0,
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    pub(crate) fn nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.node(node);
        }
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::Element(element) => self.element(element),
            Node::Text(text) => self.text(text.as_raw()),
            Node::Comment(body) => {
                if !self.minify {
                    self.out.push_str("<!--");
                    self.out.push_str(body);
                    self.out.push_str("-->");
                }
            }
            Node::Doctype(body) => {
                self.out.push_str("<!");
                self.out.push_str(body);
                self.out.push('>');
            }
        }
    }

    fn text(&mut self, raw: &str) {
        if !self.minify || self.preserve > 0 {
            self.out.push_str(raw);
            return;
        }
        if raw.chars().all(char::is_whitespace) {
            return;
        }
        let mut in_space = false;
        for c in raw.chars() {
            if c.is_whitespace() {
                if !in_space {
                    self.out.push(' ');
                }
                in_space = true;
            } else {
                self.out.push(c);
                in_space = false;
            }
        }
    }

    pub(crate) fn element(&mut self, element: &Element) {
        self.out.push('<');
        self.out.push_str(&element.name);
        if let Some(attributes) = &element.attributes {
            attributes.write_to(&mut self.out);
        }
        if !self.minify {
            self.out.push_str(&element.trailing);
        }

        if element.is_void() {
            self.out.push_str(if element.self_closing { "/>" } else { ">" });
            return;
        }
        if element.self_closing && element.children.is_empty() {
            self.out.push_str("/>");
            return;
        }
        self.out.push('>');

        let preserve = PRESERVE_WHITESPACE
            .iter()
            .any(|name| element.is_tag_name(name));
        if preserve {
            self.preserve += 1;
        }
        self.nodes(&element.children);
        if preserve {
            self.preserve -= 1;
        }

        if element.has_end_tag || element.self_closing {
            self.out.push_str("</");
            self.out.push_str(&element.name);
            self.out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Document, Element, Node};

    #[test]
    fn test_minified_drops_comments_and_blank_text() {
        let document = Document::parse("<ul>\n  <!-- items -->\n  <li>a   b</li>\n</ul>\n");

        assert_eq!(document.minified_outer_html(), "<ul><li>a b</li></ul>");
    }

    #[test]
    fn test_minified_keeps_pre_content() {
        let document = Document::parse("<div>\n <pre>  a\n   b</pre>\n</div>");

        assert_eq!(document.minified_outer_html(), "<div><pre>  a\n   b</pre></div>");
    }

    #[test]
    fn test_minified_drops_trailing_tag_space() {
        let document = Document::parse("<p class=\"x\" >hi</p>");

        assert_eq!(document.minified_outer_html(), "<p class=\"x\">hi</p>");
    }

    #[test]
    fn test_self_closing_with_new_children_gets_end_tag() {
        let mut document = Document::parse("<span/>");
        document.children[0]
            .as_element_mut()
            .unwrap()
            .set_text("x");

        assert_eq!(document.outer_html(), "<span>x</span>");
    }

    #[test]
    fn test_new_element_serializes_end_tag() {
        let element = Element::with_children("div", vec![Node::text("a")]);

        assert_eq!(element.outer_html(), "<div>a</div>");
    }
}
