//! Lossless markup parser.
//!
//! Builds a [`Document`] that serializes back to the exact input. The parser
//! is deliberately forgiving: it never fails, end tags close the nearest open
//! element with the same name (implicitly closing anything opened after it),
//! stray end tags and unrecognized `<` sequences are kept as text.

use crate::attributes::{Attr, AttrToken, Attributes};
use crate::node::{Document, Element, Node, Text, is_void_element};

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

/// Parse markup into a [`Document`].
pub(crate) fn parse(html: &str) -> Document {
    Parser::new(html).run()
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    /// Open elements, innermost last.
    stack: Vec<Element>,
    /// Finished top-level nodes.
    root: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            stack: Vec::new(),
            root: Vec::new(),
        }
    }

    fn run(mut self) -> Document {
        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];
            let next = rest.as_bytes().get(1).copied();
            if rest.starts_with(COMMENT_START) {
                self.comment();
            } else if rest.starts_with("<!") {
                self.declaration();
            } else if rest.starts_with("</") && rest.as_bytes().get(2).is_some_and(u8::is_ascii_alphabetic) {
                self.end_tag();
            } else if rest.starts_with('<') && next.is_some_and(|b| b.is_ascii_alphabetic()) {
                self.start_tag();
            } else {
                self.text();
            }
        }

        // Anything still open ends with the input.
        while let Some(element) = self.stack.pop() {
            self.append(Node::Element(element));
        }
        Document::new(self.root)
    }

    fn append(&mut self, node: Node) {
        let children = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };
        if let Node::Text(text) = &node
            && let Some(Node::Text(last)) = children.last_mut()
        {
            last.push_raw(text.as_raw());
            return;
        }
        children.push(node);
    }

    fn push_text(&mut self, raw: &str) {
        if !raw.is_empty() {
            self.append(Node::Text(Text::from_raw(raw)));
        }
    }

    /// Text up to the next `<` (the first character is always consumed).
    fn text(&mut self) {
        let start = self.pos;
        let rest = &self.input[start..];
        let first = rest.chars().next().map_or(1, char::len_utf8);
        let len = rest[first..].find('<').map_or(rest.len(), |i| i + first);
        self.pos += len;
        self.push_text(&self.input[start..self.pos]);
    }

    fn comment(&mut self) {
        let body_start = self.pos + COMMENT_START.len();
        let Some(i) = self.input[body_start..].find(COMMENT_END) else {
            self.rest_as_text();
            return;
        };
        let body = self.input[body_start..body_start + i].to_owned();
        self.pos = body_start + i + COMMENT_END.len();
        self.append(Node::Comment(body));
    }

    /// `<!doctype ...>` and other markup declarations.
    fn declaration(&mut self) {
        let body_start = self.pos + 2;
        let Some(i) = self.input[body_start..].find('>') else {
            self.rest_as_text();
            return;
        };
        let body = self.input[body_start..body_start + i].to_owned();
        self.pos = body_start + i + 1;
        self.append(Node::Doctype(body));
    }

    /// Markup cut off by the end of input is kept as text.
    fn rest_as_text(&mut self) {
        let start = self.pos;
        self.pos = self.input.len();
        self.push_text(&self.input[start..]);
    }

    fn end_tag(&mut self) {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let name_start = start + 2;
        let mut name_end = name_start;
        while name_end < bytes.len() && !is_space(bytes[name_end]) && !matches!(bytes[name_end], b'>' | b'/') {
            name_end += 1;
        }
        let name = &self.input[name_start..name_end];
        let Some(close) = self.input[start..].find('>') else {
            self.rest_as_text();
            return;
        };
        self.pos = start + close + 1;

        let Some(depth) = self
            .stack
            .iter()
            .rposition(|element| element.name.eq_ignore_ascii_case(name))
        else {
            self.push_text(&self.input[start..self.pos]);
            return;
        };

        while self.stack.len() > depth + 1 {
            if let Some(unclosed) = self.stack.pop() {
                self.append(Node::Element(unclosed));
            }
        }
        if let Some(mut element) = self.stack.pop() {
            element.has_end_tag = true;
            self.append(Node::Element(element));
        }
    }

    fn start_tag(&mut self) {
        let input = self.input;
        let bytes = input.as_bytes();
        let len = bytes.len();
        let at_self_close = |i: usize| bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'>');

        let mut i = self.pos + 1;
        while i < len && !is_space(bytes[i]) && bytes[i] != b'>' && !at_self_close(i) {
            i += 1;
        }
        let mut element = Element::parsed(&input[self.pos + 1..i]);
        let mut attributes: Option<Attributes> = None;

        loop {
            let space_start = i;
            while i < len && is_space(bytes[i]) {
                i += 1;
            }
            let space = &input[space_start..i];
            if i >= len {
                self.rest_as_text();
                return;
            }
            if bytes[i] == b'>' {
                element.trailing = space.to_owned();
                i += 1;
                break;
            }
            if at_self_close(i) {
                element.trailing = space.to_owned();
                element.self_closing = true;
                i += 2;
                break;
            }

            let list = attributes.get_or_insert_with(|| Attributes::with_leading(space));
            if !list.tokens.is_empty() && !space.is_empty() {
                list.tokens.push(AttrToken::Space(space.to_owned()));
            }

            // The first character always belongs to the name, even a stray `=`.
            let name_start = i;
            i += 1;
            while i < len && !is_space(bytes[i]) && !matches!(bytes[i], b'>' | b'=') && !at_self_close(i) {
                i += 1;
            }
            let name = &input[name_start..i];

            let mut j = i;
            while j < len && is_space(bytes[j]) {
                j += 1;
            }
            if j < len && bytes[j] == b'=' {
                j += 1;
                while j < len && is_space(bytes[j]) {
                    j += 1;
                }
                let eq = &input[i..j];
                let value_start = j;
                if j < len && matches!(bytes[j], b'"' | b'\'') {
                    let quote = bytes[j];
                    j += 1;
                    while j < len && bytes[j] != quote {
                        j += 1;
                    }
                    if j < len {
                        j += 1;
                    }
                } else {
                    while j < len && !is_space(bytes[j]) && bytes[j] != b'>' {
                        j += 1;
                    }
                }
                let mut attr = Attr::with_raw_value(name, &input[value_start..j]);
                attr.eq = eq.to_owned();
                list.tokens.push(AttrToken::Attr(attr));
                i = j;
            } else {
                list.tokens.push(AttrToken::Attr(Attr::boolean(name)));
            }
        }

        element.attributes = attributes;
        self.pos = i;

        if element.self_closing || is_void_element(&element.name) {
            self.append(Node::Element(element));
            return;
        }

        if RAW_TEXT_ELEMENTS
            .iter()
            .any(|raw| element.is_tag_name(raw))
        {
            self.raw_text(element);
            return;
        }

        self.stack.push(element);
    }

    /// Content of `script`, `style`, `textarea` and `title` up to the matching end tag.
    fn raw_text(&mut self, mut element: Element) {
        let closing = format!("</{}", element.name.to_ascii_lowercase());
        let rest = &self.input[self.pos..];
        // An end tag cut off by the end of input stays part of the content.
        let close = rest
            .to_ascii_lowercase()
            .find(&closing)
            .and_then(|i| rest[i..].find('>').map(|k| (i, i + k + 1)));

        let content_end = close.map_or(rest.len(), |(i, _)| i);
        if content_end > 0 {
            element
                .children
                .push(Node::Text(Text::from_raw(&rest[..content_end])));
        }

        match close {
            Some((_, end)) => {
                self.pos += end;
                element.has_end_tag = true;
            }
            None => self.pos = self.input.len(),
        }
        self.append(Node::Element(element));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn roundtrip(html: &str) {
        assert_eq!(parse(html).outer_html(), html);
    }

    #[test]
    fn test_roundtrip_simple_document() {
        roundtrip("<!DOCTYPE html>\n<html><head><title>T</title></head><body><p>Hi</p></body></html>\n");
    }

    #[test]
    fn test_roundtrip_attribute_formatting() {
        roundtrip("<div  id='a'\n   class=\"b c\"\tdata-x=raw hidden  ></div>");
    }

    #[test]
    fn test_roundtrip_spaces_around_equals() {
        roundtrip(r#"<a href = "/x">x</a>"#);
    }

    #[test]
    fn test_roundtrip_void_and_self_closing() {
        roundtrip(r#"<p>a<br>b<br/>c<img src="x.png" /></p><div/>"#);
    }

    #[test]
    fn test_roundtrip_comments_and_text() {
        roundtrip("a &amp; b <!-- note --> c < d");
    }

    #[test]
    fn test_roundtrip_implicitly_closed_elements() {
        roundtrip("<ul><li>one<li>two</ul>");
    }

    #[test]
    fn test_roundtrip_stray_end_tag() {
        roundtrip("<div>x</span></div>");
    }

    #[test]
    fn test_roundtrip_unclosed_element() {
        roundtrip("<div><p>text");
    }

    #[test]
    fn test_roundtrip_non_ascii_text() {
        roundtrip("<p>héllo — wörld</p><p data-title=\"naïve\">ü</p>");
    }

    #[test]
    fn test_roundtrip_truncated_markup() {
        roundtrip("<aé");
        roundtrip("<p>x</p><!--é");
        roundtrip("<p a='é");
        roundtrip("<div id=x ");
        roundtrip("<!DOCTYPE html");
        roundtrip("<p>x</p");
        roundtrip("<script>a</script");
    }

    #[test]
    fn test_truncated_tag_is_text() {
        let document = parse("<p>x<b class=\"a");
        let p = document.children[0].as_element().unwrap();

        assert_eq!(p.children.len(), 1);
        assert!(matches!(&p.children[0], Node::Text(t) if t.as_raw() == "x<b class=\"a"));
    }

    #[test]
    fn test_script_content_is_raw() {
        let document = parse("<script>if (a < b) { x = '</div>' }</script><p></p>");
        let script = document.children[0].as_element().unwrap();

        assert_eq!(script.children.len(), 1);
        assert_eq!(document.children.len(), 2);
        assert_eq!(
            document.outer_html(),
            "<script>if (a < b) { x = '</div>' }</script><p></p>"
        );
    }

    #[test]
    fn test_attribute_tokens() {
        let document = parse(r#"<input  type="checkbox" checked>"#);
        let input = document.children[0].as_element().unwrap();
        let attributes = input.attributes.as_ref().unwrap();

        assert_eq!(attributes.leading, "  ");
        assert_eq!(
            attributes.tokens,
            vec![
                AttrToken::Attr(Attr::with_raw_value("type", "\"checkbox\"")),
                AttrToken::Space(" ".to_owned()),
                AttrToken::Attr(Attr::boolean("checked")),
            ]
        );
    }

    #[test]
    fn test_no_attributes_means_none() {
        let document = parse("<div ></div>");
        let div = document.children[0].as_element().unwrap();

        assert!(div.attributes.is_none());
        assert_eq!(div.trailing, " ");
    }

    #[test]
    fn test_nested_structure() {
        let document = parse("<div><span>a</span>b</div>");
        let div = document.children[0].as_element().unwrap();

        assert_eq!(div.children.len(), 2);
        assert!(div.children[0].as_element().unwrap().is_tag_name("span"));
        assert!(matches!(&div.children[1], Node::Text(t) if t.as_raw() == "b"));
    }

    #[test]
    fn test_less_than_text_is_merged() {
        let document = parse("<p>1 < 2</p>");
        let p = document.children[0].as_element().unwrap();

        assert_eq!(p.children.len(), 1);
    }
}
