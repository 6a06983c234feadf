//! Lossless HTML tree for server-side data binding.
//!
//! This crate provides the document model the binding engine operates on:
//!
//! - [`Document::parse`]: forgiving parser that never fails
//! - [`Element`] / [`Node`]: owned tree, cheap to deep-clone
//! - [`Attributes`]: attribute records interleaved with their original
//!   whitespace, values kept as raw quoted literals
//! - [`Element::walk_mut`] / [`Document::walk_mut`]: depth-first walks where
//!   the visitor can skip a subtree or detach an element
//! - [`NodePath`]: positional addressing instead of parent pointers
//!
//! Serializing an unmodified document reproduces its input byte for byte.
//!
//! # Example
//!
//! ```
//! use dt_dom::Document;
//!
//! let mut document = Document::parse(r#"<p  class='lead'>Hello</p>"#);
//! let p = document.find_element_mut(|e| e.is_tag_name("p")).unwrap();
//! p.set_text("Hi & bye");
//!
//! assert_eq!(document.outer_html(), r#"<p  class='lead'>Hi &amp; bye</p>"#);
//! ```

mod attributes;
mod node;
mod parser;
mod serialize;
mod walk;

pub use attributes::{Attr, AttrToken, Attributes, escape_attr_value, quote, unquote};
pub use node::{Document, Element, Node, Text, escape_text, is_void_element};
pub use walk::{NodePath, Visit};
