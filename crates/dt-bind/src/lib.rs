//! Data binding for parsed HTML documents.
//!
//! Binds a JSON object to a [`dt_dom`] tree through `data-*` attributes:
//!
//! - [`apply_bindings`] / [`render_bindings`]: run the [`DIRECTIVES`] table
//!   (`data-text`, `data-class`, `data-if`, `data-href`...) over a subtree
//! - [`add_attr`], [`remove_attr`], [`set_attr`], [`add_class`]: minimal
//!   edits of a raw attribute list
//! - [`fill_form`]: write submitted values back into a form's fields
//!
//! # Example
//!
//! ```
//! use dt_bind::render_bindings;
//! use dt_dom::Document;
//! use serde_json::json;
//!
//! let mut document = Document::parse(
//!     r#"<p data-text="name" data-class="state" class="user">?</p>"#,
//! );
//! render_bindings(&mut document, &json!({"name": "Ada", "state": "online"}));
//!
//! assert_eq!(
//!     document.outer_html(),
//!     r#"<p data-text="name" data-class="state" class="user online">Ada</p>"#,
//! );
//! ```

mod attr;
pub mod directive;
mod form;
mod value;

pub use attr::{add_attr, add_class, remove_attr, set_attr};
pub use directive::{BindTarget, DIRECTIVES, Directive, DirectiveKind, apply_bindings, render_bindings};
pub use form::{FormError, fill_form, to_input_date, to_input_time};
pub use value::{is_loosely_true, is_truthy, string_form};
