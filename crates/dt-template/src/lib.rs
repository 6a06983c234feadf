//! Template composition for data-bound HTML documents.
//!
//! Pages and partials are plain HTML files. A host element pulls in a
//! template and binds it to data, repeating it for every item of an array:
//!
//! ```html
//! <ul data-template="product.html" data-bind="products"></ul>
//! ```
//!
//! - [`Composer`]: resolves, clones, binds and splices templates
//! - [`Context`]: one request's document plus the operations a page handler
//!   needs (compose, bind, fill forms, serialize)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use dt_cache::TemplateCache;
//! use dt_dom::Document;
//! use dt_template::{Composer, Context};
//! use serde_json::json;
//!
//! let composer = Composer::new("public", Arc::new(TemplateCache::default()));
//! let document = Document::parse(concat!(
//!     r#"<ol data-template="step"></ol>"#,
//!     r#"<template data-name="step"><li data-text="label"></li></template>"#,
//! ));
//!
//! let mut context = Context::new(document, composer);
//! context.scan_templates(&json!([{"label": "Mix"}, {"label": "Bake"}]))?;
//!
//! assert!(context.outer_html().starts_with(
//!     r#"<ol data-template="step"><li data-text="label">Mix</li><li data-text="label">Bake</li></ol>"#
//! ));
//! # Ok::<(), dt_template::ComposeError>(())
//! ```

mod composer;
mod context;

pub use composer::{BIND_ATTR, ComposeError, Composer, NAME_ATTR, TEMPLATE_ATTR};
pub use context::Context;
