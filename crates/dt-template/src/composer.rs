//! Template composition.
//!
//! A host element names a template with `data-template` and optionally picks
//! its data with `data-bind`:
//!
//! ```html
//! <ul data-template="row" data-bind="items"></ul>
//! <template data-name="row"><li data-text="name"></li></template>
//! ```
//!
//! Names ending in `.html` are files under the template directory, loaded
//! through the [`TemplateCache`]. Other names refer to the first
//! `<template data-name="...">` of the document being composed.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dt_bind::{apply_bindings, is_truthy};
use dt_cache::{CacheError, TemplateCache};
use dt_dom::{Document, Element, Node};
use serde_json::Value;

/// Attribute naming the template of a host element.
pub const TEMPLATE_ATTR: &str = "data-template";
/// Attribute selecting the host's bound data.
pub const BIND_ATTR: &str = "data-bind";
/// Attribute naming an in-document `<template>`.
pub const NAME_ATTR: &str = "data-name";

/// Error returned when a document cannot be composed.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// A page or file template could not be loaded.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ComposeError {
    /// Whether the error is a missing page or template file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Cache(err) => err.is_not_found(),
        }
    }
}

/// Composes documents from templates.
///
/// Cheap to clone: the cache is shared.
#[derive(Clone)]
pub struct Composer {
    template_dir: PathBuf,
    cache: Arc<TemplateCache>,
}

/// The `data-template` / `data-bind` pair of one host.
struct HostRef {
    template: String,
    bind: Option<String>,
}

impl HostRef {
    fn of(host: &Element) -> Self {
        Self {
            template: host.attr(TEMPLATE_ATTR).unwrap_or_default().to_owned(),
            bind: host.attr(BIND_ATTR).map(str::to_owned),
        }
    }

    /// The host's data: the `data-bind` entry of `bindings` when it is
    /// truthy, `bindings` itself otherwise.
    fn select<'v>(&self, bindings: &'v Value) -> &'v Value {
        self.bind
            .as_deref()
            .and_then(|key| bindings.get(key))
            .filter(|value| is_truthy(value))
            .unwrap_or(bindings)
    }
}

fn is_host(element: &Element) -> bool {
    element.has_attr(TEMPLATE_ATTR)
}

impl Composer {
    /// Create a composer loading file templates from `template_dir`.
    #[must_use]
    pub fn new(template_dir: impl Into<PathBuf>, cache: Arc<TemplateCache>) -> Self {
        Self {
            template_dir: template_dir.into(),
            cache,
        }
    }

    /// Directory file templates and pages are loaded from.
    #[must_use]
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// The shared document cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }

    /// Load the page for `request_path` from the template directory.
    pub fn load(&self, request_path: &str) -> Result<Document, ComposeError> {
        Ok(self.cache.load(&self.template_dir, request_path)?)
    }

    /// Asynchronous [`load`](Self::load).
    pub async fn load_async(&self, request_path: &str) -> Result<Document, ComposeError> {
        Ok(self
            .cache
            .load_async(&self.template_dir, request_path)
            .await?)
    }

    /// Compose every host of `document` with `bindings`.
    ///
    /// Hosts are processed in document order, including hosts inside
    /// `<template>` definitions. A host's own subtree is replaced, never
    /// searched: hosts that come out of a rendered template stay as written.
    /// A missing named template leaves its host empty.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::Cache`] when a file template cannot be loaded.
    /// Hosts composed before the failure keep their new content.
    pub fn scan_templates(
        &self,
        document: &mut Document,
        bindings: &Value,
    ) -> Result<(), ComposeError> {
        for path in document.find_paths(is_host) {
            let Some(host) = document.element_at_mut(&path) else {
                continue;
            };
            let reference = HostRef::of(host);
            host.children.clear();

            let children = self.render_host(&reference, bindings, document)?;
            if let Some(host) = document.element_at_mut(&path) {
                host.children = children;
            }
        }
        Ok(())
    }

    /// Render the children of one host.
    fn render_host(
        &self,
        reference: &HostRef,
        bindings: &Value,
        document: &Document,
    ) -> Result<Vec<Node>, ComposeError> {
        let Some(template) = self.resolve_template(&reference.template, document)? else {
            tracing::warn!(template = %reference.template, "Template not found");
            return Ok(Vec::new());
        };

        let children = match reference.select(bindings) {
            Value::Array(items) => items
                .iter()
                .flat_map(|item| bind_item(&template, item))
                .collect(),
            data => bind_item(&template, data),
        };
        Ok(children)
    }

    /// The template root for `name`: a synthetic `div` around a file
    /// template's nodes, or the named `<template>` element.
    fn resolve_template<'d>(
        &self,
        name: &str,
        document: &'d Document,
    ) -> Result<Option<Cow<'d, Element>>, ComposeError> {
        if Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        {
            let loaded = self.cache.load(&self.template_dir, name)?;
            return Ok(Some(Cow::Owned(Element::with_children(
                "div",
                loaded.children,
            ))));
        }

        Ok(document
            .find_element(|e| e.is_tag_name("template") && e.attr(NAME_ATTR) == Some(name))
            .map(Cow::Borrowed))
    }
}

/// Bind one item to a copy of `template` and return the resulting nodes.
///
/// The copy sits in a throwaway container while directives run so that a
/// falsy `data-if` on the template root removes it; nothing is returned then.
fn bind_item(template: &Element, item: &Value) -> Vec<Node> {
    let mut container = Element::with_children("div", vec![Node::Element(template.clone())]);
    apply_bindings(&mut container, item);

    match container.children.pop() {
        Some(Node::Element(bound)) => bound.children,
        _ => Vec::new(),
    }
}
