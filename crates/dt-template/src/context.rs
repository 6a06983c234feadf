//! Per-request rendering context.

use std::path::Path;
use std::sync::Arc;

use dt_bind::{FormError, fill_form, render_bindings};
use dt_cache::TemplateCache;
use dt_dom::Document;
use serde_json::Value;

use crate::composer::{ComposeError, Composer};

/// One request's document together with the composer that fills it.
///
/// The document is an independent copy; mutate it freely.
pub struct Context {
    document: Document,
    composer: Composer,
}

impl Context {
    /// Wrap an already loaded document.
    #[must_use]
    pub fn new(document: Document, composer: Composer) -> Self {
        Self { document, composer }
    }

    /// Load the page for `request_path` through the composer's cache.
    pub fn load(composer: Composer, request_path: &str) -> Result<Self, ComposeError> {
        let document = composer.load(request_path)?;
        Ok(Self::new(document, composer))
    }

    /// Asynchronous [`load`](Self::load).
    pub async fn load_async(composer: Composer, request_path: &str) -> Result<Self, ComposeError> {
        let document = composer.load_async(request_path).await?;
        Ok(Self::new(document, composer))
    }

    /// The document being rendered.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the document being rendered.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Take the rendered document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Directory file templates are loaded from.
    #[must_use]
    pub fn template_dir(&self) -> &Path {
        self.composer.template_dir()
    }

    /// The shared document cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<TemplateCache> {
        self.composer.cache()
    }

    /// Compose every `data-template` host with `bindings`.
    ///
    /// See [`Composer::scan_templates`].
    pub fn scan_templates(&mut self, bindings: &Value) -> Result<(), ComposeError> {
        self.composer.scan_templates(&mut self.document, bindings)
    }

    /// Apply directives across the whole document.
    pub fn render_bindings(&mut self, values: &Value) {
        render_bindings(&mut self.document, values);
    }

    /// Fill the form with id `form_id` from `values`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::FormNotFound`] when no element has that id, and
    /// [`FormError::FieldNotFound`] for a key without a matching field.
    pub fn fill_form(&mut self, form_id: &str, values: &Value) -> Result<(), FormError> {
        let form = self
            .document
            .find_element_mut(|e| e.attr("id") == Some(form_id))
            .ok_or_else(|| FormError::FormNotFound(form_id.to_owned()))?;
        fill_form(form, values)
    }

    /// Serialize the document.
    #[must_use]
    pub fn outer_html(&self) -> String {
        self.document.outer_html()
    }

    /// Serialize the document without comments and with collapsed whitespace.
    #[must_use]
    pub fn minified_outer_html(&self) -> String {
        self.document.minified_outer_html()
    }
}
