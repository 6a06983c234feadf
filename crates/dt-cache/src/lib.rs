//! Parsed template cache.
//!
//! [`TemplateCache`] reads and parses each template file once and hands out
//! deep clones of the parsed [`Document`]. Callers own what they get and may
//! mutate it freely; the cached copy never changes, so concurrent requests
//! never observe each other's bindings.
//!
//! Entries are keyed by absolute file path and live as long as the cache.
//! There is no invalidation: a template edited on disk is picked up by a new
//! cache instance.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use dt_cache::TemplateCache;
//!
//! let cache = TemplateCache::default();
//! let mut page = cache.load(Path::new("public"), "/")?; // public/index.html
//! page.children.clear();
//! let fresh = cache.load(Path::new("public"), "/index.html")?;
//! assert!(!fresh.children.is_empty());
//! # Ok::<(), dt_cache::CacheError>(())
//! ```

mod path;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use dt_dom::Document;

/// Default document for directory requests.
pub const DEFAULT_INDEX: &str = "index.html";

/// Error returned when a template cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The request path escapes the template directory or is malformed.
    #[error("Invalid template path: {0}")]
    InvalidPath(String),
    /// The template file could not be read.
    #[error("Failed to read template {}: {source}", path.display())]
    Io {
        /// Resolved file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl CacheError {
    /// Whether the template file does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Cache of parsed template documents.
///
/// `Send + Sync`; share it behind an `Arc`. Reads take a shared lock only
/// long enough to clone an `Arc`, the deep clone happens outside the lock.
pub struct TemplateCache {
    index: String,
    documents: RwLock<HashMap<PathBuf, Arc<Document>>>,
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX)
    }
}

impl TemplateCache {
    /// Create an empty cache serving `index` for directory requests.
    #[must_use]
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Document name served for directory requests.
    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Resolve a request path against `dir` to an absolute file path.
    pub fn resolve(&self, dir: &Path, request_path: &str) -> Result<PathBuf, CacheError> {
        let relative = path::normalize(request_path, &self.index)?;
        let joined = dir.join(relative);
        std::path::absolute(&joined).map_err(|source| CacheError::Io {
            path: joined,
            source,
        })
    }

    /// Load the document for `request_path` under `dir`.
    ///
    /// The file is read and parsed on first use only. Every call returns an
    /// independent clone.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn load(&self, dir: &Path, request_path: &str) -> Result<Document, CacheError> {
        let path = self.resolve(dir, request_path)?;
        if let Some(document) = self.cached(&path) {
            return Ok(document);
        }

        let html = std::fs::read_to_string(&path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(self.insert(path, Document::parse(&html)))
    }

    /// Asynchronous [`load`](Self::load): the file is read with `tokio::fs`.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub async fn load_async(&self, dir: &Path, request_path: &str) -> Result<Document, CacheError> {
        let path = self.resolve(dir, request_path)?;
        if let Some(document) = self.cached(&path) {
            return Ok(document);
        }

        let html = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| CacheError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(self.insert(path, Document::parse(&html)))
    }

    /// Number of cached documents.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    /// Whether nothing has been cached yet.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().unwrap().is_empty()
    }

    /// Whether the document at the absolute `path` is cached.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.documents.read().unwrap().contains_key(path)
    }

    fn cached(&self, path: &Path) -> Option<Document> {
        let document = self.documents.read().unwrap().get(path).cloned()?;
        Some(Document::clone(&document))
    }

    /// Store a freshly parsed document and return a clone of the cached entry.
    ///
    /// When another caller stored the same path first, its entry wins.
    fn insert(&self, path: PathBuf, document: Document) -> Document {
        let document = {
            let mut documents = self.documents.write().unwrap();
            tracing::debug!(path = %path.display(), cached = documents.len(), "Caching template");
            Arc::clone(
                documents
                    .entry(path)
                    .or_insert_with(|| Arc::new(document)),
            )
        };
        Document::clone(&document)
    }
}
