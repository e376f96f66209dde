//! Catalog document loading with a caller-owned cache.
//!
//! Documents are fetched once per path and kept until the caller clears the
//! cache. There is no expiry.

use rustc_hash::FxHashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::config::RelatedPrefixes;

use super::{Catalog, ProgramCatalog};

/// Errors raised while loading catalog documents.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog data source unavailable: {path}")]
    Unavailable {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Malformed catalog document {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Somewhere catalog documents can be fetched from.
pub trait DocumentSource {
    fn fetch(&self, path: &str) -> io::Result<String>;
}

/// Documents stored as files under a root directory.
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentSource for FsSource {
    fn fetch(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(path))
    }
}

/// Raw documents keyed by source path.
#[derive(Clone, Debug, Default)]
pub struct DocumentCache {
    documents: FxHashMap<String, Arc<str>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Arc<str>> {
        self.documents.get(path).cloned()
    }

    pub fn insert(&mut self, path: &str, text: Arc<str>) {
        self.documents.insert(path.to_string(), text);
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Loads catalogs from a document source through an injected cache.
pub struct CatalogLoader<S> {
    source: S,
    cache: DocumentCache,
}

impl<S: DocumentSource> CatalogLoader<S> {
    pub fn new(source: S, cache: DocumentCache) -> Self {
        Self { source, cache }
    }

    /// Fetch a raw document, hitting the source only on the first request per path.
    pub fn fetch(&mut self, path: &str) -> Result<Arc<str>, CatalogError> {
        if let Some(text) = self.cache.get(path) {
            return Ok(text);
        }
        let text: Arc<str> = self
            .source
            .fetch(path)
            .map_err(|source| CatalogError::Unavailable {
                path: path.to_string(),
                source,
            })?
            .into();
        self.cache.insert(path, Arc::clone(&text));
        Ok(text)
    }

    pub fn load_units(&mut self, path: &str) -> Result<Catalog, CatalogError> {
        let text = self.fetch(path)?;
        Catalog::from_json_str(&text).map_err(|source| malformed(path, source))
    }

    pub fn load_programs(&mut self, path: &str) -> Result<ProgramCatalog, CatalogError> {
        let text = self.fetch(path)?;
        ProgramCatalog::from_json_str(&text).map_err(|source| malformed(path, source))
    }

    pub fn load_related_prefixes(&mut self, path: &str) -> Result<RelatedPrefixes, CatalogError> {
        let text = self.fetch(path)?;
        serde_json::from_str(&text).map_err(|source| malformed(path, source))
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Hand the cache back to the caller, e.g. to reuse it with another source.
    pub fn into_cache(self) -> DocumentCache {
        self.cache
    }
}

fn malformed(path: &str, source: serde_json::Error) -> CatalogError {
    CatalogError::Malformed {
        path: path.to_string(),
        source,
    }
}
