//! Document-text lookup implementations

use revisor_domain::traits::DocumentCache;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Filesystem-backed document cache.
///
/// Looks up `<dir>/<reference>.txt`. A missing file means the document was
/// never cached; the record stays open and adjudication moves on.
pub struct FsDocumentCache {
    dir: PathBuf,
}

impl FsDocumentCache {
    /// Create a cache over a directory of `<reference>.txt` files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentCache for FsDocumentCache {
    type Error = io::Error;

    fn document_text(&self, reference: &str) -> Result<Option<String>, io::Error> {
        let path = self.dir.join(format!("{}.txt", reference));
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-memory document cache, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    documents: HashMap<String, String>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document text under a reference.
    pub fn insert(&mut self, reference: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(reference.into(), text.into());
    }
}

impl DocumentCache for MemoryCache {
    type Error = std::convert::Infallible;

    fn document_text(&self, reference: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.documents.get(reference).cloned())
    }
}
