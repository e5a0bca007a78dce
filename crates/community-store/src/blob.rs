//! Blob store implementations for image uploads.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::BlobError;
use crate::traits::BlobStore;

/// Check that a blob path is relative and stays inside the store root.
pub fn validate_path(path: &str) -> Result<(), BlobError> {
    let valid = !path.is_empty()
        && !path.starts_with('/')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");

    if valid {
        Ok(())
    } else {
        Err(BlobError::InvalidPath(path.to_owned()))
    }
}

/// In-memory blob store.
///
/// URLs are `{base_url}/{path}`. Uploaded objects can be inspected, which
/// makes it the blob store of choice for tests.
pub struct MemoryBlobStore {
    base_url: String,
    objects: RwLock<BTreeMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::with_base_url("memory://blobs")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Paths of every uploaded object, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.objects
            .read()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Bytes stored at `path`.
    pub fn get(&self, path: &str) -> Option<Bytes> {
        self.objects
            .read()
            .ok()
            .and_then(|objects| objects.get(path).cloned())
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload_image(&self, path: &str, bytes: Bytes) -> Result<String, BlobError> {
        validate_path(path)?;

        self.objects
            .write()
            .map_err(|e| BlobError::Backend(format!("lock poisoned: {}", e)))?
            .insert(path.to_owned(), bytes);

        Ok(format!("{}/{}", self.base_url, path))
    }
}

/// Filesystem blob store rooted at a directory.
///
/// Each upload is written to `{root}/{path}`; the returned URL is a
/// `file://` URL of the written file.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload_image(&self, path: &str, bytes: Bytes) -> Result<String, BlobError> {
        validate_path(path)?;

        let target = path
            .split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment));

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;

        let absolute = tokio::fs::canonicalize(&target).await?;
        debug!(path, size = bytes.len(), "wrote blob");
        Ok(format!("file://{}", absolute.display()))
    }
}
