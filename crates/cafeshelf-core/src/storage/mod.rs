//! Blob storage capability for cover images.

mod r2;

pub use r2::{R2Config, R2Storage};

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::{Error, Result};

/// Build the blob location for a cover image.
///
/// The path is derived from the raw file name: re-uploading the same name
/// overwrites the previous object silently.
#[must_use]
pub fn cover_image_location(file_name: &str) -> String {
    format!("cafe-images/{file_name}")
}

/// Binary object storage operations.
pub trait BlobStore: Clone + Send + Sync + 'static {
    /// Store bytes at the given location, overwriting any existing object.
    fn upload(
        &self,
        location: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Resolve a fetchable URL for a stored object.
    fn download_url(&self, location: &str) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredBlob {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

/// Blob store held in memory, for tests and offline development.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<Mutex<HashMap<String, StoredBlob>>>,
    fail_uploads: bool,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose uploads always fail, for failure-path tests.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            fail_uploads: true,
        }
    }

    /// Whether an object exists at the given location.
    pub fn contains(&self, location: &str) -> bool {
        self.lock_objects().contains_key(location)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.lock_objects().len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_objects(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredBlob>> {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        location: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<()> {
        if self.fail_uploads {
            return Err(Error::Upload("simulated network error".to_string()));
        }

        self.lock_objects().insert(
            location.to_string(),
            StoredBlob {
                bytes: bytes.to_vec(),
                content_type: content_type.map(ToOwned::to_owned),
            },
        );
        Ok(())
    }

    async fn download_url(&self, location: &str) -> Result<String> {
        if self.lock_objects().contains_key(location) {
            Ok(format!("memory://{location}"))
        } else {
            Err(Error::Resolution(format!("no object at {location}")))
        }
    }
}
