//! Listing create pipeline.
//!
//! Upload the cover image first, then write the record referencing it.
//! There is no cleanup on partial failure: a record write that fails
//! after a successful upload leaves the blob orphaned.

use crate::models::{EntryKey, NewCafeEntry};
use crate::storage::{cover_image_location, BlobStore};
use crate::store::ListingStore;
use crate::{Error, Result};

/// The cover image picked in the add-listing form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Everything the add-listing form collects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingDraft {
    pub title: String,
    pub features: String,
    pub business_hours: String,
    pub address: String,
    pub map_url: String,
    pub cover: Option<CoverFile>,
}

/// Publish a listing: upload the cover, then append the record.
///
/// Fails with [`Error::InvalidInput`] when no cover file was picked,
/// [`Error::Upload`] when the blob write fails, and [`Error::Write`] when
/// the record write fails (the uploaded blob stays behind).
pub async fn publish_listing(
    store: &impl ListingStore,
    blobs: &impl BlobStore,
    draft: ListingDraft,
) -> Result<EntryKey> {
    let Some(cover) = draft.cover else {
        return Err(Error::InvalidInput(
            "no cover image selected".to_string(),
        ));
    };

    let image_location = cover_image_location(&cover.file_name);
    blobs
        .upload(&image_location, &cover.bytes, cover.content_type.as_deref())
        .await?;

    let entry = NewCafeEntry {
        title: draft.title,
        features: draft.features,
        business_hours: draft.business_hours,
        address: draft.address,
        map_url: draft.map_url,
        image_location,
    };

    let key = store.push(entry).await?;
    tracing::info!("Published listing {}", key);
    Ok(key)
}
