//! End-to-end shelf flows over the in-memory capabilities.

use pretty_assertions::assert_eq;

use cafeshelf_core::publish::{publish_listing, CoverFile, ListingDraft};
use cafeshelf_core::storage::{BlobStore, MemoryBlobStore};
use cafeshelf_core::store::{ListingStore, MemoryListingStore, StoreEvent};
use cafeshelf_core::sync::{ListSync, RowChange};
use cafeshelf_core::Error;

fn draft(title: &str, file_name: &str) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        features: "Quiet, power outlets".to_string(),
        business_hours: "9:00-18:00".to_string(),
        address: "1-2-3 Somewhere".to_string(),
        map_url: "https://maps.example.com".to_string(),
        cover: Some(CoverFile {
            file_name: file_name.to_string(),
            bytes: b"jpeg-bytes".to_vec(),
            content_type: Some("image/jpeg".to_string()),
        }),
    }
}

#[tokio::test]
async fn publish_appears_on_the_shelf_with_resolvable_cover() {
    let store = MemoryListingStore::new();
    let blobs = MemoryBlobStore::new();

    let mut sync = ListSync::new();
    sync.attach(&store).await.unwrap();

    publish_listing(&store, &blobs, draft("Cafe A", "a.jpg"))
        .await
        .unwrap();

    assert!(matches!(
        sync.next_change().await,
        Some(RowChange::Appended(_))
    ));

    let rows = sync.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entry.title, "Cafe A");
    assert_eq!(rows[0].entry.image_location, "cafe-images/a.jpg");

    let url = blobs
        .download_url(&rows[0].entry.image_location)
        .await
        .unwrap();
    assert_eq!(url, "memory://cafe-images/a.jpg");
}

#[tokio::test]
async fn failed_upload_writes_no_record() {
    let store = MemoryListingStore::new();
    let blobs = MemoryBlobStore::failing();

    let error = publish_listing(&store, &blobs, draft("Cafe A", "a.jpg"))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Upload(_)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn delete_removes_the_row_but_leaves_the_blob() {
    let store = MemoryListingStore::new();
    let blobs = MemoryBlobStore::new();

    let key = publish_listing(&store, &blobs, draft("Cafe A", "a.jpg"))
        .await
        .unwrap();

    let mut sync = ListSync::new();
    sync.attach(&store).await.unwrap();
    sync.next_change().await.unwrap();
    assert_eq!(sync.rows().len(), 1);

    store.remove(&key).await.unwrap();
    assert_eq!(sync.next_change().await, Some(RowChange::Removed(key)));
    assert!(sync.rows().is_empty());

    // The uploaded cover is orphaned, not cleaned up.
    assert!(blobs.contains("cafe-images/a.jpg"));
}

#[tokio::test]
async fn sign_out_detaches_before_late_events_arrive() {
    let store = MemoryListingStore::new();
    let blobs = MemoryBlobStore::new();

    publish_listing(&store, &blobs, draft("Cafe A", "a.jpg"))
        .await
        .unwrap();

    let mut sync = ListSync::new();
    sync.attach(&store).await.unwrap();
    sync.next_change().await.unwrap();

    // Sign-out detaches the listeners.
    sync.detach();

    // A late-arriving event must not mutate the mirrored rows.
    publish_listing(&store, &blobs, draft("Cafe B", "b.jpg"))
        .await
        .unwrap();
    assert_eq!(sync.next_change().await, None);

    let titles: Vec<&str> = sync
        .rows()
        .iter()
        .map(|row| row.entry.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Cafe A"]);
}

#[tokio::test]
async fn duplicate_key_emission_is_mirrored_verbatim() {
    let store = MemoryListingStore::new();
    let blobs = MemoryBlobStore::new();

    let key = publish_listing(&store, &blobs, draft("Cafe A", "a.jpg"))
        .await
        .unwrap();
    let entry = store.get(&key).unwrap();

    let mut sync = ListSync::new();
    sync.attach(&store).await.unwrap();
    sync.next_change().await.unwrap();

    // The backend re-emitting an existing key yields a duplicate row.
    store.emit(StoreEvent::Added {
        key: key.clone(),
        entry,
    });
    assert_eq!(sync.next_change().await, Some(RowChange::Appended(key)));
    assert_eq!(sync.rows().len(), 2);
}
