//! Ordered keyed store capability.
//!
//! The backend owns an ordered collection of cafe listings keyed by
//! server-assigned string keys and ordered by creation timestamp. Clients
//! append, remove by key, and subscribe to add/remove notifications.

mod memory;
mod rest;
pub(crate) mod stream;

pub use memory::MemoryListingStore;
pub use rest::RestListingStore;

use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::{CafeEntry, EntryKey, NewCafeEntry};
use crate::Result;

/// A change notification from the listing collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A listing was appended to the collection.
    Added { key: EntryKey, entry: CafeEntry },
    /// A listing was removed from the collection.
    Removed { key: EntryKey },
}

/// Storage operations for the listing collection.
pub trait ListingStore: Clone + Send + Sync + 'static {
    /// Append a listing; the store assigns the key and creation timestamp.
    fn push(&self, entry: NewCafeEntry) -> impl Future<Output = Result<EntryKey>> + Send;

    /// Remove a listing by key. Removing an absent key is not an error.
    fn remove(&self, key: &EntryKey) -> impl Future<Output = Result<()>> + Send;

    /// Subscribe to add/remove events. Existing listings are replayed as
    /// `Added` events in ascending creation-timestamp order before live
    /// events arrive.
    fn subscribe(&self) -> impl Future<Output = Result<Subscription>> + Send;
}

/// An active listener on the listing collection.
///
/// Dropping the subscription detaches the listener: the reader task is
/// aborted and no further events are delivered.
pub struct Subscription {
    receiver: mpsc::Receiver<StoreEvent>,
    reader: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) fn new(receiver: mpsc::Receiver<StoreEvent>, reader: Option<JoinHandle<()>>) -> Self {
        Self {
            receiver,
            reader,
        }
    }

    /// Await the next event. Returns `None` when the stream has ended.
    pub async fn next_event(&mut self) -> Option<StoreEvent> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Channel capacity for subscription event delivery.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 64;
