//! List synchronizer.
//!
//! Mirrors add/remove notifications from the listing collection into an
//! ordered row list. Two states: detached (no listener) and attached.
//! Attaching always tears down any prior listener first and resets the
//! mirror, so a re-activated view never double-subscribes.

use crate::models::{CafeEntry, EntryKey};
use crate::store::{ListingStore, StoreEvent, Subscription};
use crate::Result;

/// One mirrored row of the shelf view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub key: EntryKey,
    pub entry: CafeEntry,
}

/// The effect one store event had on the mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowChange {
    /// A row was appended.
    Appended(EntryKey),
    /// The first row with this key was removed.
    Removed(EntryKey),
    /// A removal arrived for a key with no row; nothing changed.
    Ignored(EntryKey),
}

/// Ordered mirror of the listing collection.
///
/// Rows keep arrival order, which is the backend's creation-timestamp
/// order; nothing is re-sorted client-side. A second `Added` for a key
/// already present appends a duplicate row - the mirror does not
/// deduplicate.
#[derive(Debug, Default)]
pub struct ListMirror {
    rows: Vec<EntryRow>,
}

impl ListMirror {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one store event.
    pub fn apply(&mut self, event: StoreEvent) -> RowChange {
        match event {
            StoreEvent::Added { key, entry } => {
                self.rows.push(EntryRow {
                    key: key.clone(),
                    entry,
                });
                RowChange::Appended(key)
            }
            StoreEvent::Removed { key } => {
                match self.rows.iter().position(|row| row.key == key) {
                    Some(position) => {
                        self.rows.remove(position);
                        RowChange::Removed(key)
                    }
                    None => RowChange::Ignored(key),
                }
            }
        }
    }

    /// Drop all rows.
    pub fn reset(&mut self) {
        self.rows.clear();
    }

    #[must_use]
    pub fn rows(&self) -> &[EntryRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Drives a [`ListMirror`] from a store subscription.
#[derive(Default)]
pub struct ListSync {
    mirror: ListMirror,
    subscription: Option<Subscription>,
}

impl ListSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach to the store. Any prior subscription is dropped first and
    /// the mirror is reset, so rows are rebuilt from the replayed
    /// snapshot without duplicate listeners.
    pub async fn attach(&mut self, store: &impl ListingStore) -> Result<()> {
        self.detach();
        self.mirror.reset();
        self.subscription = Some(store.subscribe().await?);
        Ok(())
    }

    /// Drop the subscription. Events emitted after this never reach the
    /// mirror.
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Await the next store event and apply it to the mirror.
    ///
    /// Returns `None` when detached or when the event stream has ended.
    pub async fn next_change(&mut self) -> Option<RowChange> {
        let subscription = self.subscription.as_mut()?;
        let event = subscription.next_event().await?;
        Some(self.mirror.apply(event))
    }

    #[must_use]
    pub fn rows(&self) -> &[EntryRow] {
        self.mirror.rows()
    }
}
