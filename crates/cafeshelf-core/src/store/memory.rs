//! In-memory listing store.
//!
//! Backs tests and offline development. Mirrors the remote store's
//! contract: server-assigned keys, a monotonic write clock, snapshot
//! replay in creation order, then live events.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};

use crate::models::{CafeEntry, EntryKey, NewCafeEntry};
use crate::store::{ListingStore, StoreEvent, Subscription, EVENT_CHANNEL_CAPACITY};
use crate::util::unix_timestamp_millis;
use crate::{Error, Result};

#[derive(Default)]
struct State {
    entries: Vec<(EntryKey, CafeEntry)>,
    last_timestamp: i64,
}

/// Listing store held entirely in memory.
#[derive(Clone)]
pub struct MemoryListingStore {
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<StoreEvent>,
}

impl MemoryListingStore {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(State::default())),
            events,
        }
    }

    /// Replay a raw backend event to every subscriber without touching the
    /// stored entries. Lets tests reproduce backend emissions (duplicate
    /// keys included) that the write API itself would not produce.
    pub fn emit(&self, event: StoreEvent) {
        let _ = self.events.send(event);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock_state().entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only happens when a test panicked mid-write;
        // the state is still usable for the remaining assertions.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for MemoryListingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingStore for MemoryListingStore {
    async fn push(&self, entry: NewCafeEntry) -> Result<EntryKey> {
        let mut state = self.lock_state();

        // Server clock is monotonic per write.
        let now = unix_timestamp_millis().max(state.last_timestamp + 1);
        state.last_timestamp = now;

        let key = EntryKey::generate();
        let entry = entry.into_entry(now);
        state.entries.push((key.clone(), entry.clone()));

        let _ = self.events.send(StoreEvent::Added {
            key: key.clone(),
            entry,
        });
        Ok(key)
    }

    async fn remove(&self, key: &EntryKey) -> Result<()> {
        let mut state = self.lock_state();

        let Some(position) = state.entries.iter().position(|(k, _)| k == key) else {
            // Matches the remote store: removing an absent key succeeds
            // and emits nothing.
            return Ok(());
        };
        state.entries.remove(position);

        let _ = self.events.send(StoreEvent::Removed { key: key.clone() });
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        // Snapshot and the live receiver are taken under the same lock as
        // writers hold while emitting, so no event falls in between.
        let (snapshot, mut live) = {
            let state = self.lock_state();
            let mut snapshot = state.entries.clone();
            snapshot.sort_by_key(|(_, entry)| entry.created_at);
            (snapshot, self.events.subscribe())
        };

        let reader = tokio::spawn(async move {
            for (key, entry) in snapshot {
                if tx.send(StoreEvent::Added { key, entry }).await.is_err() {
                    return;
                }
            }

            loop {
                match live.recv().await {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("In-memory subscriber lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        });

        Ok(Subscription::new(rx, Some(reader)))
    }
}

/// Convenience used by tests that need a pre-populated store.
impl MemoryListingStore {
    pub async fn push_all(&self, drafts: Vec<NewCafeEntry>) -> Result<Vec<EntryKey>> {
        let mut keys = Vec::with_capacity(drafts.len());
        for draft in drafts {
            keys.push(self.push(draft).await?);
        }
        Ok(keys)
    }

    /// Look up a stored entry by key.
    pub fn get(&self, key: &EntryKey) -> Result<CafeEntry> {
        self.lock_state()
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entry)| entry.clone())
            .ok_or_else(|| Error::InvalidInput(format!("no entry for key {key}")))
    }
}
