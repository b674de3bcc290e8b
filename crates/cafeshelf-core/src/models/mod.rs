//! Domain models shared across the Cafeshelf frontends.

mod entry;

pub use entry::{CafeEntry, EntryKey, NewCafeEntry};
