//! cafeshelf-core - Core library for Cafeshelf
//!
//! This crate contains the domain models, the backend capability clients
//! (auth, ordered keyed store, blob storage), the list synchronizer, and
//! the listing create pipeline shared by all Cafeshelf frontends.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod publish;
pub mod storage;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{CafeEntry, EntryKey, NewCafeEntry};
