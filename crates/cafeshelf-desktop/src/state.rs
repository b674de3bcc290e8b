//! Application state management
//!
//! Global state accessible via Dioxus context providers.

use dioxus::prelude::*;

use cafeshelf_core::auth::AuthSession;
use cafeshelf_core::sync::EntryRow;

use crate::services::BackendService;

/// Which screen is visible. Exactly one at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveView {
    Login,
    Shelf,
}

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    /// Currently visible screen
    pub active_view: Signal<ActiveView>,
    /// Active auth session, if signed in
    pub session: Signal<Option<AuthSession>>,
    /// Mirrored shelf rows, in backend creation order
    pub rows: Signal<Vec<EntryRow>>,
    /// Last sign-in error for UI display
    pub auth_error: Signal<Option<String>>,
    /// Backend services if configured
    pub backend: Signal<Option<BackendService>>,
    /// Bumped on every session transition; a stale sync loop observes
    /// the mismatch and stops without touching the rows.
    pub sync_generation: Signal<u64>,
    /// Whether the add-cafe modal is open
    pub add_modal_open: Signal<bool>,
}

impl AppState {
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        (self.session)().is_some()
    }

    /// The bearer token of the active session, if any.
    #[must_use]
    pub fn id_token(&self) -> Option<String> {
        self.session.peek().as_ref().map(|s| s.id_token.clone())
    }
}
