//! Main application component

use dioxus::prelude::*;

use cafeshelf_core::sync::ListSync;

use crate::services::BackendService;
use crate::state::{ActiveView, AppState};
use crate::views::{LoginView, ShelfView};

/// Root application component
#[component]
pub fn App() -> Element {
    // State signals
    let active_view = use_signal(|| ActiveView::Login);
    let session = use_signal(|| None);
    let rows = use_signal(Vec::new);
    let auth_error = use_signal(|| None);
    let backend: Signal<Option<BackendService>> = use_signal(|| None);
    let sync_generation = use_signal(|| 0u64);
    let add_modal_open = use_signal(|| false);
    let mut backend_initialized = use_signal(|| false);
    let mut sync_task: Signal<Option<Task>> = use_signal(|| None);

    let state = use_context_provider(|| AppState {
        active_view,
        session,
        rows,
        auth_error,
        backend,
        sync_generation,
        add_modal_open,
    });

    // Initialize the backend asynchronously (only once)
    use_effect(move || {
        if backend_initialized() {
            return;
        }
        backend_initialized.set(true); // Mark immediately to prevent double init

        spawn(async move {
            let mut state = state;
            match BackendService::from_env() {
                Ok(Some(service)) => {
                    let auth = service.auth().clone();
                    state.backend.set(Some(service));

                    match auth.restore_session().await {
                        Ok(Some(restored)) => {
                            tracing::info!("Restored session for {}", restored.user.id);
                            state.session.set(Some(restored));
                        }
                        Ok(None) => {}
                        Err(error) => {
                            tracing::error!("Failed to restore session: {}", error);
                        }
                    }
                }
                Ok(None) => {
                    tracing::warn!("No backend configured; sign-in is unavailable");
                    state
                        .auth_error
                        .set(Some("Backend is not configured.".to_string()));
                }
                Err(error) => {
                    tracing::error!("Failed to initialize backend: {}", error);
                    state.auth_error.set(Some(error.to_string()));
                }
            }
        });
    });

    // Every session transition tears the old sync loop down and shows
    // exactly one screen. Cancelling the task drops the synchronizer,
    // whose subscription aborts the stream reader, so sign-out closes
    // the connection immediately even when no event is in flight. The
    // generation counter additionally guards a loop already past its
    // await when the cancel lands.
    use_effect(move || {
        let signed_in = session().is_some();
        let mut state = state;

        let generation = state.sync_generation.peek().wrapping_add(1);
        state.sync_generation.set(generation);

        if let Some(task) = sync_task.take() {
            task.cancel();
        }

        if signed_in {
            state.active_view.set(ActiveView::Shelf);
            sync_task.set(Some(spawn(run_shelf_sync(state, generation))));
        } else {
            state.rows.set(Vec::new());
            state.add_modal_open.set(false);
            state.active_view.set(ActiveView::Login);
        }
    });

    let view = active_view();

    rsx! {
        div {
            class: "app-container",
            style: "
                min-height: 100vh;
                font-family: system-ui, -apple-system, sans-serif;
                background: #faf8f5;
                color: #2d2a26;
            ",
            if view == ActiveView::Login {
                LoginView {}
            } else {
                ShelfView {}
            }
        }
    }
}

/// Mirror listing events into the rows signal until the generation moves
/// on. Attach replays the current snapshot first, so the shelf fills in
/// creation order before live events arrive.
async fn run_shelf_sync(state: AppState, generation: u64) {
    let Some(backend) = state.backend.peek().clone() else {
        return;
    };
    let token = state.id_token();
    let store = match backend.store(token.as_deref()) {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("Failed to build listing store: {}", error);
            return;
        }
    };

    let mut sync = ListSync::new();
    if let Err(error) = sync.attach(&store).await {
        tracing::error!("Failed to subscribe to listings: {}", error);
        return;
    }
    tracing::debug!("Shelf sync attached (generation {generation})");

    let mut state = state;
    while sync.next_change().await.is_some() {
        if *state.sync_generation.peek() != generation {
            // Signed out mid-await; a newer loop owns the rows now.
            break;
        }
        state.rows.set(sync.rows().to_vec());
    }
    tracing::debug!("Shelf sync detached (generation {generation})");
}
