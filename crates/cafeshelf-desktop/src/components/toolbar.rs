//! Shelf toolbar component with actions

use dioxus::prelude::*;

use crate::state::AppState;

/// Toolbar with the add-cafe and sign-out actions
#[component]
pub fn ShelfToolbar() -> Element {
    let state = use_context::<AppState>();

    let open_add_modal = move |_| {
        let mut state = state;
        state.add_modal_open.set(true);
    };

    let sign_out = move |_| {
        let mut state = state;
        if let Some(backend) = state.backend.peek().clone() {
            if let Err(error) = backend.auth().sign_out() {
                tracing::error!("Failed to clear session: {}", error);
            }
        }
        // Dropping the session detaches the shelf sync and flips the view.
        state.session.set(None);
    };

    rsx! {
        div {
            class: "shelf-toolbar",
            style: "
                display: flex;
                align-items: center;
                gap: 12px;
                padding: 12px 24px;
                border-bottom: 1px solid #e4ddd2;
                background: #fff;
            ",

            div {
                style: "font-size: 18px; font-weight: 600;",
                "Cafeshelf"
            }

            // Spacer
            div { style: "flex: 1;" }

            button {
                class: "toolbar-add",
                style: "
                    padding: 6px 14px;
                    border: none;
                    border-radius: 6px;
                    background: #6b4f36;
                    color: #fff;
                    cursor: pointer;
                ",
                onclick: open_add_modal,
                "+ Add Cafe"
            }

            button {
                class: "toolbar-sign-out",
                style: "
                    padding: 6px 14px;
                    border: 1px solid #d8d2c7;
                    border-radius: 6px;
                    background: transparent;
                    cursor: pointer;
                ",
                onclick: sign_out,
                "Sign Out"
            }
        }
    }
}
