//! Shelf view - the main signed-in screen

use dioxus::prelude::*;

use crate::components::{AddCafeModal, CafeList, ShelfToolbar};
use crate::state::AppState;

/// Shelf screen: toolbar plus the mirrored cafe list
#[component]
pub fn ShelfView() -> Element {
    let state = use_context::<AppState>();

    rsx! {
        div {
            class: "shelf-container",
            style: "display: flex; flex-direction: column; height: 100vh;",

            ShelfToolbar {}

            div {
                class: "shelf-content",
                style: "flex: 1; overflow-y: auto; padding: 16px 24px;",
                CafeList {}
            }

            if (state.add_modal_open)() {
                AddCafeModal {}
            }
        }
    }
}
