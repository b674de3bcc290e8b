//! Cafe list component

use dioxus::prelude::*;

use super::CafeCard;
use crate::state::AppState;

/// The mirrored rows, rendered in arrival order.
///
/// Rows are keyed by list position plus entry key: the backend can emit
/// the same key twice and both rows must render.
#[component]
pub fn CafeList() -> Element {
    let state = use_context::<AppState>();
    let rows = (state.rows)();

    rsx! {
        div {
            class: "cafe-list",
            style: "display: flex; flex-direction: column; gap: 12px; max-width: 720px; margin: 0 auto;",

            if rows.is_empty() {
                div {
                    style: "padding: 40px 20px; text-align: center; color: #8a8378;",
                    "No cafes yet"
                }
            } else {
                for (index, row) in rows.into_iter().enumerate() {
                    CafeCard {
                        key: "{index}-{row.key}",
                        entry_key: row.key.to_string(),
                        entry: row.entry,
                    }
                }
            }
        }
    }
}
