//! Cafe card component

use dioxus::prelude::*;

use cafeshelf_core::storage::BlobStore;
use cafeshelf_core::store::ListingStore;
use cafeshelf_core::{CafeEntry, EntryKey};

use crate::state::AppState;

/// A single cafe rendered on the shelf.
///
/// The cover URL is resolved asynchronously from the blob store; until
/// it resolves (or when resolution fails) the card renders without an
/// image and the failure is only logged.
#[component]
pub fn CafeCard(entry_key: String, entry: CafeEntry) -> Element {
    let state = use_context::<AppState>();

    let image_location = entry.image_location.clone();
    let cover_url = use_resource(move || {
        let location = image_location.clone();
        async move {
            let blobs = state.backend.peek().as_ref()?.blobs()?.clone();
            match blobs.download_url(&location).await {
                Ok(url) => Some(url),
                Err(error) => {
                    tracing::error!("Failed to resolve cover image {}: {}", location, error);
                    None
                }
            }
        }
    });
    let resolved_url = cover_url().flatten();

    let delete_key = entry_key.clone();
    let on_delete = move |_: MouseEvent| {
        let state = state;
        let key = delete_key.clone();
        spawn(async move {
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
            // The row disappears via the remove event, not locally.
            if let Err(error) = store.remove(&EntryKey::from(key.as_str())).await {
                tracing::error!("Failed to delete listing {}: {}", key, error);
            }
        });
    };

    let background = resolved_url
        .as_ref()
        .map(|url| format!("background-image: url({url}); background-size: cover; background-position: center;"))
        .unwrap_or_default();

    rsx! {
        div {
            class: "cafe-item",
            style: "
                display: flex;
                gap: 16px;
                padding: 16px;
                border: 1px solid #e4ddd2;
                border-radius: 8px;
                background: #fff;
            ",

            div {
                class: "cafe-cover",
                style: "
                    width: 120px;
                    height: 90px;
                    border-radius: 6px;
                    background-color: #efe9e0;
                    flex-shrink: 0;
                    {background}
                ",
                if let Some(url) = &resolved_url {
                    img {
                        src: "{url}",
                        alt: "{entry.title}",
                        style: "width: 100%; height: 100%; object-fit: cover; border-radius: 6px;",
                    }
                }
            }

            div {
                style: "flex: 1; min-width: 0; display: flex; flex-direction: column; gap: 4px;",

                div {
                    class: "cafe-title",
                    style: "font-weight: 600; font-size: 16px;",
                    "{entry.title}"
                }
                div {
                    class: "cafe-features",
                    style: "font-size: 13px; color: #6b655c;",
                    "{entry.features}"
                }
                div {
                    class: "cafe-hours",
                    style: "font-size: 13px; color: #6b655c;",
                    "{entry.business_hours}"
                }
                div {
                    class: "cafe-address",
                    style: "font-size: 13px; color: #6b655c;",
                    "{entry.address}"
                }
                div {
                    style: "display: flex; align-items: baseline; gap: 12px; margin-top: 4px;",
                    a {
                        href: "{entry.map_url}",
                        style: "font-size: 13px; color: #6b4f36;",
                        "Map"
                    }
                    span {
                        style: "font-size: 12px; color: #8a8378;",
                        "Added {format_created_at(entry.created_at)}"
                    }
                }
            }

            button {
                class: "cafe-delete",
                style: "
                    align-self: flex-start;
                    padding: 4px 10px;
                    border: 1px solid #d8d2c7;
                    border-radius: 6px;
                    background: transparent;
                    color: #b4462f;
                    cursor: pointer;
                ",
                onclick: on_delete,
                "Delete"
            }
        }
    }
}

/// Render a creation timestamp (unix ms) as a short date.
fn format_created_at(created_at_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(created_at_ms)
        .map(|timestamp| timestamp.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_created_at_renders_short_date() {
        // 2024-03-01T00:00:00Z
        assert_eq!(format_created_at(1_709_251_200_000), "2024-03-01");
    }

    #[test]
    fn format_created_at_handles_out_of_range() {
        assert_eq!(format_created_at(i64::MAX), "");
    }
}
