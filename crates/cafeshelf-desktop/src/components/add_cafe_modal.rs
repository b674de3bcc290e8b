//! Add-cafe modal component

use dioxus::prelude::*;
use rfd::AsyncFileDialog;

use cafeshelf_core::publish::{publish_listing, CoverFile, ListingDraft};

use crate::state::AppState;

/// Modal form for publishing a new listing.
///
/// The cover image is picked through the native file dialog; only the
/// picked file name is shown. Saving without a cover silently does
/// nothing. On failure the form resets and one generic message is shown.
#[component]
pub fn AddCafeModal() -> Element {
    let state = use_context::<AppState>();
    let mut title = use_signal(String::new);
    let mut features = use_signal(String::new);
    let mut business_hours = use_signal(String::new);
    let mut address = use_signal(String::new);
    let mut map_url = use_signal(String::new);
    let mut cover = use_signal(|| None::<CoverFile>);
    let mut saving = use_signal(|| false);
    let mut save_error = use_signal(|| None::<String>);

    let mut reset_form = move || {
        title.set(String::new());
        features.set(String::new());
        business_hours.set(String::new());
        address.set(String::new());
        map_url.set(String::new());
        cover.set(None);
        saving.set(false);
    };

    let on_pick_cover = move |_: MouseEvent| {
        if saving() {
            return;
        }
        spawn(async move {
            let Some(file) = AsyncFileDialog::new()
                .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp"])
                .pick_file()
                .await
            else {
                return;
            };

            let file_name = file.file_name();
            let bytes = file.read().await;
            let content_type = mime_guess::from_path(&file_name)
                .first_raw()
                .map(str::to_string);

            cover.set(Some(CoverFile {
                file_name,
                bytes,
                content_type,
            }));
        });
    };

    let on_save = move |_: MouseEvent| {
        if saving() {
            return;
        }
        // No cover picked: do nothing, matching the form's behavior of
        // ignoring the save click until a file is selected.
        if cover.peek().is_none() {
            return;
        }
        let Some(backend) = state.backend.peek().clone() else {
            return;
        };

        saving.set(true);
        save_error.set(None);

        let draft = ListingDraft {
            title: title.peek().clone(),
            features: features.peek().clone(),
            business_hours: business_hours.peek().clone(),
            address: address.peek().clone(),
            map_url: map_url.peek().clone(),
            cover: cover.peek().clone(),
        };

        let mut state = state;
        spawn(async move {
            let token = state.id_token();
            let store = match backend.store(token.as_deref()) {
                Ok(store) => store,
                Err(error) => {
                    tracing::error!("Failed to build listing store: {}", error);
                    reset_form();
                    save_error.set(Some("Could not save the listing.".to_string()));
                    return;
                }
            };

            let Some(blobs) = backend.blobs() else {
                tracing::error!("Blob storage is not configured; cannot upload cover");
                reset_form();
                save_error.set(Some("Could not save the listing.".to_string()));
                return;
            };

            match publish_listing(&store, blobs, draft).await {
                Ok(key) => {
                    tracing::info!("Published listing {}", key);
                    reset_form();
                    state.add_modal_open.set(false);
                }
                Err(error) => {
                    tracing::error!("Failed to publish listing: {}", error);
                    reset_form();
                    save_error.set(Some("Could not save the listing.".to_string()));
                }
            }
        });
    };

    let on_cancel = move |_: MouseEvent| {
        let mut state = state;
        reset_form();
        save_error.set(None);
        state.add_modal_open.set(false);
    };

    let cover_label = cover()
        .map_or_else(|| "Choose a cover image".to_string(), |file| file.file_name);

    let field_style = "padding: 8px 10px; border: 1px solid #d8d2c7; border-radius: 6px;";

    rsx! {
        div {
            class: "modal-backdrop",
            style: "
                position: fixed;
                inset: 0;
                background: rgba(0, 0, 0, 0.35);
                display: flex;
                align-items: center;
                justify-content: center;
            ",

            div {
                class: "add-cafe-modal",
                style: "
                    display: flex;
                    flex-direction: column;
                    gap: 10px;
                    width: 420px;
                    padding: 20px;
                    border-radius: 10px;
                    background: #fff;
                ",

                div {
                    style: "font-size: 18px; font-weight: 600; margin-bottom: 4px;",
                    "Add a cafe"
                }

                input {
                    placeholder: "Name",
                    value: "{title}",
                    disabled: saving(),
                    style: field_style,
                    oninput: move |event: FormEvent| title.set(event.value()),
                }
                input {
                    placeholder: "Features",
                    value: "{features}",
                    disabled: saving(),
                    style: field_style,
                    oninput: move |event: FormEvent| features.set(event.value()),
                }
                input {
                    placeholder: "Business hours",
                    value: "{business_hours}",
                    disabled: saving(),
                    style: field_style,
                    oninput: move |event: FormEvent| business_hours.set(event.value()),
                }
                input {
                    placeholder: "Address",
                    value: "{address}",
                    disabled: saving(),
                    style: field_style,
                    oninput: move |event: FormEvent| address.set(event.value()),
                }
                input {
                    placeholder: "Map URL",
                    value: "{map_url}",
                    disabled: saving(),
                    style: field_style,
                    oninput: move |event: FormEvent| map_url.set(event.value()),
                }

                div {
                    style: "display: flex; align-items: center; gap: 10px;",
                    button {
                        disabled: saving(),
                        style: "
                            padding: 6px 12px;
                            border: 1px solid #d8d2c7;
                            border-radius: 6px;
                            background: transparent;
                            cursor: pointer;
                        ",
                        onclick: on_pick_cover,
                        "Browse..."
                    }
                    span {
                        style: "
                            flex: 1;
                            min-width: 0;
                            overflow: hidden;
                            text-overflow: ellipsis;
                            white-space: nowrap;
                            font-size: 13px;
                            color: #6b655c;
                        ",
                        "{cover_label}"
                    }
                }

                if let Some(message) = save_error() {
                    div {
                        style: "font-size: 13px; color: #b4462f;",
                        "{message}"
                    }
                }

                div {
                    style: "display: flex; justify-content: flex-end; gap: 10px; margin-top: 6px;",
                    button {
                        disabled: saving(),
                        style: "
                            padding: 6px 14px;
                            border: 1px solid #d8d2c7;
                            border-radius: 6px;
                            background: transparent;
                            cursor: pointer;
                        ",
                        onclick: on_cancel,
                        "Cancel"
                    }
                    button {
                        class: "modal-save",
                        disabled: saving(),
                        style: "
                            padding: 6px 14px;
                            border: none;
                            border-radius: 6px;
                            background: #6b4f36;
                            color: #fff;
                            cursor: pointer;
                        ",
                        onclick: on_save,
                        if saving() { "Saving..." } else { "Save" }
                    }
                }
            }
        }
    }
}
