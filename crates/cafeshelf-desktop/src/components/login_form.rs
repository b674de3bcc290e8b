//! Sign-in form component

use dioxus::prelude::*;

use crate::state::AppState;

/// Email/password form. The submit button is disabled while a sign-in
/// request is in flight; one generic message is shown on failure.
#[component]
pub fn LoginForm() -> Element {
    let state = use_context::<AppState>();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut submitting = use_signal(|| false);

    let backend_available = state.backend.read().is_some();

    let on_sign_in = move |_: MouseEvent| {
        if submitting() {
            return;
        }
        let Some(backend) = state.backend.peek().clone() else {
            return;
        };

        submitting.set(true);
        let mut state = state;
        state.auth_error.set(None);

        spawn(async move {
            let auth = backend.auth().clone();
            match auth.sign_in(&email.peek(), &password.peek()).await {
                Ok(session) => {
                    email.set(String::new());
                    password.set(String::new());
                    state.session.set(Some(session));
                }
                Err(error) => {
                    tracing::error!("Sign-in failed: {}", error);
                    state
                        .auth_error
                        .set(Some("Sign-in failed. Check your email and password.".to_string()));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        div {
            class: "login-form",
            style: "display: flex; flex-direction: column; gap: 10px; width: 280px;",

            input {
                r#type: "email",
                placeholder: "Email",
                value: "{email}",
                disabled: submitting(),
                style: "padding: 8px 10px; border: 1px solid #d8d2c7; border-radius: 6px;",
                oninput: move |event: FormEvent| email.set(event.value()),
            }
            input {
                r#type: "password",
                placeholder: "Password",
                value: "{password}",
                disabled: submitting(),
                style: "padding: 8px 10px; border: 1px solid #d8d2c7; border-radius: 6px;",
                oninput: move |event: FormEvent| password.set(event.value()),
            }

            button {
                class: "login-submit",
                disabled: submitting() || !backend_available,
                style: "
                    padding: 8px 10px;
                    border: none;
                    border-radius: 6px;
                    background: #6b4f36;
                    color: #fff;
                    cursor: pointer;
                ",
                onclick: on_sign_in,
                if submitting() { "Signing in..." } else { "Sign In" }
            }

            if let Some(message) = (state.auth_error)() {
                div {
                    class: "login-error",
                    style: "font-size: 13px; color: #b4462f;",
                    "{message}"
                }
            }
        }
    }
}
