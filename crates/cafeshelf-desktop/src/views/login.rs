//! Login view - shown while signed out

use dioxus::prelude::*;

use crate::components::LoginForm;

/// Login screen with the sign-in form centered
#[component]
pub fn LoginView() -> Element {
    rsx! {
        div {
            class: "login-container",
            style: "
                display: flex;
                flex-direction: column;
                align-items: center;
                justify-content: center;
                min-height: 100vh;
                gap: 24px;
            ",

            div {
                style: "font-size: 28px; font-weight: 600;",
                "Cafeshelf"
            }
            div {
                style: "font-size: 14px; color: #8a8378;",
                "Sign in to browse the shelf"
            }

            LoginForm {}
        }
    }
}
