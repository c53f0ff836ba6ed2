//! Loading and error indicators

use dioxus::prelude::*;

/// Centered loading indicator
#[component]
pub fn LoadingSpinner() -> Element {
    rsx! {
        div {
            class: "spinner",
            "Loading..."
        }
    }
}

/// Error banner with the message as reported by the backend
#[component]
pub fn ErrorBanner(message: String) -> Element {
    rsx! {
        div {
            class: "error",
            "{message}"
        }
    }
}
