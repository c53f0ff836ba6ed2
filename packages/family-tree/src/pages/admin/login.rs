//! Login page

use dioxus::prelude::*;

use crate::routes::Route;
use crate::state::use_app_state;

/// Email/password login. `redirect` is where to go afterwards.
#[component]
pub fn Login(redirect: String) -> Element {
    let state = use_app_state();
    let navigator = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_pending = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();

        let state = state.clone();
        let redirect = redirect.clone();
        let e = email().trim().to_string();
        let p = password();

        if e.is_empty() || p.is_empty() {
            error.set(Some("Please enter your email and password".to_string()));
            return;
        }

        spawn(async move {
            is_pending.set(true);
            error.set(None);

            match state.auth.login(&e, &p).await {
                Ok(()) => {
                    state.touch();
                    let target = Route::resolve(&redirect).unwrap_or(Route::Home {});
                    navigator.replace(target);
                }
                Err(err) => error.set(Some(err.to_string())),
            }

            is_pending.set(false);
        });
    };

    rsx! {
        h1 { "Sign in" }

        if let Some(err) = error() {
            div { class: "error", "{err}" }
        }

        form {
            class: "stack",
            onsubmit: handle_submit,
            label { "Email" }
            input {
                r#type: "email",
                value: "{email}",
                oninput: move |e| email.set(e.value()),
                disabled: is_pending(),
            }
            label { "Password" }
            input {
                r#type: "password",
                value: "{password}",
                oninput: move |e| password.set(e.value()),
                disabled: is_pending(),
            }
            button {
                r#type: "submit",
                disabled: is_pending(),
                if is_pending() { "Signing in..." } else { "Sign in" }
            }
        }
    }
}
