//! Top navigation bar

use dioxus::prelude::*;

use crate::routes::Route;
use crate::state::use_app_state;

/// Navigation bar shown on every page
#[component]
pub fn NavBar() -> Element {
    let state = use_app_state();
    let navigator = use_navigator();
    state.track();

    let logged_in = state.auth.is_logged_in();
    let email = state.auth.session().and_then(|s| s.email);

    let handle_logout = {
        let state = state.clone();
        move |_| {
            let state = state.clone();
            spawn(async move {
                match state.auth.logout().await {
                    Ok(()) => {
                        state.touch();
                        navigator.push(Route::Home {});
                    }
                    Err(e) => tracing::warn!(error = %e, "Logout failed"),
                }
            });
        }
    };

    rsx! {
        nav {
            class: "nav",
            Link {
                to: Route::Home {},
                strong { "Family Tree" }
            }

            div {
                class: "nav-links",
                if logged_in {
                    Link { to: Route::Admin {}, "Admin" }
                    if let Some(email) = email {
                        span { class: "muted", "{email}" }
                    }
                    button {
                        onclick: handle_logout,
                        "Logout"
                    }
                } else {
                    Link {
                        to: Route::Login { redirect: String::new() },
                        "Login"
                    }
                }
            }
        }
    }
}
