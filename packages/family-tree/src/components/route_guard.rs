//! Layout wrapper that applies the navigation guards

use dioxus::prelude::*;

use super::{LoadingSpinner, NavBar};
use crate::routes::{guard, Navigation, Route};
use crate::state::use_app_state;

/// Wraps every route: waits for the first session lookup, then either
/// renders the page or redirects according to `guard`.
#[component]
pub fn RouteGuard() -> Element {
    let state = use_app_state();
    let route = use_route::<Route>();
    state.track();

    if !*state.auth_ready.read() {
        return rsx! {
            LoadingSpinner {}
        };
    }

    match guard(&route, state.auth.is_logged_in()) {
        Navigation::Redirect(to) => {
            tracing::debug!(from = %route.full_path(), to = %to.full_path(), "Navigation redirected");
            rsx! {
                Redirect { to }
            }
        }
        Navigation::Allow => rsx! {
            NavBar {}
            main {
                class: "page",
                Outlet::<Route> {}
            }
        },
    }
}
