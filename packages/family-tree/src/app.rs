//! Root application component

use std::sync::Arc;

use dioxus::prelude::*;
use futures::StreamExt;
use supabase_client::SupabaseClient;

use crate::backend::{AuthSubscription, SupabaseBackend};
use crate::config::Config;
use crate::routes::Route;
use crate::state::{AppState, AuthStore, MemberStore};

/// Root application component
#[component]
pub fn App() -> Element {
    let config = use_context::<Config>();

    // Stores are built once and shared through context
    let state = use_context_provider(|| {
        let backend = Arc::new(SupabaseBackend::new(SupabaseClient::new(
            config.supabase_url.clone(),
            config.supabase_anon_key.clone(),
        )));
        AppState::new(MemberStore::new(backend.clone()), AuthStore::new(backend))
    });

    // Held for the lifetime of the app; dropping it stops session updates
    let mut subscription = use_signal(|| None::<AuthSubscription>);

    use_hook(move || {
        let state = state.clone();

        // Pushed sign-outs and refreshes re-render the guard and nav bar
        let mut changes = state.auth.changes();
        let watcher = state.clone();
        spawn(async move {
            while let Some(event) = changes.next().await {
                tracing::debug!(?event, "Auth state pushed");
                watcher.touch();
            }
        });

        spawn(async move {
            let handle = state.auth.init_auth().await;
            subscription.set(Some(handle));
            let mut ready = state.auth_ready;
            ready.set(true);
            state.touch();

            state.members.fetch_all().await;
            state.touch();
        });
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }

        Router::<Route> {}
    }
}
