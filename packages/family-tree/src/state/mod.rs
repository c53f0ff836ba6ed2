//! Application state
//!
//! Both stores are plain handles built once at startup and passed down
//! explicitly (Dioxus context in the UI, values in tests).

mod auth_store;
mod member_store;

pub use auth_store::AuthStore;
pub use member_store::MemberStore;

#[cfg(feature = "web")]
pub use ui::{use_app_state, AppState};

#[cfg(feature = "web")]
mod ui {
    use dioxus::prelude::*;

    use super::{AuthStore, MemberStore};

    /// Stores plus the signals the UI re-renders on.
    ///
    /// The stores are not reactive themselves; every handler that changes
    /// them calls `touch` afterwards, and views call `track` to subscribe.
    #[derive(Clone)]
    pub struct AppState {
        pub members: MemberStore,
        pub auth: AuthStore,
        /// False until the first session lookup has finished.
        pub auth_ready: Signal<bool>,
        revision: Signal<u64>,
    }

    impl AppState {
        pub fn new(members: MemberStore, auth: AuthStore) -> Self {
            Self {
                members,
                auth,
                auth_ready: Signal::new(false),
                revision: Signal::new(0),
            }
        }

        /// Mark store contents as changed.
        pub fn touch(&self) {
            let mut revision = self.revision;
            let next = *revision.peek() + 1;
            revision.set(next);
        }

        /// Subscribe the calling component to store changes.
        pub fn track(&self) {
            let _ = self.revision.read();
        }
    }

    /// Hook to access the application state
    pub fn use_app_state() -> AppState {
        use_context::<AppState>()
    }
}
