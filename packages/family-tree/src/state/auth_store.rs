//! Authentication store

use std::sync::{Arc, Mutex, RwLock};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::backend::{AuthBackend, AuthSubscription};
use crate::error::Result;
use crate::types::{AuthEvent, Session};

/// Cloneable handle to the current session.
#[derive(Clone)]
pub struct AuthStore {
    backend: Arc<dyn AuthBackend>,
    session: Arc<RwLock<Option<Session>>>,
    watchers: Arc<Mutex<Vec<UnboundedSender<AuthEvent>>>>,
}

impl AuthStore {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            backend,
            session: Arc::new(RwLock::new(None)),
            watchers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().expect("auth store lock poisoned").clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.read().expect("auth store lock poisoned").is_some()
    }

    /// Events for every pushed session change applied to this store.
    ///
    /// Only changes arriving through the `init_auth` subscription are
    /// reported. Dropping the receiver unregisters it on the next change.
    pub fn changes(&self) -> UnboundedReceiver<AuthEvent> {
        let (tx, rx) = mpsc::unbounded();
        self.watchers
            .lock()
            .expect("auth store watcher lock poisoned")
            .push(tx);
        rx
    }

    fn set_session(&self, session: Option<Session>) {
        *self.session.write().expect("auth store lock poisoned") = session;
    }

    /// Load the current session and follow every later change.
    ///
    /// A failed lookup is logged and treated as signed out. Pushed changes
    /// keep updating this store for as long as the returned handle lives.
    pub async fn init_auth(&self) -> AuthSubscription {
        match self.backend.get_session().await {
            Ok(session) => self.set_session(session),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load current session");
                self.set_session(None);
            }
        }

        let session = Arc::downgrade(&self.session);
        let watchers = Arc::downgrade(&self.watchers);
        self.backend
            .on_auth_state_change(Arc::new(move |event: AuthEvent, next: Option<Session>| {
                let Some(session) = session.upgrade() else {
                    return;
                };
                tracing::debug!(?event, signed_in = next.is_some(), "Session changed");
                *session.write().expect("auth store lock poisoned") = next;

                if let Some(watchers) = watchers.upgrade() {
                    watchers
                        .lock()
                        .expect("auth store watcher lock poisoned")
                        .retain(|tx| tx.unbounded_send(event).is_ok());
                }
            }))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let session = self.backend.sign_in_with_password(email, password).await?;
        tracing::info!(user_id = %session.user_id, "Logged in");
        self.set_session(Some(session));
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.backend.sign_out().await?;
        tracing::info!("Logged out");
        self.set_session(None);
        Ok(())
    }
}
