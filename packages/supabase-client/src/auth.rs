//! Auth API (GoTrue) client with session storage and change listeners.

use std::sync::{Arc, RwLock, Weak};

use chrono::Utc;
use serde::Serialize;

use crate::error::{Result, SupabaseError};
use crate::types::{AuthChangeEvent, PasswordGrant, RefreshGrant, Session};

/// Callback invoked on every session change.
pub type AuthListener = Arc<dyn Fn(AuthChangeEvent, Option<Session>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, AuthListener)>,
}

/// Handle for a registered listener. Dropping it removes the listener.
#[must_use = "dropping the subscription removes the listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<RwLock<Listeners>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .write()
                .expect("auth listener lock poisoned")
                .entries
                .retain(|(id, _)| *id != self.id);
            tracing::debug!(subscription = self.id, "Auth listener removed");
        }
    }
}

#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    auth_url: String,
    api_key: String,
    session: Arc<RwLock<Option<Session>>>,
    listeners: Arc<RwLock<Listeners>>,
    /// Held while an expired session is being refreshed.
    refreshing: Arc<futures::lock::Mutex<()>>,
}

impl AuthClient {
    pub(crate) fn new(http: reqwest::Client, auth_url: String, api_key: String) -> Self {
        Self {
            http,
            auth_url,
            api_key,
            session: Arc::new(RwLock::new(None)),
            listeners: Arc::new(RwLock::new(Listeners::default())),
            refreshing: Arc::new(futures::lock::Mutex::new(())),
        }
    }

    /// Current session snapshot, without refreshing.
    pub fn session(&self) -> Option<Session> {
        self.session.read().expect("auth session lock poisoned").clone()
    }

    /// Access token of the current session, if any.
    pub fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .expect("auth session lock poisoned")
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let session = self
            .token_grant("password", &PasswordGrant { email, password })
            .await?;
        tracing::info!(user_id = %session.user.id, "Signed in");

        self.store(Some(session.clone()), AuthChangeEvent::SignedIn);
        Ok(session)
    }

    /// Revoke the current session and clear it locally.
    pub async fn sign_out(&self) -> Result<()> {
        if let Some(token) = self.access_token() {
            let url = format!("{}/logout", self.auth_url);
            let resp = self
                .http
                .post(&url)
                .header("apikey", &self.api_key)
                .bearer_auth(token)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(SupabaseError::from_body(status.as_u16(), &body));
            }
        }

        self.store(None, AuthChangeEvent::SignedOut);
        tracing::info!("Signed out");
        Ok(())
    }

    /// Exchange the stored refresh token for a new session.
    pub async fn refresh_session(&self) -> Result<Session> {
        let refresh_token = self
            .session()
            .map(|s| s.refresh_token)
            .ok_or(SupabaseError::NotAuthenticated)?;

        let session = self
            .token_grant(
                "refresh_token",
                &RefreshGrant {
                    refresh_token: &refresh_token,
                },
            )
            .await?;
        tracing::debug!(user_id = %session.user.id, "Session refreshed");

        self.store(Some(session.clone()), AuthChangeEvent::TokenRefreshed);
        Ok(session)
    }

    /// Current session, refreshed first if the access token has expired.
    ///
    /// Concurrent callers share one refresh. If the auth service rejects the
    /// refresh token the session is cleared and listeners see `SignedOut`.
    /// Transport failures keep the session.
    pub async fn get_session(&self) -> Result<Option<Session>> {
        match self.session() {
            Some(session) if session.is_expired_at(Utc::now()) => {}
            other => return Ok(other),
        }

        let _guard = self.refreshing.lock().await;
        // Another caller may have refreshed while we waited
        match self.session() {
            Some(session) if session.is_expired_at(Utc::now()) => {}
            other => return Ok(other),
        }

        match self.refresh_session().await {
            Ok(session) => Ok(Some(session)),
            Err(e @ SupabaseError::Api { .. }) => {
                tracing::warn!(error = %e, "Session refresh rejected, signing out");
                self.store(None, AuthChangeEvent::SignedOut);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Restore a session obtained elsewhere (for example a persisted one).
    pub fn set_session(&self, session: Session) {
        self.store(Some(session), AuthChangeEvent::SignedIn);
    }

    /// Register a listener for session changes.
    ///
    /// The listener is called right away with `InitialSession` and the
    /// current session, then on every later change until the returned
    /// subscription is dropped.
    pub fn on_auth_state_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AuthChangeEvent, Option<Session>) + Send + Sync + 'static,
    {
        let listener: AuthListener = Arc::new(listener);
        let id = {
            let mut listeners = self.listeners.write().expect("auth listener lock poisoned");
            listeners.next_id += 1;
            let id = listeners.next_id;
            listeners.entries.push((id, listener.clone()));
            id
        };
        tracing::debug!(subscription = id, "Auth listener registered");

        listener(AuthChangeEvent::InitialSession, self.session());

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .expect("auth listener lock poisoned")
            .entries
            .len()
    }

    async fn token_grant<B: Serialize>(&self, grant_type: &str, body: &B) -> Result<Session> {
        let url = format!("{}/token?grant_type={}", self.auth_url, grant_type);
        let issued_at = Utc::now();

        let resp = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::from_body(status.as_u16(), &body));
        }

        let session: Session = resp.json().await?;
        Ok(session.with_expiry_from(issued_at))
    }

    fn store(&self, session: Option<Session>, event: AuthChangeEvent) {
        *self.session.write().expect("auth session lock poisoned") = session.clone();
        self.notify(event, session);
    }

    fn notify(&self, event: AuthChangeEvent, session: Option<Session>) {
        // Listeners may unsubscribe from inside the callback, so call them
        // outside the lock.
        let listeners: Vec<AuthListener> = self
            .listeners
            .read()
            .expect("auth listener lock poisoned")
            .entries
            .iter()
            .map(|(_, l)| l.clone())
            .collect();

        tracing::debug!(event = event.as_str(), listeners = listeners.len(), "Auth state changed");
        for listener in listeners {
            listener(event, session.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;
    use std::sync::Mutex;

    fn client() -> AuthClient {
        AuthClient::new(
            reqwest::Client::new(),
            "https://demo.supabase.co/auth/v1".to_string(),
            "anon".to_string(),
        )
    }

    fn session(token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            refresh_token: format!("refresh-{token}"),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            expires_at: None,
            user: User {
                id: "u1".to_string(),
                email: Some("a@example.com".to_string()),
                role: None,
                aud: None,
                created_at: None,
                last_sign_in_at: None,
            },
        }
    }

    #[test]
    fn listener_receives_initial_and_later_changes() {
        let auth = client();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let _sub = auth.on_auth_state_change(move |event, session| {
            sink.lock()
                .unwrap()
                .push((event, session.map(|s| s.access_token)));
        });

        auth.set_session(session("t1"));

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (AuthChangeEvent::InitialSession, None),
                (AuthChangeEvent::SignedIn, Some("t1".to_string())),
            ]
        );
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let auth = client();
        let calls = Arc::new(Mutex::new(0));

        let counter = calls.clone();
        let sub = auth.on_auth_state_change(move |_, _| *counter.lock().unwrap() += 1);
        assert_eq!(auth.listener_count(), 1);

        sub.unsubscribe();
        assert_eq!(auth.listener_count(), 0);

        auth.set_session(session("t2"));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn sign_out_without_session_clears_locally() {
        let auth = client();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let _sub = auth.on_auth_state_change(move |event, _| sink.lock().unwrap().push(event));

        auth.sign_out().await.unwrap();

        assert!(auth.session().is_none());
        assert_eq!(
            *events.lock().unwrap(),
            vec![AuthChangeEvent::InitialSession, AuthChangeEvent::SignedOut]
        );
    }

    #[tokio::test]
    async fn refresh_without_session_is_rejected() {
        let auth = client();
        let err = auth.refresh_session().await.unwrap_err();
        assert!(matches!(err, SupabaseError::NotAuthenticated));
    }

    #[tokio::test]
    async fn unexpired_session_is_returned_without_refresh() {
        let auth = client();
        auth.set_session(session("t3").with_expiry_from(Utc::now()));
        let current = auth.get_session().await.unwrap();
        assert_eq!(current.map(|s| s.access_token).as_deref(), Some("t3"));
    }
}
